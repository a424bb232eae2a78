//! SurrealDB implementation of [`TenantRepository`].

use chrono::{DateTime, Utc};
use estaria_core::error::EstariaResult;
use estaria_core::models::tenant::{CreateTenant, Tenant, UpdateTenant};
use estaria_core::repository::{PaginatedResult, Pagination, TenantRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct TenantRow {
    domain: String,
    code: String,
    name: String,
    active: bool,
    settings: serde_json::Value,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct TenantRowWithId {
    record_id: String,
    domain: String,
    code: String,
    name: String,
    active: bool,
    settings: serde_json::Value,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self, id: Uuid) -> Tenant {
        Tenant {
            id,
            domain: self.domain,
            code: self.code,
            name: self.name,
            active: self.active,
            settings: self.settings,
            deleted_at: self.deleted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl TenantRowWithId {
    fn try_into_tenant(self) -> Result<Tenant, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        Ok(Tenant {
            id,
            domain: self.domain,
            code: self.code,
            name: self.name,
            active: self.active,
            settings: self.settings,
            deleted_at: self.deleted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn get_by_field(&self, field: &'static str, value: &str) -> EstariaResult<Tenant> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM tenant \
             WHERE {field} = $value AND deleted_at = NONE"
        );

        let mut result = self
            .db
            .query(query)
            .bind(("value", value.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: format!("{field}={value}"),
        })?;

        Ok(row.try_into_tenant()?)
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: CreateTenant) -> EstariaResult<Tenant> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let settings = input
            .settings
            .unwrap_or(serde_json::Value::Object(Default::default()));

        let result = self
            .db
            .query(
                "CREATE type::record('tenant', $id) SET \
                 domain = $domain, code = $code, name = $name, \
                 active = true, settings = $settings",
            )
            .bind(("id", id_str.clone()))
            .bind(("domain", input.domain))
            .bind(("code", input.code))
            .bind(("name", input.name))
            .bind(("settings", settings))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("tenant", e))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id))
    }

    async fn get_by_id(&self, id: Uuid) -> EstariaResult<Tenant> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('tenant', $id) \
                 WHERE deleted_at = NONE",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id))
    }

    async fn get_by_domain(&self, domain: &str) -> EstariaResult<Tenant> {
        self.get_by_field("domain", domain).await
    }

    async fn get_by_code(&self, code: &str) -> EstariaResult<Tenant> {
        self.get_by_field("code", code).await
    }

    async fn update(&self, id: Uuid, input: UpdateTenant) -> EstariaResult<Tenant> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.domain.is_some() {
            sets.push("domain = $domain");
        }
        if input.code.is_some() {
            sets.push("code = $code");
        }
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.active.is_some() {
            sets.push("active = $active");
        }
        if input.settings.is_some() {
            sets.push("settings = $settings");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('tenant', $id) SET {} \
             WHERE deleted_at = NONE",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(domain) = input.domain {
            builder = builder.bind(("domain", domain));
        }
        if let Some(code) = input.code {
            builder = builder.bind(("code", code));
        }
        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(active) = input.active {
            builder = builder.bind(("active", active));
        }
        if let Some(settings) = input.settings {
            builder = builder.bind(("settings", settings));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("tenant", e))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id))
    }

    async fn delete(&self, id: Uuid) -> EstariaResult<()> {
        let id_str = id.to_string();

        // Soft-delete the tenant, then detach its users: they outlive
        // the tenant with tenant_id cleared.
        self.db
            .query(
                "UPDATE type::record('tenant', $id) SET \
                 deleted_at = time::now(), updated_at = time::now() \
                 WHERE deleted_at = NONE; \
                 UPDATE user SET tenant_id = NONE, \
                 updated_at = time::now() \
                 WHERE tenant_id = $tenant_id AND deleted_at = NONE;",
            )
            .bind(("id", id_str))
            .bind(("tenant_id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> EstariaResult<PaginatedResult<Tenant>> {
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM tenant \
                 WHERE deleted_at = NONE GROUP ALL",
            )
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM tenant \
                 WHERE deleted_at = NONE \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_tenant())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
