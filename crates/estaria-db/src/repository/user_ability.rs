//! SurrealDB implementation of [`UserAbilityRepository`].

use chrono::{DateTime, Utc};
use estaria_core::error::EstariaResult;
use estaria_core::models::user_ability::{CreateUserAbility, UserAbility};
use estaria_core::repository::{PaginatedResult, Pagination, UserAbilityRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct UserAbilityRow {
    user_id: String,
    tenant_id: String,
    action: String,
    subject: String,
    conditions: Option<serde_json::Value>,
    inverted: bool,
    role_context_id: Option<String>,
    priority: i32,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct UserAbilityRowWithId {
    record_id: String,
    user_id: String,
    tenant_id: String,
    action: String,
    subject: String,
    conditions: Option<serde_json::Value>,
    inverted: bool,
    role_context_id: Option<String>,
    priority: i32,
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Query(format!("invalid {what} UUID: {e}")))
}

impl UserAbilityRow {
    fn into_user_ability(self, id: Uuid) -> Result<UserAbility, DbError> {
        Ok(UserAbility {
            id,
            user_id: parse_uuid(&self.user_id, "user")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            action: self.action,
            subject: self.subject,
            conditions: self.conditions,
            inverted: self.inverted,
            role_context_id: self
                .role_context_id
                .as_deref()
                .map(|s| parse_uuid(s, "role context"))
                .transpose()?,
            priority: self.priority,
            deleted_at: self.deleted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserAbilityRowWithId {
    fn try_into_user_ability(self) -> Result<UserAbility, DbError> {
        let id = parse_uuid(&self.record_id, "record")?;
        Ok(UserAbility {
            id,
            user_id: parse_uuid(&self.user_id, "user")?,
            tenant_id: parse_uuid(&self.tenant_id, "tenant")?,
            action: self.action,
            subject: self.subject,
            conditions: self.conditions,
            inverted: self.inverted,
            role_context_id: self
                .role_context_id
                .as_deref()
                .map(|s| parse_uuid(s, "role context"))
                .transpose()?,
            priority: self.priority,
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

/// SurrealDB implementation of the UserAbility repository.
#[derive(Clone)]
pub struct SurrealUserAbilityRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserAbilityRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserAbilityRepository for SurrealUserAbilityRepository<C> {
    async fn create(&self, input: CreateUserAbility) -> EstariaResult<UserAbility> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('user_ability', $id) SET \
                 user_id = $user_id, tenant_id = $tenant_id, \
                 action = $action, subject = $subject, \
                 conditions = $conditions, \
                 inverted = $inverted, \
                 role_context_id = $role_context_id, \
                 priority = $priority",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("action", input.action))
            .bind(("subject", input.subject))
            .bind(("conditions", input.conditions))
            .bind(("inverted", input.inverted))
            .bind(("role_context_id", input.role_context_id.map(|r| r.to_string())))
            .bind(("priority", input.priority.unwrap_or(1)))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("user ability", e))?;

        let rows: Vec<UserAbilityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_ability".into(),
            id: id_str,
        })?;

        Ok(row.into_user_ability(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> EstariaResult<UserAbility> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('user_ability', $id) \
                 WHERE deleted_at = NONE",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserAbilityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user_ability".into(),
            id: id_str,
        })?;

        Ok(row.into_user_ability(id)?)
    }

    async fn delete(&self, id: Uuid) -> EstariaResult<()> {
        self.db
            .query(
                "UPDATE type::record('user_ability', $id) SET \
                 deleted_at = time::now(), updated_at = time::now() \
                 WHERE deleted_at = NONE",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_for_user(&self, tenant_id: Uuid, user_id: Uuid) -> EstariaResult<Vec<UserAbility>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user_ability \
                 WHERE user_id = $user_id AND tenant_id = $tenant_id \
                 AND deleted_at = NONE",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserAbilityRowWithId> = result.take(0).map_err(DbError::from)?;

        let abilities = rows
            .into_iter()
            .map(|row| row.try_into_user_ability())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(abilities)
    }

    async fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> EstariaResult<PaginatedResult<UserAbility>> {
        let tenant_id_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM user_ability \
                 WHERE tenant_id = $tenant_id AND deleted_at = NONE \
                 GROUP ALL",
            )
            .bind(("tenant_id", tenant_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user_ability \
                 WHERE tenant_id = $tenant_id AND deleted_at = NONE \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserAbilityRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_user_ability())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
