//! SurrealDB implementation of [`AbilityRepository`].

use chrono::{DateTime, Utc};
use estaria_core::error::EstariaResult;
use estaria_core::models::ability::{Ability, CreateAbility, UpdateAbility};
use estaria_core::repository::AbilityRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AbilityRow {
    role_id: String,
    action: String,
    subject: String,
    conditions: Option<serde_json::Value>,
    inverted: bool,
    priority: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AbilityRowWithId {
    record_id: String,
    role_id: String,
    action: String,
    subject: String,
    conditions: Option<serde_json::Value>,
    inverted: bool,
    priority: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AbilityRow {
    fn into_ability(self, id: Uuid) -> Result<Ability, DbError> {
        let role_id = Uuid::parse_str(&self.role_id)
            .map_err(|e| DbError::Query(format!("invalid role UUID: {e}")))?;
        Ok(Ability {
            id,
            role_id,
            action: self.action,
            subject: self.subject,
            conditions: self.conditions,
            inverted: self.inverted,
            priority: self.priority,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AbilityRowWithId {
    fn try_into_ability(self) -> Result<Ability, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        let role_id = Uuid::parse_str(&self.role_id)
            .map_err(|e| DbError::Query(format!("invalid role UUID: {e}")))?;
        Ok(Ability {
            id,
            role_id,
            action: self.action,
            subject: self.subject,
            conditions: self.conditions,
            inverted: self.inverted,
            priority: self.priority,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Ability repository.
#[derive(Clone)]
pub struct SurrealAbilityRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAbilityRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AbilityRepository for SurrealAbilityRepository<C> {
    async fn create(&self, input: CreateAbility) -> EstariaResult<Ability> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('ability', $id) SET \
                 role_id = $role_id, \
                 action = $action, subject = $subject, \
                 conditions = $conditions, \
                 inverted = $inverted, priority = $priority",
            )
            .bind(("id", id_str.clone()))
            .bind(("role_id", input.role_id.to_string()))
            .bind(("action", input.action))
            .bind(("subject", input.subject))
            .bind(("conditions", input.conditions))
            .bind(("inverted", input.inverted))
            .bind(("priority", input.priority.unwrap_or(1)))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("ability", e))?;

        let rows: Vec<AbilityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "ability".into(),
            id: id_str,
        })?;

        Ok(row.into_ability(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> EstariaResult<Ability> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('ability', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AbilityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "ability".into(),
            id: id_str,
        })?;

        Ok(row.into_ability(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateAbility) -> EstariaResult<Ability> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.action.is_some() {
            sets.push("action = $action");
        }
        if input.subject.is_some() {
            sets.push("subject = $subject");
        }
        if input.conditions.is_some() {
            sets.push("conditions = $conditions");
        }
        if input.inverted.is_some() {
            sets.push("inverted = $inverted");
        }
        if input.priority.is_some() {
            sets.push("priority = $priority");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('ability', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(action) = input.action {
            builder = builder.bind(("action", action));
        }
        if let Some(subject) = input.subject {
            builder = builder.bind(("subject", subject));
        }
        if let Some(conditions) = input.conditions {
            // conditions is Option<Option<Value>>: Some(Some(v)) = set,
            // Some(None) = clear
            builder = builder.bind(("conditions", conditions));
        }
        if let Some(inverted) = input.inverted {
            builder = builder.bind(("inverted", inverted));
        }
        if let Some(priority) = input.priority {
            builder = builder.bind(("priority", priority));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::from_check("ability", e))?;

        let rows: Vec<AbilityRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "ability".into(),
            id: id_str,
        })?;

        Ok(row.into_ability(id)?)
    }

    async fn delete(&self, id: Uuid) -> EstariaResult<()> {
        self.db
            .query("DELETE type::record('ability', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list_by_role(&self, role_id: Uuid) -> EstariaResult<Vec<Ability>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM ability \
                 WHERE role_id = $role_id \
                 ORDER BY priority DESC",
            )
            .bind(("role_id", role_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AbilityRowWithId> = result.take(0).map_err(DbError::from)?;

        let abilities = rows
            .into_iter()
            .map(|row| row.try_into_ability())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(abilities)
    }

    async fn get_for_roles(&self, role_ids: &[Uuid]) -> EstariaResult<Vec<Ability>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = role_ids.iter().map(|id| id.to_string()).collect();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM ability \
                 WHERE role_id IN $role_ids",
            )
            .bind(("role_ids", ids))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AbilityRowWithId> = result.take(0).map_err(DbError::from)?;

        let abilities = rows
            .into_iter()
            .map(|row| row.try_into_ability())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(abilities)
    }
}
