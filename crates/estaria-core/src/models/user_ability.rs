//! User-ability domain model — a per-user, tenant-scoped permission
//! override.
//!
//! User abilities are the fine-grained layer sitting above the coarse
//! role-derived abilities. They carry the same rule shape (action,
//! subject, conditions, inverted, priority) plus a mandatory tenant
//! scope and an optional role context: when `role_context_id` is set,
//! the override only applies while the user is acting under that role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAbility {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub action: String,
    pub subject: String,
    pub conditions: Option<serde_json::Value>,
    pub inverted: bool,
    /// Restricts the override to decisions made while the user
    /// exercises this role. `None` applies regardless of role context.
    pub role_context_id: Option<Uuid>,
    pub priority: i32,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserAbility {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub action: String,
    pub subject: String,
    pub conditions: Option<serde_json::Value>,
    pub inverted: bool,
    pub role_context_id: Option<Uuid>,
    /// Defaults to 1 when omitted.
    pub priority: Option<i32>,
}
