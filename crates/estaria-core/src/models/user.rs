//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved principal used as the actor for automated operations.
///
/// Seeded at bootstrap with the role named `system`; the row is never
/// deleted and never logs in interactively.
pub const SYSTEM_USER_ID: Uuid = Uuid::nil();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// The tenant this user belongs to. `None` after the tenant has
    /// been removed — the user outlives its tenant.
    pub tenant_id: Option<Uuid>,
    pub username: String,
    pub email: String,
    /// Argon2id PHC-format hash.
    pub password_hash: String,
    pub active: bool,
    /// Id of the user that created this row.
    pub created_by: Option<Uuid>,
    /// Id of the user that last updated this row.
    pub updated_by: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub tenant_id: Option<Uuid>,
    pub username: String,
    pub email: String,
    /// Raw password (will be hashed with Argon2id before storage).
    pub password: String,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub active: Option<bool>,
    /// `Some(Some(id))` = move to tenant, `Some(None)` = detach,
    /// `None` = no change.
    pub tenant_id: Option<Option<Uuid>>,
    pub updated_by: Option<Uuid>,
}
