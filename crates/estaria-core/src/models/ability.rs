//! Ability domain model — a role-level permission rule.
//!
//! An ability grants (or, when `inverted`, explicitly denies) an action
//! on a subject type to every user holding the owning role. Abilities
//! are owned by their role and are removed with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ability {
    pub id: Uuid,
    pub role_id: Uuid,
    /// Action name (e.g. `read`, `update`, `delete`) or the wildcard `*`.
    pub action: String,
    /// Subject type name (e.g. `Listing`) or the wildcard `*`.
    pub subject: String,
    /// Optional field predicates the resource instance must satisfy;
    /// an object of field name -> expected value.
    pub conditions: Option<serde_json::Value>,
    /// When true this rule is an explicit deny.
    pub inverted: bool,
    /// Tie-breaker between matching rules; higher wins.
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAbility {
    pub role_id: Uuid,
    pub action: String,
    pub subject: String,
    pub conditions: Option<serde_json::Value>,
    pub inverted: bool,
    /// Defaults to 1 when omitted.
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAbility {
    pub action: Option<String>,
    pub subject: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub conditions: Option<Option<serde_json::Value>>,
    pub inverted: Option<bool>,
    pub priority: Option<i32>,
}
