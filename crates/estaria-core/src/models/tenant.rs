//! Tenant domain model.
//!
//! Tenants are the isolation boundary of the platform: every principal
//! and every permission scope is rooted in a tenant. Tenants are
//! referenced, not owned, by users — a user can outlive its tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenant is an isolated customer context (typically an agency or
/// portal operator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Fully-qualified domain the tenant is served under. Unique among
    /// live tenants.
    pub domain: String,
    /// Short machine-readable identifier (e.g. `acme-realty`). Unique
    /// among live tenants.
    pub code: String,
    /// Human-readable display name.
    pub name: String,
    pub active: bool,
    /// Arbitrary per-tenant configuration.
    pub settings: serde_json::Value,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub domain: String,
    pub code: String,
    pub name: String,
    pub settings: Option<serde_json::Value>,
}

/// Fields that can be updated on an existing tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTenant {
    pub domain: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub active: Option<bool>,
    pub settings: Option<serde_json::Value>,
}
