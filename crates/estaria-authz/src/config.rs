//! Authorization configuration.

/// Configuration for the authorization service.
#[derive(Debug, Clone)]
pub struct AuthzConfig {
    /// Role names that can never be deleted nor have abilities removed.
    /// Checked before any rule evaluation.
    pub protected_roles: Vec<String>,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            protected_roles: vec!["system".into(), "admin".into()],
        }
    }
}
