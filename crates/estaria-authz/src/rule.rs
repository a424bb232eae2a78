//! The shared permission-rule shape consumed by the resolver.
//!
//! Role abilities and per-user overrides are stored in different tables
//! but carry the same rule envelope; both flatten into [`PermissionRule`]
//! so a single merge function can evaluate them together.

use estaria_core::models::ability::Ability;
use estaria_core::models::user_ability::UserAbility;
use uuid::Uuid;

/// Wildcard matching any action or subject when stored on a rule.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq)]
pub struct PermissionRule {
    pub action: String,
    pub subject: String,
    pub conditions: Option<serde_json::Value>,
    pub inverted: bool,
    pub priority: i32,
    /// `Some` when the rule only applies while the principal is acting
    /// under that role. Always `None` for role-derived abilities.
    pub role_context_id: Option<Uuid>,
    /// `Some` when the rule is scoped to a tenant. Always `None` for
    /// role-derived abilities, always `Some` for user overrides.
    pub tenant_id: Option<Uuid>,
}

impl PermissionRule {
    pub fn from_ability(ability: &Ability) -> Self {
        Self {
            action: ability.action.clone(),
            subject: ability.subject.clone(),
            conditions: ability.conditions.clone(),
            inverted: ability.inverted,
            priority: ability.priority,
            role_context_id: None,
            tenant_id: None,
        }
    }

    pub fn from_user_ability(user_ability: &UserAbility) -> Self {
        Self {
            action: user_ability.action.clone(),
            subject: user_ability.subject.clone(),
            conditions: user_ability.conditions.clone(),
            inverted: user_ability.inverted,
            priority: user_ability.priority,
            role_context_id: user_ability.role_context_id,
            tenant_id: Some(user_ability.tenant_id),
        }
    }

    pub(crate) fn matches_action(&self, action: &str) -> bool {
        self.action == WILDCARD || self.action == action
    }

    pub(crate) fn matches_subject(&self, subject: &str) -> bool {
        self.subject == WILDCARD || self.subject == subject
    }
}
