//! Authorization service — rule gathering and guarded role mutations.

use estaria_core::error::{EstariaError, EstariaResult};
use estaria_core::repository::{AbilityRepository, RoleRepository, UserAbilityRepository};
use serde_json::Value;
use uuid::Uuid;

use crate::config::AuthzConfig;
use crate::error::AuthzError;
use crate::resolver::{self, AccessRequest, Decision, FilterDecision};
use crate::rule::PermissionRule;

/// The identity an authorization question is asked about.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    /// The tenant the request executes in. User-level overrides only
    /// apply within their tenant.
    pub tenant_id: Option<Uuid>,
    /// The role the principal is currently exercising, when the caller
    /// distinguishes one. Scopes role-contexted overrides.
    pub active_role_id: Option<Uuid>,
}

/// Authorization service.
///
/// Generic over repository implementations so that this crate has no
/// dependency on the database crate. Rule rows are fetched here and
/// handed to the pure resolver.
pub struct AuthzService<R, A, U>
where
    R: RoleRepository,
    A: AbilityRepository,
    U: UserAbilityRepository,
{
    role_repo: R,
    ability_repo: A,
    user_ability_repo: U,
    config: AuthzConfig,
}

impl<R, A, U> AuthzService<R, A, U>
where
    R: RoleRepository,
    A: AbilityRepository,
    U: UserAbilityRepository,
{
    pub fn new(role_repo: R, ability_repo: A, user_ability_repo: U, config: AuthzConfig) -> Self {
        Self {
            role_repo,
            ability_repo,
            user_ability_repo,
            config,
        }
    }

    /// Fetch every rule that could bear on decisions for `principal`:
    /// abilities of all assigned roles, plus the principal's own
    /// overrides within the current tenant.
    async fn gather_rules(&self, principal: &Principal) -> EstariaResult<Vec<PermissionRule>> {
        let roles = self.role_repo.get_user_roles(principal.user_id).await?;
        let role_ids: Vec<Uuid> = roles.iter().map(|r| r.id).collect();
        let abilities = self.ability_repo.get_for_roles(&role_ids).await?;

        let mut rules: Vec<PermissionRule> =
            abilities.iter().map(PermissionRule::from_ability).collect();

        if let Some(tenant_id) = principal.tenant_id {
            let overrides = self
                .user_ability_repo
                .list_for_user(tenant_id, principal.user_id)
                .await?;
            rules.extend(overrides.iter().map(PermissionRule::from_user_ability));
        }

        Ok(rules)
    }

    /// Decide ALLOW or DENY for (principal, action, subject[, resource]).
    ///
    /// Errors must be treated as DENY by the caller; see [`Self::is_allowed`]
    /// for a variant that does so itself.
    pub async fn check(
        &self,
        principal: &Principal,
        action: &str,
        subject: &str,
        resource: Option<&Value>,
    ) -> EstariaResult<Decision> {
        let rules = self.gather_rules(principal).await?;
        let request = AccessRequest {
            action,
            subject,
            resource,
            active_role_id: principal.active_role_id,
            tenant_id: principal.tenant_id,
        };
        Ok(resolver::resolve(&rules, &request)?)
    }

    /// Like [`Self::check`], collapsing evaluation errors into deny
    /// after logging them.
    pub async fn is_allowed(
        &self,
        principal: &Principal,
        action: &str,
        subject: &str,
        resource: Option<&Value>,
    ) -> bool {
        match self.check(principal, action, subject, resource).await {
            Ok(decision) => decision.is_allowed(),
            Err(err) => {
                tracing::error!(
                    error = %err,
                    user_id = %principal.user_id,
                    action,
                    subject,
                    "authorization evaluation failed, denying"
                );
                false
            }
        }
    }

    /// Like [`Self::check`], but resolves to an `AuthorizationDenied`
    /// error on deny so callers can `?` through.
    pub async fn enforce(
        &self,
        principal: &Principal,
        action: &str,
        subject: &str,
        resource: Option<&Value>,
    ) -> EstariaResult<()> {
        match self.check(principal, action, subject, resource).await? {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(EstariaError::AuthorizationDenied {
                reason: format!("{action} on {subject} is not permitted"),
            }),
        }
    }

    /// Produce the filter to merge into a collection query of `subject`.
    pub async fn list_filter(
        &self,
        principal: &Principal,
        action: &str,
        subject: &str,
    ) -> EstariaResult<FilterDecision> {
        let rules = self.gather_rules(principal).await?;
        let request = AccessRequest {
            action,
            subject,
            resource: None,
            active_role_id: principal.active_role_id,
            tenant_id: principal.tenant_id,
        };
        Ok(resolver::resolve_filter(&rules, &request)?)
    }

    // -----------------------------------------------------------------
    // Guarded role mutations
    // -----------------------------------------------------------------

    fn guard_protected(&self, role_name: &str) -> Result<(), AuthzError> {
        if self
            .config
            .protected_roles
            .iter()
            .any(|protected| protected == role_name)
        {
            return Err(AuthzError::ProtectedRole {
                name: role_name.to_string(),
            });
        }
        Ok(())
    }

    /// Delete a role. Refused for protected role names before any rule
    /// evaluation or mutation, regardless of what the caller's stored
    /// rules would permit.
    pub async fn delete_role(&self, role_id: Uuid) -> EstariaResult<()> {
        let role = self.role_repo.get_by_id(role_id).await?;
        self.guard_protected(&role.name)?;
        self.role_repo.delete(role_id).await
    }

    /// Remove a single ability from a role. Refused for protected roles.
    pub async fn remove_ability(&self, role_id: Uuid, ability_id: Uuid) -> EstariaResult<()> {
        let role = self.role_repo.get_by_id(role_id).await?;
        self.guard_protected(&role.name)?;

        let ability = self.ability_repo.get_by_id(ability_id).await?;
        if ability.role_id != role_id {
            return Err(EstariaError::Validation {
                message: format!("ability {ability_id} does not belong to role {role_id}"),
            });
        }
        self.ability_repo.delete(ability_id).await
    }
}
