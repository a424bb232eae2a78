//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Soft-deleted rows are invisible
//! to every read operation here — visibility filtering is a storage
//! concern, not something callers check. Tenant-scoped queries take an
//! explicit `tenant_id` parameter to enforce data isolation.

use uuid::Uuid;

use crate::error::EstariaResult;
use crate::models::{
    ability::{Ability, CreateAbility, UpdateAbility},
    role::{CreateRole, Role, UpdateRole},
    tenant::{CreateTenant, Tenant, UpdateTenant},
    user::{CreateUser, UpdateUser, User},
    user_ability::{CreateUserAbility, UserAbility},
    user_role::RoleAssignment,
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Tenants
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = EstariaResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = EstariaResult<Tenant>> + Send;
    fn get_by_domain(&self, domain: &str) -> impl Future<Output = EstariaResult<Tenant>> + Send;
    fn get_by_code(&self, code: &str) -> impl Future<Output = EstariaResult<Tenant>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTenant,
    ) -> impl Future<Output = EstariaResult<Tenant>> + Send;
    /// Soft-delete. Referencing users are detached (their `tenant_id`
    /// is cleared), not deleted.
    fn delete(&self, id: Uuid) -> impl Future<Output = EstariaResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = EstariaResult<PaginatedResult<Tenant>>> + Send;
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = EstariaResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = EstariaResult<User>> + Send;
    fn get_by_username(&self, username: &str)
    -> impl Future<Output = EstariaResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = EstariaResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = EstariaResult<User>> + Send;
    /// Soft-delete. Role assignments and user abilities referencing
    /// this user are removed.
    fn delete(&self, id: Uuid) -> impl Future<Output = EstariaResult<()>> + Send;
    fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = EstariaResult<PaginatedResult<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Roles & assignments
// ---------------------------------------------------------------------------

pub trait RoleRepository: Send + Sync {
    fn create(&self, input: CreateRole) -> impl Future<Output = EstariaResult<Role>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = EstariaResult<Role>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = EstariaResult<Role>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateRole,
    ) -> impl Future<Output = EstariaResult<Role>> + Send;
    /// Soft-delete. The role's abilities and assignments are removed.
    fn delete(&self, id: Uuid) -> impl Future<Output = EstariaResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = EstariaResult<PaginatedResult<Role>>> + Send;

    /// Assign a role to a user. Rejected if the live pair already exists.
    fn assign_to_user(
        &self,
        user_id: Uuid,
        role_id: Uuid,
        created_by: Option<Uuid>,
    ) -> impl Future<Output = EstariaResult<()>> + Send;

    /// Remove a role assignment (soft delete of the join row).
    fn unassign_from_user(
        &self,
        user_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = EstariaResult<()>> + Send;

    /// Get all live roles assigned to a user.
    fn get_user_roles(&self, user_id: Uuid) -> impl Future<Output = EstariaResult<Vec<Role>>> + Send;

    /// Get the assignment join rows for a user, audit fields included.
    fn get_user_assignments(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = EstariaResult<Vec<RoleAssignment>>> + Send;
}

// ---------------------------------------------------------------------------
// Abilities (role-level rules)
// ---------------------------------------------------------------------------

pub trait AbilityRepository: Send + Sync {
    fn create(&self, input: CreateAbility) -> impl Future<Output = EstariaResult<Ability>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = EstariaResult<Ability>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateAbility,
    ) -> impl Future<Output = EstariaResult<Ability>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = EstariaResult<()>> + Send;
    fn list_by_role(&self, role_id: Uuid)
    -> impl Future<Output = EstariaResult<Vec<Ability>>> + Send;

    /// Bulk fetch for authorization resolution: all abilities of all
    /// given roles.
    fn get_for_roles(
        &self,
        role_ids: &[Uuid],
    ) -> impl Future<Output = EstariaResult<Vec<Ability>>> + Send;
}

// ---------------------------------------------------------------------------
// User abilities (per-user overrides)
// ---------------------------------------------------------------------------

pub trait UserAbilityRepository: Send + Sync {
    fn create(
        &self,
        input: CreateUserAbility,
    ) -> impl Future<Output = EstariaResult<UserAbility>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = EstariaResult<UserAbility>> + Send;
    /// Soft-delete (revocation of a single grant).
    fn delete(&self, id: Uuid) -> impl Future<Output = EstariaResult<()>> + Send;

    /// All live overrides for a user within a tenant, for resolution.
    fn list_for_user(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = EstariaResult<Vec<UserAbility>>> + Send;

    fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = EstariaResult<PaginatedResult<UserAbility>>> + Send;
}
