//! SurrealDB repository implementations.

mod ability;
mod role;
mod tenant;
mod user;
mod user_ability;

pub use ability::SurrealAbilityRepository;
pub use role::SurrealRoleRepository;
pub use tenant::SurrealTenantRepository;
pub use user::{SurrealUserRepository, verify_password};
pub use user_ability::SurrealUserAbilityRepository;
