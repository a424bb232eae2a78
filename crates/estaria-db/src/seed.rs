//! Bootstrap seed data — built-in roles, their base abilities, and the
//! reserved system principal.
//!
//! Seeding is idempotent: every step checks for the row it would
//! create and re-running is safe, mirroring the migration runner.

use estaria_core::SYSTEM_USER_ID;
use estaria_core::error::{EstariaError, EstariaResult};
use estaria_core::models::ability::CreateAbility;
use estaria_core::models::role::{CreateRole, Role};
use estaria_core::repository::{AbilityRepository, RoleRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::{SurrealAbilityRepository, SurrealRoleRepository};

/// Stored for principals that never authenticate; no password verifies
/// against it.
const UNUSABLE_PASSWORD_HASH: &str = "!";

/// Seed the built-in roles, their base abilities, and the system
/// principal.
pub async fn run_seed<C: Connection>(db: &Surreal<C>) -> EstariaResult<()> {
    let role_repo = SurrealRoleRepository::new(db.clone());
    let ability_repo = SurrealAbilityRepository::new(db.clone());

    let system = ensure_role(
        &role_repo,
        "system",
        "Reserved role for automated platform operations",
    )
    .await?;
    let admin = ensure_role(&role_repo, "admin", "Full administrative access").await?;
    let member = ensure_role(&role_repo, "user", "Default member role").await?;

    ensure_ability(&ability_repo, &system, "*", "*", 10).await?;
    ensure_ability(&ability_repo, &admin, "*", "*", 5).await?;
    ensure_ability(&ability_repo, &member, "read", "Listing", 1).await?;
    ensure_ability(&ability_repo, &member, "read", "Tenant", 1).await?;

    ensure_system_principal(db, &role_repo, system.id).await?;

    Ok(())
}

async fn ensure_role<R: RoleRepository>(
    repo: &R,
    name: &str,
    description: &str,
) -> EstariaResult<Role> {
    match repo.get_by_name(name).await {
        Ok(role) => Ok(role),
        Err(EstariaError::NotFound { .. }) => {
            info!(name, "Seeding role");
            repo.create(CreateRole {
                name: name.into(),
                description: description.into(),
            })
            .await
        }
        Err(e) => Err(e),
    }
}

async fn ensure_ability<A: AbilityRepository>(
    repo: &A,
    role: &Role,
    action: &str,
    subject: &str,
    priority: i32,
) -> EstariaResult<()> {
    let existing = repo.list_by_role(role.id).await?;
    if existing
        .iter()
        .any(|a| a.action == action && a.subject == subject)
    {
        return Ok(());
    }

    info!(role = %role.name, action, subject, "Seeding ability");
    repo.create(CreateAbility {
        role_id: role.id,
        action: action.into(),
        subject: subject.into(),
        conditions: None,
        inverted: false,
        priority: Some(priority),
    })
    .await?;

    Ok(())
}

#[derive(Debug, SurrealValue)]
struct IdRow {
    record_id: String,
}

async fn ensure_system_principal<C: Connection>(
    db: &Surreal<C>,
    role_repo: &SurrealRoleRepository<C>,
    system_role_id: Uuid,
) -> EstariaResult<()> {
    let id_str = SYSTEM_USER_ID.to_string();

    // The repository generates fresh ids on create; the system
    // principal's id is fixed, so it is created directly.
    let mut result = db
        .query(
            "SELECT meta::id(id) AS record_id \
             FROM type::record('user', $id)",
        )
        .bind(("id", id_str.clone()))
        .await
        .map_err(DbError::from)?;
    let rows: Vec<IdRow> = result.take(0).map_err(DbError::from)?;

    if rows.is_empty() {
        info!(id = %id_str, "Seeding system principal");
        db.query(
            "CREATE type::record('user', $id) SET \
             tenant_id = NONE, \
             username = 'system', \
             email = 'system@estaria.internal', \
             password_hash = $password_hash, \
             active = true, \
             created_by = NONE, updated_by = NONE",
        )
        .bind(("id", id_str))
        .bind(("password_hash", UNUSABLE_PASSWORD_HASH.to_string()))
        .await
        .map_err(DbError::from)?
        .check()
        .map_err(|e| DbError::from_check("user", e))?;
    }

    let roles = role_repo.get_user_roles(SYSTEM_USER_ID).await?;
    if !roles.iter().any(|r| r.id == system_role_id) {
        role_repo
            .assign_to_user(SYSTEM_USER_ID, system_role_id, None)
            .await?;
    }

    Ok(())
}
