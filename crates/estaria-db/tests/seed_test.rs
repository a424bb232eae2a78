//! Integration tests for bootstrap seeding using in-memory SurrealDB.

use estaria_core::SYSTEM_USER_ID;
use estaria_core::repository::{AbilityRepository, RoleRepository, UserRepository};
use estaria_db::repository::{
    SurrealAbilityRepository, SurrealRoleRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    estaria_db::run_migrations(&db).await.unwrap();
    estaria_db::run_seed(&db).await.unwrap();
    db
}

#[tokio::test]
async fn seed_creates_builtin_roles_with_abilities() {
    let db = setup().await;
    let role_repo = SurrealRoleRepository::new(db.clone());
    let ability_repo = SurrealAbilityRepository::new(db);

    for name in ["system", "admin", "user"] {
        let role = role_repo.get_by_name(name).await.unwrap();
        let abilities = ability_repo.list_by_role(role.id).await.unwrap();
        assert!(!abilities.is_empty(), "role '{name}' should have abilities");
    }

    let system = role_repo.get_by_name("system").await.unwrap();
    let abilities = ability_repo.list_by_role(system.id).await.unwrap();
    assert!(
        abilities
            .iter()
            .any(|a| a.action == "*" && a.subject == "*"),
        "system role should carry the blanket ability"
    );
}

#[tokio::test]
async fn seed_creates_system_principal_with_system_role() {
    let db = setup().await;
    let user_repo = SurrealUserRepository::new(db.clone());
    let role_repo = SurrealRoleRepository::new(db);

    let principal = user_repo.get_by_id(SYSTEM_USER_ID).await.unwrap();
    assert_eq!(principal.username, "system");
    assert!(principal.active);
    assert_eq!(principal.tenant_id, None);

    let roles = role_repo.get_user_roles(SYSTEM_USER_ID).await.unwrap();
    assert!(roles.iter().any(|r| r.name == "system"));
}

#[tokio::test]
async fn seed_is_idempotent() {
    let db = setup().await;

    // Run again — should not fail or duplicate anything.
    estaria_db::run_seed(&db).await.unwrap();

    let role_repo = SurrealRoleRepository::new(db.clone());
    let ability_repo = SurrealAbilityRepository::new(db.clone());

    let admin = role_repo.get_by_name("admin").await.unwrap();
    let abilities = ability_repo.list_by_role(admin.id).await.unwrap();
    assert_eq!(abilities.len(), 1, "abilities must not be duplicated");

    let roles = role_repo.get_user_roles(SYSTEM_USER_ID).await.unwrap();
    assert_eq!(roles.len(), 1, "system role assignment must not duplicate");
}
