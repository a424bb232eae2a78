//! Integration tests for the User repository using in-memory SurrealDB.

use estaria_core::error::EstariaError;
use estaria_core::models::role::CreateRole;
use estaria_core::models::tenant::CreateTenant;
use estaria_core::models::user::{CreateUser, UpdateUser};
use estaria_core::repository::{Pagination, RoleRepository, TenantRepository, UserRepository};
use estaria_db::repository::{
    SurrealRoleRepository, SurrealTenantRepository, SurrealUserRepository, verify_password,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB, run migrations, create a tenant.
async fn setup() -> (Surreal<surrealdb::engine::local::Db>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    estaria_db::run_migrations(&db).await.unwrap();

    let tenant_repo = SurrealTenantRepository::new(db.clone());
    let tenant = tenant_repo
        .create(CreateTenant {
            domain: "acme.example.com".into(),
            code: "acme".into(),
            name: "ACME Realty".into(),
            settings: None,
        })
        .await
        .unwrap();

    (db, tenant.id)
}

fn alice(tenant_id: Uuid) -> CreateUser {
    CreateUser {
        tenant_id: Some(tenant_id),
        username: "alice".into(),
        email: "alice@example.com".into(),
        password: "correct-horse-battery".into(),
        created_by: None,
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(alice(tenant_id)).await.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.tenant_id, Some(tenant_id));
    assert!(user.active);

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);

    let by_username = repo.get_by_username("alice").await.unwrap();
    assert_eq!(by_username.id, user.id);

    let by_email = repo.get_by_email("alice@example.com").await.unwrap();
    assert_eq!(by_email.id, user.id);
}

#[tokio::test]
async fn password_is_hashed_with_argon2id() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(alice(tenant_id)).await.unwrap();

    assert_ne!(user.password_hash, "correct-horse-battery");
    assert!(user.password_hash.starts_with("$argon2id$"));
    assert!(verify_password("correct-horse-battery", &user.password_hash, None).unwrap());
    assert!(!verify_password("wrong", &user.password_hash, None).unwrap());
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(alice(tenant_id)).await.unwrap();

    let result = repo
        .create(CreateUser {
            tenant_id: Some(tenant_id),
            username: "alice2".into(),
            email: "alice@example.com".into(),
            password: "pass".into(),
            created_by: None,
        })
        .await;

    assert!(
        matches!(result, Err(EstariaError::AlreadyExists { .. })),
        "expected AlreadyExists, got: {result:?}"
    );
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(alice(tenant_id)).await.unwrap();

    let result = repo
        .create(CreateUser {
            tenant_id: Some(tenant_id),
            username: "alice".into(),
            email: "alice2@example.com".into(),
            password: "pass".into(),
            created_by: None,
        })
        .await;

    assert!(matches!(result, Err(EstariaError::AlreadyExists { .. })));
}

#[tokio::test]
async fn update_user() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(alice(tenant_id)).await.unwrap();
    let admin_id = Uuid::new_v4();

    let updated = repo
        .update(
            user.id,
            UpdateUser {
                email: Some("alice@acme.example.com".into()),
                active: Some(false),
                updated_by: Some(admin_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.email, "alice@acme.example.com");
    assert!(!updated.active);
    assert_eq!(updated.updated_by, Some(admin_id));
    assert_eq!(updated.username, "alice"); // unchanged
}

#[tokio::test]
async fn detach_user_from_tenant() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(alice(tenant_id)).await.unwrap();

    let updated = repo
        .update(
            user.id,
            UpdateUser {
                tenant_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.tenant_id, None);
}

#[tokio::test]
async fn soft_deleted_user_is_invisible_and_email_is_reusable() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(alice(tenant_id)).await.unwrap();
    repo.delete(user.id).await.unwrap();

    let result = repo.get_by_id(user.id).await;
    assert!(matches!(result, Err(EstariaError::NotFound { .. })));

    let result = repo.get_by_email("alice@example.com").await;
    assert!(matches!(result, Err(EstariaError::NotFound { .. })));

    // Re-registration with the same email and username succeeds.
    let recreated = repo.create(alice(tenant_id)).await;
    assert!(recreated.is_ok(), "expected reuse to succeed: {recreated:?}");
}

#[tokio::test]
async fn deleting_user_removes_its_role_assignments() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db.clone());
    let role_repo = SurrealRoleRepository::new(db);

    let user = repo.create(alice(tenant_id)).await.unwrap();
    let role = role_repo
        .create(CreateRole {
            name: "viewer".into(),
            description: "Can view".into(),
        })
        .await
        .unwrap();
    role_repo
        .assign_to_user(user.id, role.id, None)
        .await
        .unwrap();

    repo.delete(user.id).await.unwrap();

    let roles = role_repo.get_user_roles(user.id).await.unwrap();
    assert!(roles.is_empty(), "assignments should be removed with the user");

    // The role itself is untouched.
    assert!(role_repo.get_by_id(role.id).await.is_ok());
}

#[tokio::test]
async fn list_users_is_tenant_scoped() {
    let (db, tenant_id) = setup().await;
    let tenant_repo = SurrealTenantRepository::new(db.clone());
    let repo = SurrealUserRepository::new(db);

    let other = tenant_repo
        .create(CreateTenant {
            domain: "other.example.com".into(),
            code: "other".into(),
            name: "Other Agency".into(),
            settings: None,
        })
        .await
        .unwrap();

    repo.create(alice(tenant_id)).await.unwrap();
    repo.create(CreateUser {
        tenant_id: Some(other.id),
        username: "bob".into(),
        email: "bob@example.com".into(),
        password: "pass123".into(),
        created_by: None,
    })
    .await
    .unwrap();

    let page = repo.list(tenant_id, Pagination::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].username, "alice");
}
