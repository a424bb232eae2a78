//! Integration tests for the Tenant repository using in-memory SurrealDB.

use estaria_core::error::EstariaError;
use estaria_core::models::tenant::{CreateTenant, UpdateTenant};
use estaria_core::models::user::CreateUser;
use estaria_core::repository::{Pagination, TenantRepository, UserRepository};
use estaria_db::repository::{SurrealTenantRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    estaria_db::run_migrations(&db).await.unwrap();
    db
}

fn acme() -> CreateTenant {
    CreateTenant {
        domain: "acme.example.com".into(),
        code: "acme".into(),
        name: "ACME Realty".into(),
        settings: None,
    }
}

#[tokio::test]
async fn create_and_get_tenant() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo.create(acme()).await.unwrap();
    assert_eq!(tenant.domain, "acme.example.com");
    assert_eq!(tenant.code, "acme");
    assert!(tenant.active);
    assert!(tenant.deleted_at.is_none());

    let fetched = repo.get_by_id(tenant.id).await.unwrap();
    assert_eq!(fetched.id, tenant.id);

    let by_domain = repo.get_by_domain("acme.example.com").await.unwrap();
    assert_eq!(by_domain.id, tenant.id);

    let by_code = repo.get_by_code("acme").await.unwrap();
    assert_eq!(by_code.id, tenant.id);
}

#[tokio::test]
async fn update_tenant() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo.create(acme()).await.unwrap();

    let updated = repo
        .update(
            tenant.id,
            UpdateTenant {
                name: Some("ACME Group".into()),
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "ACME Group");
    assert!(!updated.active);
    assert_eq!(updated.domain, "acme.example.com"); // unchanged
}

#[tokio::test]
async fn duplicate_domain_is_a_conflict() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    repo.create(acme()).await.unwrap();

    let result = repo
        .create(CreateTenant {
            domain: "acme.example.com".into(),
            code: "acme-two".into(),
            name: "Impostor".into(),
            settings: None,
        })
        .await;

    assert!(
        matches!(result, Err(EstariaError::AlreadyExists { .. })),
        "expected AlreadyExists, got: {result:?}"
    );
}

#[tokio::test]
async fn duplicate_code_is_a_conflict() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    repo.create(acme()).await.unwrap();

    let result = repo
        .create(CreateTenant {
            domain: "other.example.com".into(),
            code: "acme".into(),
            name: "Impostor".into(),
            settings: None,
        })
        .await;

    assert!(matches!(result, Err(EstariaError::AlreadyExists { .. })));
}

#[tokio::test]
async fn soft_deleted_tenant_is_invisible() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    let tenant = repo.create(acme()).await.unwrap();
    repo.delete(tenant.id).await.unwrap();

    let result = repo.get_by_id(tenant.id).await;
    assert!(matches!(result, Err(EstariaError::NotFound { .. })));

    let result = repo.get_by_domain("acme.example.com").await;
    assert!(matches!(result, Err(EstariaError::NotFound { .. })));

    let page = repo.list(Pagination::default()).await.unwrap();
    assert_eq!(page.total, 0);

    // The domain and code are free for reuse.
    let recreated = repo.create(acme()).await;
    assert!(recreated.is_ok(), "expected reuse to succeed: {recreated:?}");
}

#[tokio::test]
async fn deleting_tenant_detaches_users() {
    let db = setup().await;
    let tenant_repo = SurrealTenantRepository::new(db.clone());
    let user_repo = SurrealUserRepository::new(db);

    let tenant = tenant_repo.create(acme()).await.unwrap();
    let user = user_repo
        .create(CreateUser {
            tenant_id: Some(tenant.id),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "correct-horse-battery".into(),
            created_by: None,
        })
        .await
        .unwrap();
    assert_eq!(user.tenant_id, Some(tenant.id));

    tenant_repo.delete(tenant.id).await.unwrap();

    // The user outlives its tenant with tenant_id cleared.
    let detached = user_repo.get_by_id(user.id).await.unwrap();
    assert_eq!(detached.tenant_id, None);
    assert!(detached.deleted_at.is_none());
}

#[tokio::test]
async fn list_tenants_with_pagination() {
    let db = setup().await;
    let repo = SurrealTenantRepository::new(db);

    for i in 0..5 {
        repo.create(CreateTenant {
            domain: format!("agency-{i}.example.com"),
            code: format!("agency-{i}"),
            name: format!("Agency {i}"),
            settings: None,
        })
        .await
        .unwrap();
    }

    let page1 = repo
        .list(Pagination {
            offset: 0,
            limit: 3,
        })
        .await
        .unwrap();

    assert_eq!(page1.items.len(), 3);
    assert_eq!(page1.total, 5);

    let page2 = repo
        .list(Pagination {
            offset: 3,
            limit: 3,
        })
        .await
        .unwrap();

    assert_eq!(page2.items.len(), 2);
}
