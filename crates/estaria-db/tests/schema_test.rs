//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    estaria_db::run_migrations(&db).await.unwrap();

    // Verify that key tables exist by querying INFO FOR DB.
    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("tenant"), "missing tenant table");
    assert!(info_str.contains("user"), "missing user table");
    assert!(info_str.contains("role"), "missing role table");
    assert!(info_str.contains("ability"), "missing ability table");
    assert!(
        info_str.contains("user_ability"),
        "missing user_ability table"
    );

    // Verify edge tables.
    assert!(info_str.contains("has_role"), "missing has_role edge");

    // Verify migration was recorded.
    assert!(info_str.contains("_migration"), "missing _migration table");
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    // Run twice — should not fail.
    estaria_db::run_migrations(&db).await.unwrap();
    estaria_db::run_migrations(&db).await.unwrap();

    // Verify only one migration record exists.
    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn can_create_record_after_migration() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    estaria_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE tenant SET \
         domain = 'acme.example.com', \
         code = 'acme', \
         name = 'ACME Realty', \
         settings = {}",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    let mut result = db
        .query("SELECT * FROM tenant WHERE code = 'acme'")
        .await
        .unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn unique_index_prevents_duplicate_domains() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    estaria_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE tenant SET \
         domain = 'acme.example.com', \
         code = 'acme', \
         name = 'ACME Realty', \
         settings = {}",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    // Same domain, different code — should fail on the domain index.
    let result = db
        .query(
            "CREATE tenant SET \
             domain = 'acme.example.com', \
             code = 'acme-two', \
             name = 'Other Corp', \
             settings = {}",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "duplicate domain should be rejected");
}

#[tokio::test]
async fn soft_deleted_rows_do_not_block_uniqueness() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    estaria_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE tenant SET \
         domain = 'acme.example.com', code = 'acme', \
         name = 'ACME Realty', settings = {}, \
         deleted_at = time::now()",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    // A live row with the same domain must be allowed: the unique
    // index spans (domain, deleted_at) and the deleted row carries a
    // timestamp.
    let result = db
        .query(
            "CREATE tenant SET \
             domain = 'acme.example.com', code = 'acme', \
             name = 'ACME Realty Again', settings = {}",
        )
        .await
        .unwrap()
        .check();

    assert!(
        result.is_ok(),
        "soft-deleted row should not block a new live row: {result:?}"
    );
}
