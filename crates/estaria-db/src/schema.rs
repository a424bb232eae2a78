//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Soft delete is a `deleted_at`
//! timestamp; uniqueness "among live rows" is enforced with unique
//! indexes spanning `(key columns, deleted_at)` — live rows all share
//! `deleted_at = NONE` and therefore collide, while soft-deleted rows
//! carry distinct timestamps and do not.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenants (global scope)
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD domain ON TABLE tenant TYPE string;
DEFINE FIELD code ON TABLE tenant TYPE string;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD active ON TABLE tenant TYPE bool DEFAULT true;
DEFINE FIELD settings ON TABLE tenant TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD deleted_at ON TABLE tenant TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_domain ON TABLE tenant \
    COLUMNS domain, deleted_at UNIQUE;
DEFINE INDEX idx_tenant_code ON TABLE tenant \
    COLUMNS code, deleted_at UNIQUE;

-- =======================================================================
-- Users (global scope; tenant link survives tenant removal as NONE)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE user TYPE option<string>;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD active ON TABLE user TYPE bool DEFAULT true;
DEFINE FIELD created_by ON TABLE user TYPE option<string>;
DEFINE FIELD updated_by ON TABLE user TYPE option<string>;
DEFINE FIELD deleted_at ON TABLE user TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_username ON TABLE user \
    COLUMNS username, deleted_at UNIQUE;
DEFINE INDEX idx_user_email ON TABLE user \
    COLUMNS email, deleted_at UNIQUE;
DEFINE INDEX idx_user_tenant ON TABLE user COLUMNS tenant_id;

-- =======================================================================
-- Roles (global scope)
-- =======================================================================
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD name ON TABLE role TYPE string;
DEFINE FIELD description ON TABLE role TYPE string;
DEFINE FIELD deleted_at ON TABLE role TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_name ON TABLE role \
    COLUMNS name, deleted_at UNIQUE;

-- =======================================================================
-- Abilities (role-level permission rules; removed with their role)
-- =======================================================================
DEFINE TABLE ability SCHEMAFULL;
DEFINE FIELD role_id ON TABLE ability TYPE string;
DEFINE FIELD action ON TABLE ability TYPE string;
DEFINE FIELD subject ON TABLE ability TYPE string;
DEFINE FIELD conditions ON TABLE ability TYPE option<object> FLEXIBLE;
DEFINE FIELD inverted ON TABLE ability TYPE bool DEFAULT false;
DEFINE FIELD priority ON TABLE ability TYPE int DEFAULT 1;
DEFINE FIELD created_at ON TABLE ability TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE ability TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_ability_role ON TABLE ability COLUMNS role_id;

-- =======================================================================
-- User abilities (per-user, tenant-scoped overrides)
-- =======================================================================
DEFINE TABLE user_ability SCHEMAFULL;
DEFINE FIELD user_id ON TABLE user_ability TYPE string;
DEFINE FIELD tenant_id ON TABLE user_ability TYPE string;
DEFINE FIELD action ON TABLE user_ability TYPE string;
DEFINE FIELD subject ON TABLE user_ability TYPE string;
DEFINE FIELD conditions ON TABLE user_ability TYPE option<object> \
    FLEXIBLE;
DEFINE FIELD inverted ON TABLE user_ability TYPE bool DEFAULT false;
DEFINE FIELD role_context_id ON TABLE user_ability TYPE option<string>;
DEFINE FIELD priority ON TABLE user_ability TYPE int DEFAULT 1;
DEFINE FIELD deleted_at ON TABLE user_ability TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE user_ability TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user_ability TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_ability_user ON TABLE user_ability \
    COLUMNS user_id, tenant_id;

-- =======================================================================
-- Graph Edge Tables (relations)
-- =======================================================================

-- User -> Role assignment, with audit fields.
DEFINE TABLE has_role TYPE RELATION SCHEMAFULL;
DEFINE FIELD created_by ON TABLE has_role TYPE option<string>;
DEFINE FIELD updated_by ON TABLE has_role TYPE option<string>;
DEFINE FIELD deleted_at ON TABLE has_role TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE has_role TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE has_role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_has_role_pair ON TABLE has_role \
    COLUMNS in, out, deleted_at UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
