//! SurrealDB connection management.
//!
//! [`DbConfig`] is populated from defaults or from `ESTARIA_DB_*`
//! environment variables; [`DbManager`] owns the client and runs the
//! storage bootstrap (migrations, then seed) on request.

use estaria_core::error::EstariaResult;
use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

/// Configuration for connecting to SurrealDB.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket URL (e.g., `127.0.0.1:8000`).
    pub url: String,
    /// SurrealDB namespace.
    pub namespace: String,
    /// SurrealDB database name.
    pub database: String,
    /// Root username for authentication.
    pub username: String,
    /// Root password for authentication.
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "estaria".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Build a config from `ESTARIA_DB_URL`, `ESTARIA_DB_NAMESPACE`,
    /// `ESTARIA_DB_DATABASE`, `ESTARIA_DB_USERNAME` and
    /// `ESTARIA_DB_PASSWORD`, falling back to the defaults for any
    /// variable that is unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_or("ESTARIA_DB_URL", defaults.url),
            namespace: env_or("ESTARIA_DB_NAMESPACE", defaults.namespace),
            database: env_or("ESTARIA_DB_DATABASE", defaults.database),
            username: env_or("ESTARIA_DB_USERNAME", defaults.username),
            password: env_or("ESTARIA_DB_PASSWORD", defaults.password),
        }
    }
}

/// Manages a connection to SurrealDB.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect to SurrealDB using the provided configuration.
    ///
    /// Authenticates as root, selects the configured namespace and
    /// database, and returns a ready-to-use manager.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!("Successfully connected to SurrealDB");

        Ok(Self { db })
    }

    /// Bring storage up to date: apply pending migrations, then ensure
    /// the bootstrap roles, abilities and system principal exist.
    pub async fn bootstrap(&self) -> EstariaResult<()> {
        crate::schema::run_migrations(&self.db).await?;
        crate::seed::run_seed(&self.db).await
    }

    /// Returns a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}
