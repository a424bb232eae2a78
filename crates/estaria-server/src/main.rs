//! ESTARIA Server — Application entry point.

use estaria_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("estaria=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting ESTARIA server...");

    let config = DbConfig::from_env();
    let manager = match DbManager::connect(&config).await {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = manager.bootstrap().await {
        tracing::error!(error = %e, "Storage bootstrap failed");
        std::process::exit(1);
    }

    tracing::info!("Storage ready");

    // TODO: Start REST API gateway routes

    tracing::info!("ESTARIA server stopped.");
}
