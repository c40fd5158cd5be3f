use anyhow::Result;
use persistence::MemoryStore;
use tracing::{info, warn};

use marketplace_admin_api::{
    app::{create_app, Services},
    config::{Config, StorageBackend},
    middleware,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics()?;

    info!("Starting Marketplace Admin API v{}", env!("CARGO_PKG_VERSION"));

    let services = match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = persistence::db::create_pool(&config.database).await?;
            persistence::db::run_migrations(&pool).await?;

            Services::postgres(pool)
        }
        StorageBackend::Memory => {
            warn!("Using in-process storage; data is lost on restart");
            Services::memory(MemoryStore::seeded())
        }
    };

    let addr = config.socket_addr()?;
    let app = create_app(config, services);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
