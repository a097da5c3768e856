//! Coffee catalog server.
//!
//! Serves a small seeded coffee catalog and a per-request stream of
//! synthetic order events over server-sent events.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use cofsvc_core::catalog::{Catalog, MemoryCatalog, seed_catalog};
use cofsvc_core::framework::DatabaseProcessor;
use config::file::{CatalogBackend, FileConfig};
use config::{ConfigLoader, get_database_url};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Coffee catalog and order stream server
#[derive(Parser, Debug)]
#[command(name = "cofsvc-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "COFSVC_CONFIG", default_value = "./cofsvc-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long, env = "COFSVC_LISTEN")]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup (postgres backend only)
    #[arg(long, default_value = "false")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting cofsvc-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;
    let listen_addr = config.server.listen;

    // Open the catalog backend
    let catalog = open_catalog(&config, args.migrate).await?;
    tracing::info!(backend = catalog.backend_name(), "Catalog ready");

    // Seed before accepting connections
    seed_catalog(&catalog, config.catalog.seed.as_slice())
        .await
        .map_err(|e| {
            tracing::error!("Failed to seed catalog: {}", e);
            e
        })?;

    // Create application state
    let state = AppState::new(catalog.clone(), config);

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    // Build the router
    let orders = state.orders.clone();
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr, orders).await;

    // Signal the config reload handler to stop
    shutdown_notify.notify_one();

    // Close database connections gracefully
    if let Catalog::Postgres(db) = &catalog {
        tracing::info!("Closing database connections...");
        db.pool.close().await;
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Build the catalog selected in the configuration.
async fn open_catalog(config: &FileConfig, migrate: bool) -> anyhow::Result<Catalog> {
    match config.catalog.backend {
        CatalogBackend::Memory => {
            if migrate {
                tracing::warn!("--migrate has no effect with the memory catalog");
            }
            Ok(Catalog::Memory(MemoryCatalog::new()))
        }
        CatalogBackend::Postgres => {
            // Get database URL from environment
            let database_url = get_database_url().map_err(|e| {
                tracing::error!("DATABASE_URL environment variable not set");
                e
            })?;

            // Create database connection pool
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(&database_url)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to connect to database: {}", e);
                    e
                })?;
            tracing::info!("Database connection established");

            // Run migrations if requested
            if migrate {
                tracing::info!("Running database migrations...");
                sqlx::migrate!("../migrations")
                    .run(&pool)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to run migrations: {}", e);
                        e
                    })?;
                tracing::info!("Migrations completed successfully");
            }

            Ok(Catalog::Postgres(DatabaseProcessor { pool }))
        }
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
