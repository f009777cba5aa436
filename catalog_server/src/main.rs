//! Catalog Server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use catalog_server::config::ServerConfig;
use catalog_server::routes::{build_router, AppState};
use catalog_server::services::user_service;
use catalog_server::store::{DynStore, MemoryStore, PgStore};
use catalog_server::{metrics, seeder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StorageKind {
    Postgres,
    Memory,
}

#[derive(Parser)]
#[command(name = "catalog-server", about = "Product catalog and lead-capture API")]
struct Cli {
    /// Server port
    #[arg(short, long, env = "CATALOG_PORT", default_value = "3002")]
    port: u16,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Storage backend
    #[arg(long, env = "CATALOG_STORAGE", value_enum, default_value = "postgres")]
    storage: StorageKind,

    /// Load the built-in catalog at startup
    #[arg(long)]
    seed: bool,

    /// Ensure this admin account exists at startup
    #[arg(long, env = "CATALOG_ADMIN_EMAIL", requires = "admin_password")]
    admin_email: Option<String>,

    #[arg(long, env = "CATALOG_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    }

    let cli = Cli::parse();
    let config = Arc::new(ServerConfig::from_env());

    tracing::info!("Starting Catalog Server...");

    let store: DynStore = match cli.storage {
        StorageKind::Postgres => {
            let db_url = cli
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for postgres storage"))?;
            let store = PgStore::connect(db_url, config.db_pool_size)?;
            store.run_migrations().await?;
            Arc::new(store)
        }
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage -- data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    if cli.seed || cli.storage == StorageKind::Memory {
        seeder::seed_catalog(store.as_ref()).await?;
    }

    if let (Some(email), Some(password)) = (&cli.admin_email, &cli.admin_password) {
        let admin = user_service::upsert_admin(
            store.as_ref(),
            email,
            password,
            user_service::DEFAULT_ADMIN_NAME,
        )
        .await?;
        tracing::info!(email = %admin.email, "Bootstrap admin ready");
    }

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let app = build_router(AppState::new(store, config.clone()));

    // Initialize metrics
    metrics::init_metrics();

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    tracing::info!("Catalog Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
