//! # Saffron API Server
//!
//! ```text
//! saffron-api [--config <path>]
//! ```
//!
//! Configuration comes from the TOML file and `SAFFRON_*` variables (see
//! [`saffron_api::config`]). `RUST_LOG` overrides the configured log level.

use std::path::PathBuf;

use anyhow::{bail, Context};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use saffron_api::auth::JwtManager;
use saffron_api::{create_app, ApiConfig, AppState};
use saffron_db::Database;
use saffron_kitchen::KitchenHub;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = parse_args()?;
    let config = ApiConfig::load(config_path).context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();

    info!("Starting Saffron API server...");
    info!(
        bind = %config.bind_address(),
        database = %config.database.path.display(),
        kitchen_capacity = config.kitchen.channel_capacity,
        "Configuration loaded"
    );

    if config.uses_dev_secret() {
        warn!("Using the built-in development JWT secret; set SAFFRON_JWT_SECRET for production");
    }

    let db = Database::new(config.db_config())
        .await
        .context("Failed to open database")?;
    info!("Database ready");

    let hub = KitchenHub::new(config.kitchen.channel_capacity)?;
    let state = AppState::new(db.clone(), hub, JwtManager::new(&config.auth.jwt_secret));
    let app = create_app(state);

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    info!(addr = %config.bind_address(), "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

fn parse_args() -> anyhow::Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    let mut config_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().context("--config requires a path")?;
                config_path = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                println!("Usage: saffron-api [--config <path>]");
                std::process::exit(0);
            }
            other => bail!("Unknown argument: {}", other),
        }
    }

    Ok(config_path)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
