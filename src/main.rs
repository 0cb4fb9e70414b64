use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shiftstay::backend::select_backend;
use shiftstay::config::Config;
use shiftstay::store::{seed, snapshot, Store};
use shiftstay::{sync, AppState};

#[derive(Parser, Debug)]
#[command(name = "shiftstay")]
#[command(author, version, about = "Short-term housing matching for travel nurses", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "shiftstay.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;

    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ShiftStay v{}", env!("CARGO_PKG_VERSION"));

    shiftstay::utils::ensure_dir(&config.server.data_dir)?;

    let backend = select_backend(&config.remote);
    tracing::info!(backend = backend.name(), "Selected backend");

    let mut store = Store::new();
    match snapshot::load(&config.server.data_dir)? {
        Some(snap) => store.apply_snapshot(snap),
        None => tracing::info!("No session snapshot found, starting fresh"),
    }
    // Demo data keeps the local backend usable out of the box; a remote
    // backend supplies real listings through the first sync instead.
    if !backend.is_remote() && store.listings.is_empty() {
        seed::seed_demo_data(&mut store);
        tracing::info!("Seeded demo data");
    }

    let state = Arc::new(AppState::new(config.clone(), store, backend));

    if state.backend.is_remote() {
        let report = sync::sync_from_remote(&state).await;
        tracing::info!(
            listings_added = report.listings.added,
            contracts_added = report.contracts.added,
            matches_added = report.matches.added,
            errors = report.errors,
            "Initial sync complete"
        );
    }

    sync::spawn_hold_expiry_task(state.clone());
    sync::spawn_snapshot_task(state.clone());

    let app = shiftstay::api::create_router(state.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = sync::save_snapshot(&state) {
        tracing::warn!(error = %e, "Final snapshot write failed");
    }
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
