//! Warden Server: application entry point.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use warden_db::DbManager;
use warden_server::{AppState, ServerArgs, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_tracing(args.json_logs)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Warden server");

    let db = DbManager::connect(&args.db_config())
        .await
        .context("connecting to SurrealDB")?;
    warden_db::run_migrations(db.client())
        .await
        .context("applying schema migrations")?;

    let identity_header = args
        .identity_header()
        .context("invalid --identity-header")?;
    let state = AppState::new(db.client().clone(), args.admin_config(), identity_header);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;
    info!(addr = %args.bind, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Warden server stopped");
    Ok(())
}

fn init_tracing(json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("warden=info".parse()?);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
