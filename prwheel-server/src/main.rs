//! Prwheel server - HTTP surface for the reviewer-assignment service

mod handlers;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use prwheel_db::Database;

use crate::state::AppState;

/// Reviewer assignment service for pull requests
#[derive(Parser, Debug)]
#[command(name = "prwheel-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to bind the HTTP listener to
    #[arg(long, env = "PRWHEEL_ADDR", default_value = "0.0.0.0:8080")]
    addr: SocketAddr,

    /// SQLite database path (defaults to ~/.local/share/prwheel/prwheel.db)
    #[arg(long, env = "PRWHEEL_DB")]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let db_path = match cli.db {
        Some(path) => path,
        None => Database::default_path()?,
    };
    let db = Database::new(&db_path).await?;
    tracing::info!(db_path = %db_path.display(), "database ready");

    let app = routes::router(AppState::from_database(&db));

    let listener = tokio::net::TcpListener::bind(cli.addr).await?;
    tracing::info!(addr = %cli.addr, "server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server exited");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}
