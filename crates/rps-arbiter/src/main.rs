//! RPS Arbiter Service
//!
//! HTTP front for the wagered commit-reveal Rock-Paper-Scissors registry.

mod config;
mod handlers;
mod routes;
mod state;

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::ServiceConfig;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env()?;
    tracing::info!(
        reveal_timeout_secs = config.reveal_timeout_secs,
        starting_balance = config.starting_balance,
        "Arbiter configured"
    );

    let state = AppState::new(config.arbiter_config(), config.starting_balance);
    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Arbiter service starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
