//! Grade-tonnage HTTP server binary.
//!
//! Loads the configuration, builds the deposit repository, sets up the HTTP
//! router and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Empty in-memory repository
//! cargo run --bin gtm-server
//!
//! # Seeded from a snapshot file
//! GTM_SNAPSHOT_PATH=data/sites.json cargo run --bin gtm-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `GTM_SNAPSHOT_PATH`: JSON snapshot loaded into the local repository
//! - `GTM_DEFAULT_PROXIMITY_KM`, `GTM_REPRESENTATIVE`: model defaults
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use gtm_rust::config::AppConfig;
use gtm_rust::db::RepositoryFactory;
use gtm_rust::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting grade-tonnage HTTP server");

    let config = AppConfig::load()?;
    let repository = RepositoryFactory::from_settings(&config.repository)?;
    info!(
        repository = %config.repository.repo_type,
        "Repository initialized successfully"
    );

    let state = AppState::from_config(repository, &config);
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
