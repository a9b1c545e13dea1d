//! Guild leaderboard HTTP server.
//!
//! Loads `guild.toml` (or built-in defaults), builds the record store, sets up
//! the HTTP router and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin guild-server
//!
//! # Debug logging on another port
//! RUST_LOG=debug PORT=9000 cargo run --bin guild-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (overrides `[server] host`, default 0.0.0.0)
//! - `PORT`: Server port (overrides `[server] port`, default 8080)
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use guild_ranks::db::{PlayerRepository, RecordRepository, RepositoryConfig, RepositoryFactory};
use guild_ranks::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting guild leaderboard server");

    let config = RepositoryConfig::load_or_default()?;
    let repository = RepositoryFactory::from_repository_config(&config)?;
    info!(
        "Record store ready ({} summaries, {} records)",
        repository.count_players().await?,
        repository.count_records().await?
    );

    let state = AppState::from_config(repository, &config);
    let app = create_router(state);

    let host = env::var("HOST").unwrap_or_else(|_| config.server.host.clone());
    let port = match env::var("PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid PORT '{}'", raw);
            config.server.port
        }),
        Err(_) => config.server.port,
    };
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
