//! API server binary
//!
//! Serves the dashboard backend. Host, port and database path come from
//! the environment; log filtering follows `RUST_LOG`.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use optiondash::api::{serve, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = ServerConfig::default();
    if let Ok(host) = std::env::var("OPTIONDASH_HOST") {
        config.host = host;
    }
    if let Ok(port) = std::env::var("OPTIONDASH_PORT") {
        config.port = port.parse()?;
    }
    if let Ok(db) = std::env::var("OPTIONDASH_DB") {
        config.db_path = db.into();
    }

    serve(&config).await
}
