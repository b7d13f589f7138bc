//! HTTP API
//!
//! Thin axum layer over the library: every handler parses the request,
//! hands the blocking data work to the blocking pool and serializes the
//! result. CORS is wide open; the dashboard frontend is served from a
//! different origin.

pub mod error;
pub mod handlers;
pub mod state;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::data::{CachedProvider, YahooClient};
use crate::store::WatchlistStore;

use state::AppState;

/// Server binary configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            db_path: PathBuf::from("optiondash.db"),
        }
    }
}

/// Build the full route table over the given state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // Market data
        .route("/api/quote/{ticker}", get(handlers::quote))
        .route("/api/options/{ticker}", get(handlers::options))
        .route("/api/history/{ticker}", get(handlers::history))
        .route("/api/top-volume/{ticker}", get(handlers::top_volume))
        // Scanner
        .route("/api/scan", get(handlers::scan))
        .route("/api/search", post(handlers::search))
        // Watchlist
        .route(
            "/api/watchlist/tickers",
            get(handlers::list_watched_tickers).post(handlers::add_watched_ticker),
        )
        .route(
            "/api/watchlist/tickers/{symbol}",
            delete(handlers::remove_watched_ticker),
        )
        .route(
            "/api/watchlist/tickers/{symbol}/levels",
            get(handlers::get_ticker_levels).put(handlers::update_ticker_levels),
        )
        .route(
            "/api/watchlist/options",
            get(handlers::list_watched_options).post(handlers::add_watched_option),
        )
        .route(
            "/api/watchlist/options/{contract_symbol}",
            delete(handlers::remove_watched_option),
        )
        .layer(cors)
        .with_state(state)
}

/// Open the store, wire the cached Yahoo provider and serve forever.
pub async fn serve(config: &ServerConfig) -> Result<()> {
    if let Some(dir) = config.db_path.parent().filter(|p| *p != Path::new("")) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating data dir {}", dir.display()))?;
    }

    let store = WatchlistStore::open(&config.db_path)
        .with_context(|| format!("opening database at {}", config.db_path.display()))?;
    let provider = CachedProvider::new(YahooClient::new());
    let state = AppState::new(Arc::new(provider), Arc::new(store));

    let app = router(state);
    let addr = format!("{}:{}", config.host, config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;
    tracing::info!(%addr, "API server listening");

    axum::serve(listener, app).await.context("running server")?;
    Ok(())
}
