//! Request handlers
//!
//! Thin translation between HTTP and the library: parse params, push
//! blocking provider work onto the blocking pool, map `DashError` to a
//! status code. No pricing logic lives here.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::{DashError, EnrichedOption, PriceHistory, StockQuote};
use crate::data::HistoryRange;
use crate::pricing::enrich_chain;
use crate::scan::{find_best_options, scan_market, top_volume_options};
use crate::scan::{MarketScan, ThesisQuery, ThesisResult, TopVolumeReport};
use crate::store::{WatchedOption, WatchedTicker};

use super::error::ApiError;
use super::state::AppState;

fn session_now() -> NaiveDateTime {
    Local::now().naive_local()
}

async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, DashError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
        .map_err(Into::into)
}

// Quotes and history

pub async fn quote(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<StockQuote>, ApiError> {
    let provider = state.provider.clone();
    let quote = blocking(move || provider.stock_quote(&ticker)).await?;
    Ok(Json(quote))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub range: Option<String>,
    pub interval: Option<String>,
}

pub async fn history(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<PriceHistory>, ApiError> {
    let provider = state.provider.clone();
    let range = HistoryRange::new(
        params.range.unwrap_or_else(|| "5d".to_string()),
        params.interval.unwrap_or_else(|| "1m".to_string()),
    );
    let history = blocking(move || provider.price_history(&ticker, &range)).await?;
    Ok(Json(history))
}

// Option chains

#[derive(Debug, Deserialize)]
pub struct ChainParams {
    pub expiry: Option<NaiveDate>,
}

/// Enriched chain for one expiry plus the full expiry list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainReport {
    pub symbol: String,
    pub stock_price: f64,
    pub expiry: NaiveDate,
    pub expirations: Vec<NaiveDate>,
    pub calls: Vec<EnrichedOption>,
    pub puts: Vec<EnrichedOption>,
}

pub async fn options(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(params): Query<ChainParams>,
) -> Result<Json<ChainReport>, ApiError> {
    let provider = state.provider.clone();
    let calendar = state.calendar.clone();
    let now = session_now();

    let report = blocking(move || {
        let quote = provider.stock_quote(&ticker)?;
        let expirations = provider.expirations(&ticker)?;
        let expiry = match params.expiry {
            Some(e) => e,
            None => *expirations
                .first()
                .ok_or_else(|| DashError::missing(format!("No expiries listed for {ticker}")))?,
        };

        let chain = provider.option_chain(&ticker, expiry)?;
        let spot = if chain.stock_price > 0.0 {
            chain.stock_price
        } else {
            quote.price
        };

        Ok(ChainReport {
            symbol: quote.symbol,
            stock_price: spot,
            expiry,
            expirations,
            calls: enrich_chain(
                &chain.calls,
                spot,
                quote.day_high,
                quote.day_low,
                expiry,
                &calendar,
                now,
            ),
            puts: enrich_chain(
                &chain.puts,
                spot,
                quote.day_high,
                quote.day_low,
                expiry,
                &calendar,
                now,
            ),
        })
    })
    .await?;

    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct TopVolumeParams {
    pub limit: Option<usize>,
}

pub async fn top_volume(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(params): Query<TopVolumeParams>,
) -> Result<Json<TopVolumeReport>, ApiError> {
    let provider = state.provider.clone();
    let calendar = state.calendar.clone();
    let limit = params.limit.unwrap_or(10).clamp(1, 50);
    let now = session_now();

    let report = blocking(move || {
        top_volume_options(provider.as_ref(), &calendar, &ticker, limit, now)
    })
    .await?;
    Ok(Json(report))
}

// Scanner and search

pub async fn scan(State(state): State<AppState>) -> Result<Json<MarketScan>, ApiError> {
    let tickers: Vec<String> = state
        .store
        .list_tickers()?
        .into_iter()
        .map(|t| t.symbol)
        .collect();

    let provider = state.provider.clone();
    let calendar = state.calendar.clone();
    let config = state.scan.clone();
    let now = session_now();

    let scan = blocking(move || {
        Ok(scan_market(
            provider.as_ref(),
            &calendar,
            &tickers,
            &config,
            now,
        ))
    })
    .await?;
    Ok(Json(scan))
}

pub async fn search(
    State(state): State<AppState>,
    Json(query): Json<ThesisQuery>,
) -> Result<Json<ThesisResult>, ApiError> {
    let provider = state.provider.clone();
    let now = session_now();
    let result = blocking(move || find_best_options(provider.as_ref(), &query, now)).await?;
    Ok(Json(result))
}

// Watchlist: tickers

pub async fn list_watched_tickers(
    State(state): State<AppState>,
) -> Result<Json<Vec<WatchedTicker>>, ApiError> {
    Ok(Json(state.store.list_tickers()?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTickerRequest {
    pub symbol: String,
    #[serde(default)]
    pub category: Option<String>,
}

pub async fn add_watched_ticker(
    State(state): State<AppState>,
    Json(req): Json<AddTickerRequest>,
) -> Result<Json<Value>, ApiError> {
    let symbol = req.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ApiError::BadRequest("Symbol must not be empty".into()));
    }
    let category = req.category.as_deref().unwrap_or("general");
    state.store.add_ticker(&symbol, category)?;
    Ok(Json(json!({ "added": symbol })))
}

pub async fn remove_watched_ticker(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.remove_ticker(&symbol)? {
        return Err(ApiError::NotFound(format!("{symbol} is not watched")));
    }
    Ok(Json(json!({ "removed": symbol.to_uppercase() })))
}

pub async fn get_ticker_levels(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<WatchedTicker>, ApiError> {
    state
        .store
        .get_ticker(&symbol)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("{symbol} is not watched")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelsRequest {
    #[serde(default)]
    pub support_price: Option<f64>,
    #[serde(default)]
    pub resistance_price: Option<f64>,
}

pub async fn update_ticker_levels(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Json(req): Json<LevelsRequest>,
) -> Result<Json<Value>, ApiError> {
    if !state
        .store
        .update_levels(&symbol, req.support_price, req.resistance_price)?
    {
        return Err(ApiError::NotFound(format!("{symbol} is not watched")));
    }
    Ok(Json(json!({ "updated": symbol.to_uppercase() })))
}

// Watchlist: options

pub async fn list_watched_options(
    State(state): State<AppState>,
) -> Result<Json<Vec<WatchedOption>>, ApiError> {
    Ok(Json(state.store.list_options()?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOptionRequest {
    pub contract_symbol: String,
    pub ticker: String,
    pub strike: f64,
    pub expiry: NaiveDate,
    #[serde(rename = "type")]
    pub kind: crate::core::OptionKind,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn add_watched_option(
    State(state): State<AppState>,
    Json(req): Json<AddOptionRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.contract_symbol.trim().is_empty() {
        return Err(ApiError::BadRequest("Contract symbol must not be empty".into()));
    }
    state.store.add_option(
        req.contract_symbol.trim(),
        &req.ticker,
        req.strike,
        req.expiry,
        req.kind,
        req.notes.as_deref(),
    )?;
    Ok(Json(json!({ "added": req.contract_symbol.trim() })))
}

pub async fn remove_watched_option(
    State(state): State<AppState>,
    Path(contract_symbol): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.remove_option(&contract_symbol)? {
        return Err(ApiError::NotFound(format!(
            "{contract_symbol} is not watched"
        )));
    }
    Ok(Json(json!({ "removed": contract_symbol })))
}
