//! TTL cache over a market-data provider
//!
//! Quotes and expiry lists are small and hammered by the scanner, so
//! they get a short in-memory TTL. Full chains and history are large
//! and always fetched fresh.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::core::{ChainSnapshot, DashResult, PriceHistory, StockQuote};

use super::provider::{HistoryRange, MarketDataProvider};

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            enabled: true,
        }
    }
}

struct Entry<T> {
    value: T,
    stored_at: Instant,
}

impl<T: Clone> Entry<T> {
    fn fresh(&self, ttl: Duration) -> Option<T> {
        (self.stored_at.elapsed() < ttl).then(|| self.value.clone())
    }
}

/// Caching wrapper around any provider.
pub struct CachedProvider<P> {
    inner: P,
    config: CacheConfig,
    quotes: Mutex<HashMap<String, Entry<StockQuote>>>,
    expirations: Mutex<HashMap<String, Entry<Vec<NaiveDate>>>>,
}

impl<P: MarketDataProvider> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self::with_config(inner, CacheConfig::default())
    }

    pub fn with_config(inner: P, config: CacheConfig) -> Self {
        Self {
            inner,
            config,
            quotes: Mutex::new(HashMap::new()),
            expirations: Mutex::new(HashMap::new()),
        }
    }

    fn lookup<T: Clone>(&self, map: &Mutex<HashMap<String, Entry<T>>>, key: &str) -> Option<T> {
        if !self.config.enabled {
            return None;
        }
        let map = map.lock().unwrap();
        map.get(key).and_then(|e| e.fresh(self.config.ttl))
    }

    fn store<T: Clone>(&self, map: &Mutex<HashMap<String, Entry<T>>>, key: &str, value: &T) {
        if !self.config.enabled {
            return;
        }
        let mut map = map.lock().unwrap();
        map.insert(
            key.to_string(),
            Entry {
                value: value.clone(),
                stored_at: Instant::now(),
            },
        );
    }
}

impl<P: MarketDataProvider> MarketDataProvider for CachedProvider<P> {
    fn stock_quote(&self, symbol: &str) -> DashResult<StockQuote> {
        let key = symbol.to_uppercase();
        if let Some(hit) = self.lookup(&self.quotes, &key) {
            return Ok(hit);
        }
        let quote = self.inner.stock_quote(symbol)?;
        self.store(&self.quotes, &key, &quote);
        Ok(quote)
    }

    fn expirations(&self, symbol: &str) -> DashResult<Vec<NaiveDate>> {
        let key = symbol.to_uppercase();
        if let Some(hit) = self.lookup(&self.expirations, &key) {
            return Ok(hit);
        }
        let dates = self.inner.expirations(symbol)?;
        self.store(&self.expirations, &key, &dates);
        Ok(dates)
    }

    fn option_chain(&self, symbol: &str, expiry: NaiveDate) -> DashResult<ChainSnapshot> {
        self.inner.option_chain(symbol, expiry)
    }

    fn price_history(&self, symbol: &str, range: &HistoryRange) -> DashResult<PriceHistory> {
        self.inner.price_history(symbol, range)
    }
}
