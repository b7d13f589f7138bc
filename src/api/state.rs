use std::sync::Arc;

use crate::data::MarketDataProvider;
use crate::pricing::TradingCalendar;
use crate::scan::ScanConfig;
use crate::store::WatchlistStore;

/// Shared handler state. The provider is already cache-wrapped; handlers
/// never talk to the upstream directly.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MarketDataProvider>,
    pub store: Arc<WatchlistStore>,
    pub calendar: TradingCalendar,
    pub scan: ScanConfig,
}

impl AppState {
    pub fn new(provider: Arc<dyn MarketDataProvider>, store: Arc<WatchlistStore>) -> Self {
        Self {
            provider,
            store,
            calendar: TradingCalendar::default(),
            scan: ScanConfig::default(),
        }
    }
}
