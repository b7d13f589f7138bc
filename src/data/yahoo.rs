//! Yahoo Finance data client
//!
//! Fetches free delayed quotes, option chains and price history over
//! Yahoo Finance's unofficial API. Data is delayed ~15 minutes and
//! intended for personal/research use.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::core::{
    CandleBar, ChainSnapshot, DashError, DashResult, OptionKind, OptionRow, PriceHistory,
    StockQuote,
};

use super::provider::{HistoryRange, MarketDataProvider};
use super::retry::RetryPolicy;

/// Yahoo Finance API client
pub struct YahooClient {
    client: reqwest::blocking::Client,
    base_url: String,
    chart_url: String,
    retry: RetryPolicy,
}

impl YahooClient {
    pub fn new() -> Self {
        Self::with_retry(RetryPolicy::default())
    }

    pub fn with_retry(retry: RetryPolicy) -> Self {
        Self {
            client: reqwest::blocking::Client::builder()
                .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: "https://query1.finance.yahoo.com/v7/finance".to_string(),
            chart_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            retry,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> DashResult<T> {
        self.retry.run(|| {
            let response = self
                .client
                .get(url)
                .send()
                .map_err(|e| DashError::Network(e.to_string()))?;

            let status = response.status();
            if status.as_u16() == 429 {
                return Err(DashError::RateLimited(format!("{url}: too many requests")));
            }
            if !status.is_success() {
                return Err(DashError::Network(format!("{url}: HTTP {status}")));
            }

            response
                .json::<T>()
                .map_err(|e| DashError::Data(format!("Failed to parse response: {e}")))
        })
    }

    fn options_payload(&self, symbol: &str, date: Option<i64>) -> DashResult<OptionChainData> {
        let url = match date {
            Some(ts) => format!("{}/options/{}?date={}", self.base_url, symbol, ts),
            None => format!("{}/options/{}", self.base_url, symbol),
        };

        let response: OptionsResponse = self.get_json(&url)?;
        response
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| DashError::missing(format!("No options data for {symbol}")))
    }

    fn convert_row(data: &RawOptionData, kind: OptionKind) -> Option<OptionRow> {
        let strike = data.strike?;
        let contract_symbol = data.contract_symbol.clone()?;

        Some(OptionRow {
            kind,
            strike,
            last_price: data.last_price.unwrap_or(0.0),
            bid: data.bid.unwrap_or(0.0),
            ask: data.ask.unwrap_or(0.0),
            volume: data.volume.unwrap_or(0).max(0) as u64,
            open_interest: data.open_interest.unwrap_or(0).max(0) as u64,
            implied_volatility: data.implied_volatility.unwrap_or(0.0),
            in_the_money: data.in_the_money.unwrap_or(false),
            contract_symbol,
        })
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketDataProvider for YahooClient {
    fn stock_quote(&self, symbol: &str) -> DashResult<StockQuote> {
        let url = format!("{}/quote?symbols={}", self.base_url, symbol);
        let response: QuoteResponse = self.get_json(&url)?;

        let data = response
            .quote_response
            .result
            .into_iter()
            .next()
            .ok_or_else(|| DashError::missing(format!("No quote data for {symbol}")))?;

        let price = data.regular_market_price.unwrap_or(0.0);
        let previous_close = data.regular_market_previous_close.unwrap_or(0.0);
        let change = if price > 0.0 && previous_close > 0.0 {
            price - previous_close
        } else {
            0.0
        };
        let change_percent = if previous_close > 0.0 {
            change / previous_close * 100.0
        } else {
            0.0
        };

        Ok(StockQuote {
            symbol: symbol.to_uppercase(),
            name: data.short_name.unwrap_or_else(|| symbol.to_uppercase()),
            price,
            change,
            change_percent,
            previous_close,
            day_high: data.regular_market_day_high.unwrap_or(price),
            day_low: data.regular_market_day_low.unwrap_or(price),
            volume: data.regular_market_volume.unwrap_or(0).max(0) as u64,
        })
    }

    fn expirations(&self, symbol: &str) -> DashResult<Vec<NaiveDate>> {
        let payload = self.options_payload(symbol, None)?;

        Ok(payload
            .expiration_dates
            .iter()
            .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
            .collect())
    }

    fn option_chain(&self, symbol: &str, expiry: NaiveDate) -> DashResult<ChainSnapshot> {
        let expiry_ts = expiry
            .and_hms_opt(16, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp();

        let payload = self.options_payload(symbol, Some(expiry_ts))?;
        let spot = payload.quote.regular_market_price.unwrap_or(0.0);

        let mut chain = ChainSnapshot::new(symbol.to_uppercase(), expiry, spot);
        if let Some(options) = payload.options.first() {
            chain.calls = options
                .calls
                .iter()
                .filter_map(|row| Self::convert_row(row, OptionKind::Call))
                .collect();
            chain.puts = options
                .puts
                .iter()
                .filter_map(|row| Self::convert_row(row, OptionKind::Put))
                .collect();
        }

        Ok(chain)
    }

    fn price_history(&self, symbol: &str, range: &HistoryRange) -> DashResult<PriceHistory> {
        // Yahoo's chart endpoint spells hourly bars "60m"
        let interval = if range.interval == "1h" {
            "60m"
        } else {
            range.interval.as_str()
        };
        let url = format!(
            "{}/{}?range={}&interval={}",
            self.chart_url, symbol, range.period, interval
        );

        let response: ChartResponse = self.get_json(&url)?;
        let result = response
            .chart
            .result
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| DashError::missing(format!("No chart data for {symbol}")))?;

        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DashError::missing(format!("No OHLC series for {symbol}")))?;

        let round2 = |v: f64| (v * 100.0).round() / 100.0;
        let mut candles = Vec::with_capacity(result.timestamp.len());
        for (i, &ts) in result.timestamp.iter().enumerate() {
            // Bars with no trade carry nulls; skip them
            let close = match quote.close.get(i).copied().flatten() {
                Some(c) => c,
                None => continue,
            };
            candles.push(CandleBar {
                time: ts,
                open: round2(quote.open.get(i).copied().flatten().unwrap_or(close)),
                high: round2(quote.high.get(i).copied().flatten().unwrap_or(close)),
                low: round2(quote.low.get(i).copied().flatten().unwrap_or(close)),
                close: round2(close),
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            });
        }
        candles.sort_by_key(|c| c.time);

        Ok(PriceHistory {
            symbol: symbol.to_uppercase(),
            range: range.period.clone(),
            interval: range.interval.clone(),
            candles,
            fetched_at: Utc::now(),
        })
    }
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResult,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    result: Vec<RawQuoteData>,
}

#[derive(Debug, Deserialize)]
struct RawQuoteData {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "regularMarketPreviousClose")]
    regular_market_previous_close: Option<f64>,
    #[serde(rename = "regularMarketDayHigh")]
    regular_market_day_high: Option<f64>,
    #[serde(rename = "regularMarketDayLow")]
    regular_market_day_low: Option<f64>,
    #[serde(rename = "regularMarketVolume")]
    regular_market_volume: Option<i64>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: OptionChainResult,
}

#[derive(Debug, Deserialize)]
struct OptionChainResult {
    result: Vec<OptionChainData>,
}

#[derive(Debug, Deserialize)]
struct OptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    quote: RawQuoteData,
    #[serde(default)]
    options: Vec<RawOptions>,
}

#[derive(Debug, Deserialize)]
struct RawOptions {
    #[serde(default)]
    calls: Vec<RawOptionData>,
    #[serde(default)]
    puts: Vec<RawOptionData>,
}

#[derive(Debug, Deserialize)]
struct RawOptionData {
    #[serde(rename = "contractSymbol")]
    contract_symbol: Option<String>,
    strike: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
    volume: Option<i64>,
    #[serde(rename = "openInterest")]
    open_interest: Option<i64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
    #[serde(rename = "inTheMoney")]
    in_the_money: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Vec<Option<ChartData>>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}
