//! Watchlist persistence
//!
//! A small sqlite store for the two watchlists the dashboard keeps: the
//! ticker universe the scanner walks (with optional support/resistance
//! levels per symbol) and individually pinned option contracts. The
//! database is seeded with a default universe on first open.

use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use rusqlite::{params, Connection, ErrorCode};
use serde::{Deserialize, Serialize};

use crate::core::{DashError, DashResult, OptionKind};

/// Universe seeded into an empty database.
const DEFAULT_TICKERS: &[(&str, &str)] = &[
    ("SPY", "etf"),
    ("QQQ", "etf"),
    ("IWM", "etf"),
    ("DIA", "etf"),
    ("TLT", "etf"),
    ("GLD", "etf"),
    ("XLE", "etf"),
    ("XLF", "etf"),
    ("SMH", "etf"),
    ("ARKK", "etf"),
    ("TQQQ", "etf"),
    ("SQQQ", "etf"),
    ("UVXY", "etf"),
    ("AAPL", "tech"),
    ("MSFT", "tech"),
    ("GOOGL", "tech"),
    ("AMZN", "tech"),
    ("META", "tech"),
    ("NVDA", "tech"),
    ("TSLA", "tech"),
    ("NFLX", "tech"),
    ("AVGO", "tech"),
    ("AMD", "semis"),
    ("INTC", "semis"),
    ("MU", "semis"),
    ("QCOM", "semis"),
    ("TSM", "semis"),
    ("MRVL", "semis"),
    ("SMCI", "semis"),
    ("PLTR", "momentum"),
    ("SOFI", "momentum"),
    ("COIN", "momentum"),
    ("HOOD", "momentum"),
    ("RIVN", "momentum"),
    ("NIO", "momentum"),
    ("GME", "momentum"),
    ("AMC", "momentum"),
    ("MARA", "momentum"),
    ("RIOT", "momentum"),
    ("DKNG", "momentum"),
    ("ROKU", "momentum"),
    ("SNAP", "momentum"),
    ("UBER", "momentum"),
    ("SHOP", "momentum"),
    ("PYPL", "momentum"),
    ("BABA", "momentum"),
];

/// One watched ticker with optional chart levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedTicker {
    pub symbol: String,
    pub category: String,
    pub support_price: Option<f64>,
    pub resistance_price: Option<f64>,
    pub added_at: String,
}

/// One pinned option contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedOption {
    pub contract_symbol: String,
    pub ticker: String,
    pub strike: f64,
    pub expiry: NaiveDate,
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub notes: Option<String>,
    pub added_at: String,
}

pub struct WatchlistStore {
    conn: Mutex<Connection>,
}

impl WatchlistStore {
    /// Open (or create) the database at `path` in WAL mode.
    pub fn open(path: impl AsRef<Path>) -> DashResult<Self> {
        let conn = Connection::open(path)?;
        // journal_mode returns the resulting mode as a row
        conn.query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))?;
        Self::from_connection(conn)
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> DashResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DashResult<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        store.seed_if_empty()?;
        Ok(store)
    }

    fn migrate(&self) -> DashResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS ticker_watchlist (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL UNIQUE,
                category TEXT NOT NULL DEFAULT 'general',
                support_price REAL,
                resistance_price REAL,
                added_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            CREATE TABLE IF NOT EXISTS option_watchlist (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                contract_symbol TEXT NOT NULL UNIQUE,
                ticker TEXT NOT NULL,
                strike REAL NOT NULL,
                expiry TEXT NOT NULL,
                option_type TEXT NOT NULL,
                notes TEXT,
                added_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )?;
        Ok(())
    }

    fn seed_if_empty(&self) -> DashResult<()> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM ticker_watchlist", [], |row| {
            row.get(0)
        })?;
        if count > 0 {
            return Ok(());
        }

        tracing::info!(
            tickers = DEFAULT_TICKERS.len(),
            "seeding default watchlist"
        );
        let mut stmt =
            conn.prepare("INSERT INTO ticker_watchlist (symbol, category) VALUES (?1, ?2)")?;
        for (symbol, category) in DEFAULT_TICKERS {
            stmt.execute(params![symbol, category])?;
        }
        Ok(())
    }

    fn conflict_on_unique(err: rusqlite::Error, msg: String) -> DashError {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == ErrorCode::ConstraintViolation =>
            {
                DashError::Conflict(msg)
            }
            _ => err.into(),
        }
    }

    // Ticker watchlist

    pub fn list_tickers(&self) -> DashResult<Vec<WatchedTicker>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT symbol, category, support_price, resistance_price, added_at
             FROM ticker_watchlist ORDER BY symbol",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(WatchedTicker {
                symbol: row.get(0)?,
                category: row.get(1)?,
                support_price: row.get(2)?,
                resistance_price: row.get(3)?,
                added_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn add_ticker(&self, symbol: &str, category: &str) -> DashResult<()> {
        let symbol = symbol.to_uppercase();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO ticker_watchlist (symbol, category) VALUES (?1, ?2)",
            params![symbol, category],
        )
        .map_err(|e| Self::conflict_on_unique(e, format!("{symbol} is already watched")))?;
        Ok(())
    }

    /// Returns false when the symbol was not on the list.
    pub fn remove_ticker(&self, symbol: &str) -> DashResult<bool> {
        let symbol = symbol.to_uppercase();
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(
            "DELETE FROM ticker_watchlist WHERE symbol = ?1",
            params![symbol],
        )?;
        Ok(affected > 0)
    }

    pub fn get_ticker(&self, symbol: &str) -> DashResult<Option<WatchedTicker>> {
        let symbol = symbol.to_uppercase();
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT symbol, category, support_price, resistance_price, added_at
             FROM ticker_watchlist WHERE symbol = ?1",
        )?;
        let mut rows = stmt.query_map(params![symbol], |row| {
            Ok(WatchedTicker {
                symbol: row.get(0)?,
                category: row.get(1)?,
                support_price: row.get(2)?,
                resistance_price: row.get(3)?,
                added_at: row.get(4)?,
            })
        })?;
        rows.next().transpose().map_err(Into::into)
    }

    /// Set (or clear) support/resistance levels for a watched symbol.
    pub fn update_levels(
        &self,
        symbol: &str,
        support: Option<f64>,
        resistance: Option<f64>,
    ) -> DashResult<bool> {
        let symbol = symbol.to_uppercase();
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(
            "UPDATE ticker_watchlist SET support_price = ?2, resistance_price = ?3
             WHERE symbol = ?1",
            params![symbol, support, resistance],
        )?;
        Ok(affected > 0)
    }

    // Option watchlist

    pub fn list_options(&self) -> DashResult<Vec<WatchedOption>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT contract_symbol, ticker, strike, expiry, option_type, notes, added_at
             FROM option_watchlist ORDER BY expiry, ticker, strike",
        )?;
        let rows = stmt.query_map([], Self::option_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn add_option(
        &self,
        contract_symbol: &str,
        ticker: &str,
        strike: f64,
        expiry: NaiveDate,
        kind: OptionKind,
        notes: Option<&str>,
    ) -> DashResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO option_watchlist
             (contract_symbol, ticker, strike, expiry, option_type, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                contract_symbol,
                ticker.to_uppercase(),
                strike,
                expiry.format("%Y-%m-%d").to_string(),
                kind.as_str(),
                notes,
            ],
        )
        .map_err(|e| {
            Self::conflict_on_unique(e, format!("{contract_symbol} is already watched"))
        })?;
        Ok(())
    }

    pub fn remove_option(&self, contract_symbol: &str) -> DashResult<bool> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(
            "DELETE FROM option_watchlist WHERE contract_symbol = ?1",
            params![contract_symbol],
        )?;
        Ok(affected > 0)
    }

    pub fn contains_option(&self, contract_symbol: &str) -> DashResult<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM option_watchlist WHERE contract_symbol = ?1",
            params![contract_symbol],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn option_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<WatchedOption> {
        let expiry: String = row.get(3)?;
        let expiry = NaiveDate::parse_from_str(&expiry, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;
        let kind: String = row.get(4)?;
        let kind = match kind.as_str() {
            "CALL" => OptionKind::Call,
            _ => OptionKind::Put,
        };
        Ok(WatchedOption {
            contract_symbol: row.get(0)?,
            ticker: row.get(1)?,
            strike: row.get(2)?,
            expiry,
            kind,
            notes: row.get(5)?,
            added_at: row.get(6)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()
    }

    #[test]
    fn test_seeds_default_universe() {
        let store = WatchlistStore::open_in_memory().unwrap();
        let tickers = store.list_tickers().unwrap();
        assert!(tickers.len() >= 40);
        assert!(tickers.iter().any(|t| t.symbol == "SPY"));
        // Sorted by symbol
        for pair in tickers.windows(2) {
            assert!(pair[0].symbol < pair[1].symbol);
        }
    }

    #[test]
    fn test_add_remove_ticker() {
        let store = WatchlistStore::open_in_memory().unwrap();
        store.add_ticker("brk-b", "value").unwrap();
        assert!(store.get_ticker("BRK-B").unwrap().is_some());

        assert!(store.remove_ticker("BRK-B").unwrap());
        assert!(!store.remove_ticker("BRK-B").unwrap());
        assert!(store.get_ticker("BRK-B").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_ticker_is_conflict() {
        let store = WatchlistStore::open_in_memory().unwrap();
        let err = store.add_ticker("SPY", "etf").unwrap_err();
        assert!(matches!(err, DashError::Conflict(_)));
    }

    #[test]
    fn test_levels_roundtrip() {
        let store = WatchlistStore::open_in_memory().unwrap();
        assert!(store.update_levels("SPY", Some(580.0), Some(600.5)).unwrap());

        let t = store.get_ticker("SPY").unwrap().unwrap();
        assert_eq!(t.support_price, Some(580.0));
        assert_eq!(t.resistance_price, Some(600.5));

        // Clearing levels
        assert!(store.update_levels("SPY", None, None).unwrap());
        let t = store.get_ticker("SPY").unwrap().unwrap();
        assert_eq!(t.support_price, None);

        // Unknown symbol is not an error, just a no-op
        assert!(!store.update_levels("ZZZZ", Some(1.0), None).unwrap());
    }

    #[test]
    fn test_option_watchlist_crud() {
        let store = WatchlistStore::open_in_memory().unwrap();
        store
            .add_option(
                "SPY250620C00600000",
                "spy",
                600.0,
                expiry(),
                OptionKind::Call,
                Some("gamma squeeze"),
            )
            .unwrap();

        assert!(store.contains_option("SPY250620C00600000").unwrap());
        let options = store.list_options().unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].ticker, "SPY");
        assert_eq!(options[0].expiry, expiry());
        assert_eq!(options[0].kind, OptionKind::Call);
        assert_eq!(options[0].notes.as_deref(), Some("gamma squeeze"));

        let err = store
            .add_option(
                "SPY250620C00600000",
                "SPY",
                600.0,
                expiry(),
                OptionKind::Call,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, DashError::Conflict(_)));

        assert!(store.remove_option("SPY250620C00600000").unwrap());
        assert!(!store.contains_option("SPY250620C00600000").unwrap());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.db");

        {
            let store = WatchlistStore::open(&path).unwrap();
            store.add_ticker("CRWD", "tech").unwrap();
        }

        let store = WatchlistStore::open(&path).unwrap();
        assert!(store.get_ticker("CRWD").unwrap().is_some());
        // Reopen must not re-seed on a populated database
        let crwd = store
            .list_tickers()
            .unwrap()
            .iter()
            .filter(|t| t.symbol == "CRWD")
            .count();
        assert_eq!(crwd, 1);
    }
}
