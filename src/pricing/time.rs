//! Time-to-expiry models
//!
//! Two models feed the pricer:
//! - a simple calendar model (`calendar_years`) used for chain Greeks,
//!   with a half-day minimum so same-day expiries never price at T = 0;
//! - a trading-hours model (`TradingCalendar`) used by the projector so
//!   intraday projections reflect realistic time decay instead of naive
//!   calendar-day decay.
//!
//! The market-hours window is expressed on the deployment's local clock
//! and is hard-coded for a single exchange. That is a known
//! simplification; the constants are configuration, not hidden logic.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

/// Calendar-day year fraction: max(days to expiry, 0.5) / 365.
pub fn calendar_years(expiry: NaiveDate, today: NaiveDate) -> f64 {
    let days = (expiry - today).num_days() as f64;
    days.max(0.5) / 365.0
}

/// Trading-hours clock for one exchange in local time.
#[derive(Debug, Clone)]
pub struct TradingCalendar {
    /// Session open on a 24h local clock (6.5 = 06:30).
    pub open_hour: f64,
    /// Session close on a 24h local clock (13.0 = 13:00).
    pub close_hour: f64,
    /// Trading days in a year.
    pub trading_days_per_year: f64,
    /// Session length in hours.
    pub session_hours: f64,
}

impl Default for TradingCalendar {
    fn default() -> Self {
        Self {
            open_hour: 6.5,
            close_hour: 13.0,
            trading_days_per_year: 252.0,
            session_hours: 6.5,
        }
    }
}

impl TradingCalendar {
    /// Trading hours in one year under this calendar.
    pub fn hours_per_year(&self) -> f64 {
        self.trading_days_per_year * self.session_hours
    }

    fn is_trading_day(date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Hours to deduct for the part of the current session already gone.
    ///
    /// In-session time elapsed since the open is rounded up to the next
    /// half-hour boundary. Outside market hours the deduction is a fixed
    /// half hour; after the close it is a full session plus half an hour
    /// for the next one.
    pub fn session_deduction(&self, now: NaiveDateTime) -> f64 {
        if !Self::is_trading_day(now.date()) {
            return 0.5;
        }

        let clock = now.hour() as f64 + now.minute() as f64 / 60.0;
        if clock < self.open_hour {
            0.5
        } else if clock >= self.close_hour {
            self.session_hours + 0.5
        } else {
            let elapsed = clock - self.open_hour;
            (elapsed * 2.0).ceil() / 2.0
        }
    }

    /// Remaining trading hours between `now` and the end of the session
    /// on `target` (inclusive). Floored at half an hour so the result is
    /// always usable as a pricing input.
    pub fn trading_hours_until(&self, now: NaiveDateTime, target: NaiveDate) -> f64 {
        let today = now.date();
        if target < today {
            return 0.5;
        }

        let mut sessions = 0u32;
        let mut day = today;
        while day <= target {
            if Self::is_trading_day(day) {
                sessions += 1;
            }
            day = match day.succ_opt() {
                Some(d) => d,
                // Calendar overflow: fall back to the fixed deduction.
                None => return 0.5,
            };
        }

        let total = sessions as f64 * self.session_hours - self.session_deduction(now);
        total.max(0.5)
    }

    /// `trading_hours_until` expressed as a year fraction.
    pub fn trading_years_until(&self, now: NaiveDateTime, target: NaiveDate) -> f64 {
        self.trading_hours_until(now, target) / self.hours_per_year()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_calendar_years() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let week_out = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        assert!((calendar_years(week_out, today) - 7.0 / 365.0).abs() < 1e-12);

        // Same-day expiry clamps to half a day, never zero
        assert!((calendar_years(today, today) - 0.5 / 365.0).abs() < 1e-12);
    }

    #[test]
    fn test_mid_session_deduction_rounds_up() {
        let cal = TradingCalendar::default();
        // Wednesday 10:15 local = 3.75h elapsed, rounds up to 4.0
        let now = dt(2025, 6, 4, 10, 15);
        assert!((cal.session_deduction(now) - 4.0).abs() < 1e-12);

        // Exactly on a boundary stays put: 10:00 = 3.5h elapsed
        let now = dt(2025, 6, 4, 10, 0);
        assert!((cal.session_deduction(now) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_off_hours_deductions() {
        let cal = TradingCalendar::default();
        // Saturday
        assert!((cal.session_deduction(dt(2025, 6, 7, 10, 0)) - 0.5).abs() < 1e-12);
        // Weekday pre-open
        assert!((cal.session_deduction(dt(2025, 6, 4, 5, 0)) - 0.5).abs() < 1e-12);
        // Weekday after close: full session plus half an hour
        assert!((cal.session_deduction(dt(2025, 6, 4, 14, 0)) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_trading_hours_same_day() {
        let cal = TradingCalendar::default();
        let now = dt(2025, 6, 4, 10, 15); // 4.0h deducted
        let today = now.date();
        let hours = cal.trading_hours_until(now, today);
        assert!((hours - 2.5).abs() < 1e-12);

        let years = cal.trading_years_until(now, today);
        assert!((years - 2.5 / (252.0 * 6.5)).abs() < 1e-12);
    }

    #[test]
    fn test_trading_hours_skip_weekend() {
        let cal = TradingCalendar::default();
        // Friday pre-open through Monday: two sessions, half-hour deduction
        let now = dt(2025, 6, 6, 5, 0);
        let monday = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        let hours = cal.trading_hours_until(now, monday);
        assert!((hours - (2.0 * 6.5 - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_past_target_floors() {
        let cal = TradingCalendar::default();
        let now = dt(2025, 6, 4, 10, 0);
        let yesterday = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        assert!((cal.trading_hours_until(now, yesterday) - 0.5).abs() < 1e-12);
    }
}
