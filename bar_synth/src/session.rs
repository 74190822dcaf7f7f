//! Trading-calendar rules for the generator.
//!
//! - Monday to Friday only; Saturday and Sunday never trade.
//! - One fixed UTC window per day, `[open, close)`. The default 14:30–21:00 UTC
//!   stands in for 09:30–16:00 US Eastern *standard* time. Daylight saving is
//!   not applied: summer fixtures are one hour late relative to the real
//!   session, and that is the intended behaviour.
//! - Holidays are not modelled.
//!
//! All functions take and return UTC instants and operate on the UTC calendar date.

use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};

/// 14:30:00 UTC (09:30 EST).
pub const US_EQUITY_OPEN_UTC: NaiveTime = match NaiveTime::from_hms_opt(14, 30, 0) {
    Some(t) => t,
    None => unreachable!(),
};

/// 21:00:00 UTC (16:00 EST).
pub const US_EQUITY_CLOSE_UTC: NaiveTime = match NaiveTime::from_hms_opt(21, 0, 0) {
    Some(t) => t,
    None => unreachable!(),
};

/// Wall time the cursor lands on after skipping a weekend day, unless the
/// session opens earlier (see [`TradingSession::weekend_resume`]).
pub const WEEKEND_RESUME: NaiveTime = match NaiveTime::from_hms_opt(9, 30, 0) {
    Some(t) => t,
    None => unreachable!(),
};

/// Daily trading window in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingSession {
    open: NaiveTime,
    close: NaiveTime,
}

impl TradingSession {
    /// Returns `None` unless `open < close`.
    pub fn new(open: NaiveTime, close: NaiveTime) -> Option<Self> {
        (open < close).then_some(Self { open, close })
    }

    /// Number of one-minute bars in a full session.
    pub fn minutes_per_day(&self) -> i64 {
        (self.close - self.open).num_minutes()
    }

    /// Session open on `at`'s calendar date.
    pub fn day_start(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        at.date_naive().and_time(self.open).and_utc()
    }

    /// Session close (exclusive) on `at`'s calendar date.
    pub fn day_end(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        at.date_naive().and_time(self.close).and_utc()
    }

    /// Landing time after a weekend day: [`WEEKEND_RESUME`] or the open,
    /// whichever comes first, so no session minute is skipped.
    pub fn weekend_resume(&self) -> NaiveTime {
        self.open.min(WEEKEND_RESUME)
    }

    /// Session open on the calendar day after `at`.
    pub fn next_open(&self, at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        next_day_at(at, self.open)
    }

    /// True when `ts` falls on a weekday inside `[open, close)`.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        let t = ts.time();
        !is_weekend(ts) && t >= self.open && t < self.close
    }
}

impl Default for TradingSession {
    fn default() -> Self {
        Self {
            open: US_EQUITY_OPEN_UTC,
            close: US_EQUITY_CLOSE_UTC,
        }
    }
}

pub fn is_weekend(ts: DateTime<Utc>) -> bool {
    matches!(ts.weekday(), Weekday::Sat | Weekday::Sun)
}

/// `time` on the calendar day after `at`. `None` only at the end of chrono's date range.
pub fn next_day_at(at: DateTime<Utc>, time: NaiveTime) -> Option<DateTime<Utc>> {
    at.date_naive()
        .succ_opt()
        .map(|day| day.and_time(time).and_utc())
}
