//! Canonical in-memory representation of a synthetic minute bar (OHLCV).
//!
//! Bars are produced one at a time by the [`BarWalk`](crate::generator::BarWalk)
//! and handed straight to a [`RowSink`](crate::io::sink::RowSink); nothing in the
//! generation path keeps a collection of them around.

use chrono::{DateTime, Utc};

/// Rendering used for bar timestamps in every output format, e.g. `2024-01-08T14:30:00Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A single synthetic OHLCV observation for one trading minute.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Start of the minute this bar covers (UTC).
    pub timestamp: DateTime<Utc>,

    /// Opening price. Equal to the previous bar's close.
    pub open: f64,

    /// Highest price during the minute.
    pub high: f64,

    /// Lowest price during the minute.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Shares traded during the minute.
    pub volume: u64,
}

impl Bar {
    /// `low <= min(open, close)` and `high >= max(open, close)`.
    pub fn is_bracketed(&self) -> bool {
        self.low <= self.open.min(self.close) && self.high >= self.open.max(self.close)
    }

    /// Timestamp rendered with [`TIMESTAMP_FORMAT`].
    pub fn timestamp_str(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 8, 14, 30, 0).unwrap(),
            open,
            high,
            low,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn bracketing_accepts_wicks_and_flat_bars() {
        assert!(bar(220.0, 220.7, 219.8, 220.5).is_bracketed());
        assert!(bar(220.0, 220.0, 220.0, 220.0).is_bracketed());
    }

    #[test]
    fn bracketing_rejects_body_outside_range() {
        // close above high
        assert!(!bar(220.0, 220.3, 219.8, 220.5).is_bracketed());
        // open below low
        assert!(!bar(219.5, 220.7, 219.8, 220.5).is_bracketed());
    }

    #[test]
    fn timestamp_renders_with_trailing_z() {
        assert_eq!(
            bar(1.0, 1.0, 1.0, 1.0).timestamp_str(),
            "2024-01-08T14:30:00Z"
        );
    }
}
