//! The bar series generator: minute-by-minute walk over a lookback window.
//!
//! Given `days` and a clock, the window is `[now - days, now)`. A cursor starts
//! at the (minute-truncated) window start and moves forward only:
//!
//! 1. On Saturday or Sunday it jumps to the next calendar day at 09:30, or at
//!    the session open when that is earlier.
//! 2. Before the session open it snaps to the open; at or after the session
//!    close it jumps to the next day's open.
//! 3. Inside the session it yields one bar and advances one minute.
//!
//! Each bar opens at the previous bar's close (the first at the configured
//! base price), so the series is a continuous random walk.

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    config::{ConfigError, GeneratorConfig},
    io::sink::{RowSink, SinkError},
    models::bar::Bar,
    random::RandomSource,
    session::{TradingSession, is_weekend, next_day_at},
};

/// What a generation run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub ticker: String,
    pub bars: u64,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,
    /// Close of the last bar, or the base price when nothing was emitted.
    pub final_price: f64,
}

impl GenerationSummary {
    fn new(ticker: &str, base_price: f64) -> Self {
        Self {
            ticker: ticker.to_string(),
            bars: 0,
            first_timestamp: None,
            last_timestamp: None,
            final_price: base_price,
        }
    }

    fn record(&mut self, bar: &Bar) {
        self.bars += 1;
        self.first_timestamp.get_or_insert(bar.timestamp);
        self.last_timestamp = Some(bar.timestamp);
        self.final_price = bar.close;
    }
}

/// Generates synthetic minute bars for a lookback window ending at `clock.now()`.
pub struct BarSeriesGenerator<C, R> {
    config: GeneratorConfig,
    session: TradingSession,
    clock: C,
    rng: R,
}

impl<C: Clock, R: RandomSource> BarSeriesGenerator<C, R> {
    /// Errors if `config` fails [`GeneratorConfig::validate`].
    pub fn new(config: GeneratorConfig, clock: C, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let session = config.session();
        Ok(Self {
            config,
            session,
            clock,
            rng,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Iterator over the bars of the window `[now - days, now)`.
    ///
    /// The clock is read once, here. Non-positive `days` yields nothing.
    pub fn walk(&mut self, days: i64) -> BarWalk<'_, R> {
        let end = self.clock.now();
        let start = window_start(end, days).unwrap_or(end);
        debug!(
            %start,
            %end,
            days,
            session_minutes = self.session.minutes_per_day(),
            "walking window"
        );
        BarWalk::new(start, end, &self.config, self.session, &mut self.rng)
    }

    /// Write the header, then every bar of the window, to `sink`.
    ///
    /// `ticker` only labels the summary and log lines. Sink errors abort the
    /// run; whatever was already written stays written.
    pub fn generate<S: RowSink + ?Sized>(
        &mut self,
        ticker: &str,
        days: i64,
        sink: &mut S,
    ) -> Result<GenerationSummary, SinkError> {
        if days <= 0 {
            warn!(ticker, days, "non-positive lookback, series will be empty");
        }

        let mut summary = GenerationSummary::new(ticker, self.config.base_price);
        sink.emit_header()?;
        for bar in self.walk(days) {
            sink.emit_bar(&bar)?;
            summary.record(&bar);
        }
        sink.finish()?;

        info!(
            ticker,
            days,
            bars = summary.bars,
            first = ?summary.first_timestamp,
            last = ?summary.last_timestamp,
            final_price = summary.final_price,
            "generated synthetic series"
        );
        Ok(summary)
    }
}

/// `end - days`, truncated to the whole minute. `None` when out of chrono's range.
fn window_start(end: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    let start = end.checked_sub_signed(TimeDelta::try_days(days)?)?;
    start.with_second(0)?.with_nanosecond(0)
}

/// The minute-by-minute walk behind [`BarSeriesGenerator::walk`].
///
/// Yields bars strictly before `end`, in increasing timestamp order.
pub struct BarWalk<'a, R: ?Sized> {
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    price: f64,
    config: &'a GeneratorConfig,
    session: TradingSession,
    rng: &'a mut R,
}

impl<'a, R: RandomSource + ?Sized> BarWalk<'a, R> {
    /// `config` is assumed valid: inverted ranges make the random draws panic.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        config: &'a GeneratorConfig,
        session: TradingSession,
        rng: &'a mut R,
    ) -> Self {
        Self {
            cursor: start,
            end,
            price: config.base_price,
            config,
            session,
            rng,
        }
    }

    /// Close of the last emitted bar (base price before the first).
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Move the cursor to the next tradable minute before `end`, if any.
    fn seek_trading_minute(&mut self) -> Option<DateTime<Utc>> {
        loop {
            if self.cursor >= self.end {
                return None;
            }
            if is_weekend(self.cursor) {
                self.cursor = next_day_at(self.cursor, self.session.weekend_resume())?;
                continue;
            }
            let day_start = self.session.day_start(self.cursor);
            if self.cursor < day_start {
                self.cursor = day_start;
                continue;
            }
            if self.cursor >= self.session.day_end(self.cursor) {
                self.cursor = self.session.next_open(self.cursor)?;
                continue;
            }
            return Some(self.cursor);
        }
    }

    fn synthesize(&mut self, timestamp: DateTime<Utc>) -> Bar {
        let cfg = self.config;
        let open = self.price;
        let close = open + self.rng.uniform(-cfg.max_step, cfg.max_step);
        let high = open.max(close) + self.rng.uniform(0.0, cfg.max_wick);
        let low = open.min(close) - self.rng.uniform(0.0, cfg.max_wick);
        let volume = self.rng.uniform_int(cfg.volume_min, cfg.volume_max);

        Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

impl<R: RandomSource + ?Sized> Iterator for BarWalk<'_, R> {
    type Item = Bar;

    fn next(&mut self) -> Option<Bar> {
        let timestamp = self.seek_trading_minute()?;
        let bar = self.synthesize(timestamp);
        self.price = bar.close;
        self.cursor = timestamp
            .checked_add_signed(TimeDelta::minutes(1))
            .unwrap_or(self.end);
        Some(bar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::FixedClock, io::sink::BarBuffer, random::RngSource};
    use chrono::{NaiveTime, TimeZone};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn generator_at(now: DateTime<Utc>, seed: u64) -> BarSeriesGenerator<FixedClock, RngSource> {
        BarSeriesGenerator::new(
            GeneratorConfig::default(),
            FixedClock(now),
            RngSource::seeded(seed),
        )
        .unwrap()
    }

    /// Always returns the top of each range.
    struct Ceiling;

    impl RandomSource for Ceiling {
        fn uniform(&mut self, _low: f64, high: f64) -> f64 {
            high
        }

        fn uniform_int(&mut self, _low: u64, high: u64) -> u64 {
            high
        }
    }

    #[test]
    fn monday_morning_window_yields_ninety_bars() {
        // 2024-01-08 is a Monday; the window starts Sunday 16:00.
        let mut g = generator_at(utc(2024, 1, 8, 16, 0), 7);
        let mut sink = BarBuffer::default();
        let summary = g.generate("AMZN", 1, &mut sink).unwrap();

        assert_eq!(sink.headers, 1);
        assert!(sink.finished);
        assert_eq!(sink.bars.len(), 90);
        assert_eq!(summary.bars, 90);
        assert_eq!(sink.bars[0].timestamp, utc(2024, 1, 8, 14, 30));
        assert_eq!(sink.bars[89].timestamp, utc(2024, 1, 8, 15, 59));
        assert_eq!(summary.first_timestamp, Some(utc(2024, 1, 8, 14, 30)));
        assert_eq!(summary.last_timestamp, Some(utc(2024, 1, 8, 15, 59)));
        assert_eq!(summary.final_price, sink.bars[89].close);
    }

    #[test]
    fn saturday_start_waits_for_monday_open() {
        // Window starts Saturday 2024-01-06 15:00 and ends Tuesday 15:00.
        let mut g = generator_at(utc(2024, 1, 9, 15, 0), 3);
        let bars: Vec<Bar> = g.walk(3).collect();

        assert_eq!(bars[0].timestamp, utc(2024, 1, 8, 14, 30));
        // full Monday plus Tuesday 14:30..15:00
        assert_eq!(bars.len(), 390 + 30);
        assert!(bars.iter().all(|b| b.timestamp >= utc(2024, 1, 8, 14, 30)));
    }

    #[test]
    fn start_after_close_rolls_to_next_open() {
        // Window Tue 22:00 -> Wed 22:00: all of Wednesday, nothing of Thursday.
        let mut g = generator_at(utc(2024, 1, 10, 22, 0), 11);
        let bars: Vec<Bar> = g.walk(1).collect();
        assert_eq!(bars.len(), 390);
        assert_eq!(bars[0].timestamp, utc(2024, 1, 10, 14, 30));
        assert_eq!(bars[389].timestamp, utc(2024, 1, 10, 20, 59));
    }

    #[test]
    fn start_inside_session_keeps_its_minute() {
        // Window Fri 15:45:30 -> Mon 15:45:30; start truncates to 15:45.
        let now = Utc.with_ymd_and_hms(2024, 1, 8, 15, 45, 30).unwrap();
        let mut g = generator_at(now, 5);
        let bars: Vec<Bar> = g.walk(3).collect();

        assert_eq!(bars[0].timestamp, utc(2024, 1, 5, 15, 45));
        // Friday 15:45..21:00 (315) + Monday 14:30..15:45 inclusive of 15:45 (76)
        assert_eq!(bars.len(), 315 + 76);
        assert_eq!(bars.last().unwrap().timestamp, utc(2024, 1, 8, 15, 45));
    }

    #[test]
    fn window_ending_before_open_is_empty() {
        // Window Sun 10:00 -> Mon 10:00: Monday's session has not started yet.
        let mut g = generator_at(utc(2024, 1, 8, 10, 0), 1);
        assert_eq!(g.walk(1).count(), 0);
    }

    #[test]
    fn non_positive_days_emit_only_the_header() {
        for days in [0, -3] {
            let mut g = generator_at(utc(2024, 1, 8, 16, 0), 1);
            let mut sink = BarBuffer::default();
            let summary = g.generate("AMZN", days, &mut sink).unwrap();
            assert_eq!(sink.headers, 1);
            assert!(sink.bars.is_empty());
            assert_eq!(summary.bars, 0);
            assert_eq!(summary.first_timestamp, None);
            assert_eq!(summary.final_price, 220.0);
        }
    }

    #[test]
    fn bars_chain_and_bracket() {
        let mut g = generator_at(utc(2024, 1, 12, 21, 0), 99);
        let bars: Vec<Bar> = g.walk(5).collect();
        assert_eq!(bars.len(), 5 * 390);
        assert_eq!(bars[0].open, 220.0);

        for pair in bars.windows(2) {
            assert_eq!(pair[1].open, pair[0].close);
            assert!(pair[1].timestamp > pair[0].timestamp);
        }
        for bar in &bars {
            assert!(bar.is_bracketed(), "{bar:?}");
            assert!((1000..=50_000).contains(&bar.volume));
            assert!((bar.close - bar.open).abs() <= 0.5);
        }
    }

    #[test]
    fn draws_feed_the_bar_formula() {
        let config = GeneratorConfig::default();
        let session = config.session();
        let mut rng = Ceiling;
        let mut walk = BarWalk::new(
            utc(2024, 1, 8, 14, 30),
            utc(2024, 1, 8, 14, 32),
            &config,
            session,
            &mut rng,
        );

        let first = walk.next().unwrap();
        assert_eq!(first.open, 220.0);
        assert_eq!(first.close, 220.5);
        assert!((first.high - 220.7).abs() < 1e-9);
        assert!((first.low - 219.8).abs() < 1e-9);
        assert_eq!(first.volume, 50_000);

        let second = walk.next().unwrap();
        assert_eq!(second.open, 220.5);
        assert_eq!(second.close, 221.0);
        assert_eq!(walk.price(), 221.0);
        assert!(walk.next().is_none());
    }

    #[test]
    fn same_seed_same_series() {
        let now = utc(2024, 1, 10, 18, 0);
        let a: Vec<Bar> = generator_at(now, 42).walk(2).collect();
        let b: Vec<Bar> = generator_at(now, 42).walk(2).collect();
        let c: Vec<Bar> = generator_at(now, 43).walk(2).collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    fn generator_with(
        config: GeneratorConfig,
        now: DateTime<Utc>,
    ) -> BarSeriesGenerator<FixedClock, RngSource> {
        BarSeriesGenerator::new(config, FixedClock(now), RngSource::seeded(1)).unwrap()
    }

    fn session_config(open: (u32, u32), close: (u32, u32)) -> GeneratorConfig {
        GeneratorConfig {
            session_open: NaiveTime::from_hms_opt(open.0, open.1, 0).unwrap(),
            session_close: NaiveTime::from_hms_opt(close.0, close.1, 0).unwrap(),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn early_session_keeps_monday_opening_minutes() {
        // Window Fri 2024-01-05 00:00 -> Tue 00:00 over an 08:00-17:00 session.
        let mut g = generator_with(session_config((8, 0), (17, 0)), utc(2024, 1, 9, 0, 0));
        let bars: Vec<Bar> = g.walk(4).collect();

        assert_eq!(bars.len(), 540 + 540);
        let monday: Vec<&Bar> = bars
            .iter()
            .filter(|b| b.timestamp.date_naive() == utc(2024, 1, 8, 0, 0).date_naive())
            .collect();
        assert_eq!(monday[0].timestamp, utc(2024, 1, 8, 8, 0));
        assert_eq!(monday.len(), 540);
    }

    #[test]
    fn session_closing_before_weekend_resume_still_trades_monday() {
        // 05:00-09:00 closes before the usual 09:30 landing time.
        let mut g = generator_with(session_config((5, 0), (9, 0)), utc(2024, 1, 9, 0, 0));
        let bars: Vec<Bar> = g.walk(4).collect();

        assert_eq!(bars.len(), 240 + 240);
        assert_eq!(bars[240].timestamp, utc(2024, 1, 8, 5, 0));
        assert_eq!(bars.last().unwrap().timestamp, utc(2024, 1, 8, 8, 59));
    }

    #[test]
    fn widest_accepted_step_does_not_panic() {
        let config = GeneratorConfig {
            max_step: 1e307,
            max_wick: 1e307,
            ..GeneratorConfig::default()
        };
        let mut g = generator_with(config, utc(2024, 1, 8, 16, 0));
        assert_eq!(g.walk(1).count(), 90);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = GeneratorConfig {
            volume_min: 10,
            volume_max: 1,
            ..GeneratorConfig::default()
        };
        let res = BarSeriesGenerator::new(config, FixedClock(utc(2024, 1, 8, 16, 0)), Ceiling);
        assert!(res.is_err());
    }
}
