//! Quality report for a generated (or hand-edited) fixture.
//!
//! Each counter tracks one invariant the generator guarantees, together with
//! the timestamp of the first offending bar so a failing fixture can be
//! located quickly.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::{config::GeneratorConfig, models::bar::Bar};

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct FixtureReport {
    pub bars: usize,
    pub trading_days: usize,
    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,

    /// Bars not strictly after their predecessor.
    pub out_of_order: usize,
    pub first_out_of_order: Option<DateTime<Utc>>,

    /// Same-day successors more than one minute apart.
    pub intraday_gaps: usize,
    pub first_intraday_gap: Option<DateTime<Utc>>,

    /// Bars whose open differs from the previous close.
    pub continuity_breaks: usize,
    pub first_continuity_break: Option<DateTime<Utc>>,

    /// Bars where the high/low do not enclose open and close.
    pub unbracketed: usize,
    pub first_unbracketed: Option<DateTime<Utc>>,

    /// Bars on a weekend or outside the session window.
    pub outside_session: usize,
    pub first_outside_session: Option<DateTime<Utc>>,

    /// Bars with volume outside `[volume_min, volume_max]`.
    pub volume_out_of_range: usize,
    pub first_volume_out_of_range: Option<DateTime<Utc>>,
}

impl FixtureReport {
    pub fn violations(&self) -> usize {
        self.out_of_order
            + self.intraday_gaps
            + self.continuity_breaks
            + self.unbracketed
            + self.outside_session
            + self.volume_out_of_range
    }

    pub fn is_clean(&self) -> bool {
        self.violations() == 0
    }
}

fn flag(count: &mut usize, first: &mut Option<DateTime<Utc>>, ts: DateTime<Utc>) {
    *count += 1;
    first.get_or_insert(ts);
}

/// Check `bars` against the invariants of a series generated with `config`.
pub fn inspect(bars: &[Bar], config: &GeneratorConfig) -> FixtureReport {
    let session = config.session();
    let mut report = FixtureReport {
        bars: bars.len(),
        first_timestamp: bars.first().map(|b| b.timestamp),
        last_timestamp: bars.last().map(|b| b.timestamp),
        ..FixtureReport::default()
    };

    let mut days = BTreeSet::new();
    let mut prev: Option<&Bar> = None;

    for bar in bars {
        let ts = bar.timestamp;
        days.insert(ts.date_naive());

        if let Some(p) = prev {
            if ts <= p.timestamp {
                flag(&mut report.out_of_order, &mut report.first_out_of_order, ts);
            } else if ts.date_naive() == p.timestamp.date_naive()
                && ts - p.timestamp != TimeDelta::minutes(1)
            {
                flag(&mut report.intraday_gaps, &mut report.first_intraday_gap, ts);
            }
            if bar.open != p.close {
                flag(
                    &mut report.continuity_breaks,
                    &mut report.first_continuity_break,
                    ts,
                );
            }
        }

        if !bar.is_bracketed() {
            flag(&mut report.unbracketed, &mut report.first_unbracketed, ts);
        }
        if !session.contains(ts) {
            flag(
                &mut report.outside_session,
                &mut report.first_outside_session,
                ts,
            );
        }
        if !(config.volume_min..=config.volume_max).contains(&bar.volume) {
            flag(
                &mut report.volume_out_of_range,
                &mut report.first_volume_out_of_range,
                ts,
            );
        }

        prev = Some(bar);
    }

    report.trading_days = days.len();
    report
}
