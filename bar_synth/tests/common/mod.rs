#![allow(dead_code)]

use std::path::PathBuf;

use bar_synth::{
    clock::FixedClock,
    config::GeneratorConfig,
    generator::BarSeriesGenerator,
    models::{format::OutputFormat, request::SeriesRequest},
    random::RngSource,
};
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

pub struct Workspace {
    _dir: TempDir, // keep alive for the life of the test
    pub root: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = dir.path().to_path_buf();
        Self { _dir: dir, root }
    }

    /// A request writing `<root>/<ticker>.<ext>`.
    pub fn request(&self, ticker: &str, days: i64, format: OutputFormat) -> SeriesRequest {
        SeriesRequest::new(ticker, days)
            .with_format(format)
            .with_output(self.root.join(format.default_filename(ticker)))
    }
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn generator_at(
    now: DateTime<Utc>,
    seed: u64,
) -> BarSeriesGenerator<FixedClock, RngSource> {
    BarSeriesGenerator::new(GeneratorConfig::default(), FixedClock(now), RngSource::seeded(seed))
        .expect("default config is valid")
}
