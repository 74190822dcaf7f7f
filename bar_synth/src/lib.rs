//! Synthetic minute-bar OHLCV fixtures.
//!
//! A [`BarSeriesGenerator`](generator::BarSeriesGenerator) walks a lookback
//! window one trading minute at a time and pushes each synthetic bar into a
//! [`RowSink`](io::sink::RowSink). [`write_series`] wires the pieces together
//! for the common case of writing one fixture file.

use std::path::PathBuf;

use tracing::info;

pub mod check;
pub mod clock;
pub mod config;
pub mod errors;
pub mod generator;
pub mod io;
pub mod models;
pub mod random;
pub mod session;

use clock::Clock;
use config::GeneratorConfig;
use errors::Error;
use generator::{BarSeriesGenerator, GenerationSummary};
use io::file::create_file_sink;
use models::request::SeriesRequest;
use random::RandomSource;

/// Generate the fixture described by `request` and write it to disk.
///
/// Returns the path written (`<ticker>.<ext>` unless the request names one)
/// and a summary of the series.
pub fn write_series<C: Clock, R: RandomSource>(
    request: &SeriesRequest,
    config: GeneratorConfig,
    clock: C,
    rng: R,
) -> Result<(PathBuf, GenerationSummary), Error> {
    let path = request.output_path();
    let mut generator = BarSeriesGenerator::new(config, clock, rng)?;
    let mut sink = create_file_sink(&path, request.format)?;
    let summary = generator.generate(&request.ticker, request.days, sink.as_mut())?;

    info!(path = %path.display(), format = %request.format, bars = summary.bars, "fixture written");
    Ok((path, summary))
}
