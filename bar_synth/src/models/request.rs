use std::path::PathBuf;

use crate::models::format::OutputFormat;

/// Parameters for one generation run.
///
/// Nothing here is validated: an empty ticker or a non-positive `days`
/// simply produces a degenerate (possibly empty) fixture.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesRequest {
    /// Symbol the fixture is generated for (e.g. `"AMZN"`). Only used for naming and logging.
    pub ticker: String,

    /// Lookback window in days, counted back from the clock's "now".
    pub days: i64,

    /// Explicit output file. Defaults to `<ticker>.<ext>` in the working directory.
    pub output: Option<PathBuf>,

    /// Encoding of the written rows.
    pub format: OutputFormat,
}

impl SeriesRequest {
    pub fn new(ticker: impl Into<String>, days: i64) -> Self {
        Self {
            ticker: ticker.into(),
            days,
            output: None,
            format: OutputFormat::default(),
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Where the fixture will be written.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.format.default_filename(&self.ticker)))
    }
}

impl Default for SeriesRequest {
    /// The stock invocation: ten days of `AMZN` as delimited rows.
    fn default() -> Self {
        Self::new("AMZN", 10)
    }
}
