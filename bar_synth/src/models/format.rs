use std::{fmt, path::Path, str::FromStr};

use thiserror::Error;

#[derive(Debug, Error)]
#[error("Unknown output format: {0} (expected csv or txt)")]
pub struct UnknownFormatError(pub String);

/// Text encoding of a generated fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Comma-separated rows under a `ts,o,h,l,c,v` header.
    #[default]
    #[cfg_attr(feature = "cli", value(name = "csv", alias = "delimited"))]
    Delimited,
    /// Space-separated lines under a `# ts o h l c v` comment header.
    #[cfg_attr(feature = "cli", value(name = "txt", alias = "spaced"))]
    Spaced,
}

impl OutputFormat {
    /// File extension used for default output names.
    pub const fn extension(self) -> &'static str {
        match self {
            OutputFormat::Delimited => "csv",
            OutputFormat::Spaced => "txt",
        }
    }

    /// `<ticker>.<ext>`
    pub fn default_filename(self, ticker: &str) -> String {
        format!("{ticker}.{}", self.extension())
    }

    /// Infer the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" | "delimited" => Ok(OutputFormat::Delimited),
            "txt" | "spaced" => Ok(OutputFormat::Spaced),
            _ => Err(UnknownFormatError(s.to_string())),
        }
    }
}
