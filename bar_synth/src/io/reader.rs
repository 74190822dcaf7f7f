//! Load a generated fixture back into [`Bar`]s.
//!
//! This is the consumer side of the fixture contract: rows are
//! `ts, o, h, l, c, v` with `ts` a UTC instant, prices as floats and volume as
//! an unsigned integer. The delimited reader expects a header row; the spaced
//! reader skips blank lines and `#` comments.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::{DateTime, Utc};
use snafu::{Backtrace, OptionExt, ResultExt, Snafu};

use crate::models::{bar::Bar, format::OutputFormat};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ReadError {
    #[snafu(display("Failed to open fixture {}: {source}", path.display()))]
    Open {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Cannot infer fixture format from {}", path.display()))]
    UnknownFormat { path: PathBuf },

    #[snafu(display("I/O error: {source}"))]
    Read {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("CSV decoding failed: {source}"))]
    Decode {
        source: csv::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("line {line}: expected 6 fields, found {found}"))]
    FieldCount { line: u64, found: usize },

    #[snafu(display("line {line}: missing {field}"))]
    MissingField { line: u64, field: &'static str },

    #[snafu(display("line {line}: bad {field} value {value:?}"))]
    BadField {
        line: u64,
        field: &'static str,
        value: String,
    },
}

/// Read a fixture written in `format`.
pub fn read_bars(path: &Path, format: OutputFormat) -> Result<Vec<Bar>, ReadError> {
    let file = File::open(path).context(OpenSnafu { path })?;
    match format {
        OutputFormat::Delimited => parse_delimited(file),
        OutputFormat::Spaced => parse_spaced(BufReader::new(file)),
    }
}

/// Read a fixture, inferring the format from the file extension.
pub fn read_bars_auto(path: &Path) -> Result<(OutputFormat, Vec<Bar>), ReadError> {
    let format = OutputFormat::from_path(path).context(UnknownFormatSnafu { path })?;
    Ok((format, read_bars(path, format)?))
}

/// Parse delimited rows. The first row is the header and is skipped.
pub fn parse_delimited<R: Read>(reader: R) -> Result<Vec<Bar>, ReadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    for record in rdr.records() {
        let record = record.context(DecodeSnafu)?;
        let line = record.position().map_or(0, |pos| pos.line());
        if record.len() != 6 {
            return FieldCountSnafu {
                line,
                found: record.len(),
            }
            .fail();
        }
        bars.push(parse_row(line, record.iter())?);
    }
    Ok(bars)
}

/// Parse space-separated lines, skipping blanks and `#` comments.
pub fn parse_spaced<R: BufRead>(reader: R) -> Result<Vec<Bar>, ReadError> {
    let mut bars = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.context(ReadSnafu)?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line_no = idx as u64 + 1;
        let found = trimmed.split_whitespace().count();
        if found != 6 {
            return FieldCountSnafu {
                line: line_no,
                found,
            }
            .fail();
        }
        bars.push(parse_row(line_no, trimmed.split_whitespace())?);
    }
    Ok(bars)
}

fn parse_row<'a>(line: u64, mut fields: impl Iterator<Item = &'a str>) -> Result<Bar, ReadError> {
    let mut next = |field: &'static str| fields.next().context(MissingFieldSnafu { line, field });

    let timestamp: DateTime<Utc> = parse_field(line, "ts", next("ts")?)?;
    let open = parse_field(line, "o", next("o")?)?;
    let high = parse_field(line, "h", next("h")?)?;
    let low = parse_field(line, "l", next("l")?)?;
    let close = parse_field(line, "c", next("c")?)?;
    let volume = parse_field(line, "v", next("v")?)?;

    Ok(Bar {
        timestamp,
        open,
        high,
        low,
        close,
        volume,
    })
}

fn parse_field<T: FromStr>(line: u64, field: &'static str, raw: &str) -> Result<T, ReadError> {
    raw.parse().ok().context(BadFieldSnafu {
        line,
        field,
        value: raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_delimited_rows() {
        let text = "ts,o,h,l,c,v\n\
                    2024-01-08T14:30:00Z,220.00,220.61,219.87,220.43,31874\n\
                    2024-01-08T14:31:00Z,220.43,220.50,219.90,219.95,1000\n";
        let bars = parse_delimited(text.as_bytes()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(
            bars[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 8, 14, 30, 0).unwrap()
        );
        assert_eq!(bars[0].close, 220.43);
        assert_eq!(bars[1].open, 220.43);
        assert_eq!(bars[1].volume, 1000);
    }

    #[test]
    fn parses_spaced_lines_skipping_comments() {
        let text = "# ts o h l c v\n\
                    \n\
                    2024-01-08T14:30:00Z 220.00 220.61 219.87 220.43 31874\n\
                    # trailing note\n";
        let bars = parse_spaced(text.as_bytes()).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].high, 220.61);
    }

    #[test]
    fn bad_volume_reports_line_and_field() {
        let text = "# ts o h l c v\n2024-01-08T14:30:00Z 220.00 220.61 219.87 220.43 -5\n";
        let err = parse_spaced(text.as_bytes()).unwrap_err();
        assert!(
            matches!(err, ReadError::BadField { line: 2, field: "v", .. }),
            "{err:?}"
        );
    }

    #[test]
    fn bad_timestamp_is_rejected() {
        let text = "ts,o,h,l,c,v\n2024-01-08 14:30,220.00,220.61,219.87,220.43,1\n";
        let err = parse_delimited(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ReadError::BadField { field: "ts", .. }), "{err:?}");
    }

    #[test]
    fn short_spaced_line_is_a_field_count_error() {
        let err = parse_spaced("2024-01-08T14:30:00Z 220.00\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ReadError::FieldCount { line: 1, found: 2 }));
    }

    #[test]
    fn unknown_extension_cannot_be_inferred() {
        let err = read_bars_auto(Path::new("fixture.parquet")).unwrap_err();
        assert!(matches!(err, ReadError::UnknownFormat { .. }));
    }
}
