use std::io::Write;

use snafu::ResultExt;

use crate::io::{
    COLUMNS, format_price,
    sink::{CsvSnafu, FinalizeSnafu, IoSnafu, RowSink, SinkError},
};
use crate::models::bar::Bar;

/// Comma-separated rows under a `ts,o,h,l,c,v` header.
pub struct DelimitedSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> DelimitedSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer.into_inner().map_err(|err| {
            FinalizeSnafu {
                message: err.to_string(),
            }
            .build()
        })
    }
}

impl<W: Write> RowSink for DelimitedSink<W> {
    fn emit_header(&mut self) -> Result<(), SinkError> {
        self.writer.write_record(COLUMNS).context(CsvSnafu)
    }

    fn emit_bar(&mut self, bar: &Bar) -> Result<(), SinkError> {
        self.writer
            .write_record([
                bar.timestamp_str(),
                format_price(bar.open),
                format_price(bar.high),
                format_price(bar.low),
                format_price(bar.close),
                bar.volume.to_string(),
            ])
            .context(CsvSnafu)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush().context(IoSnafu)
    }
}
