use std::io::{BufWriter, Write};

use snafu::ResultExt;

use crate::io::{
    COLUMNS, format_price,
    sink::{IoSnafu, RowSink, SinkError},
};
use crate::models::bar::Bar;

/// Space-separated lines under a `# ts o h l c v` comment header.
pub struct SpacedSink<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> SpacedSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
        }
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|err| err.into_error())
            .context(IoSnafu)
    }
}

impl<W: Write> RowSink for SpacedSink<W> {
    fn emit_header(&mut self) -> Result<(), SinkError> {
        writeln!(self.writer, "# {}", COLUMNS.join(" ")).context(IoSnafu)
    }

    fn emit_bar(&mut self, bar: &Bar) -> Result<(), SinkError> {
        writeln!(
            self.writer,
            "{} {} {} {} {} {}",
            bar.timestamp_str(),
            format_price(bar.open),
            format_price(bar.high),
            format_price(bar.low),
            format_price(bar.close),
            bar.volume
        )
        .context(IoSnafu)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush().context(IoSnafu)
    }
}
