use std::path::PathBuf;

use snafu::{Backtrace, Snafu};

use crate::models::bar::Bar;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// The output file could not be created or truncated.
    #[snafu(display("Failed to create output file {}: {source}", path.display()))]
    Create {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// A generic I/O error while appending or flushing.
    #[snafu(display("I/O error: {source}"))]
    Io {
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// The CSV encoder rejected a record or failed to write it.
    #[snafu(display("CSV encoding failed: {source}"))]
    Csv {
        source: csv::Error,
        backtrace: Backtrace,
    },

    /// Buffered output could not be handed back to the caller.
    #[snafu(display("Failed to finalize output: {message}"))]
    Finalize {
        message: String,
        backtrace: Backtrace,
    },
}

/// Destination for generated bars.
///
/// The generator calls [`emit_header`](RowSink::emit_header) once, then
/// [`emit_bar`](RowSink::emit_bar) for every bar in timestamp order, then
/// [`finish`](RowSink::finish). Implementations decide the encoding.
pub trait RowSink {
    /// Writes the fixed header line.
    fn emit_header(&mut self) -> Result<(), SinkError>;

    /// Serializes and appends one bar.
    fn emit_bar(&mut self, bar: &Bar) -> Result<(), SinkError>;

    /// Flushes anything still buffered. Called once after the last bar.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn emit_header(&mut self) -> Result<(), SinkError> {
        (**self).emit_header()
    }

    fn emit_bar(&mut self, bar: &Bar) -> Result<(), SinkError> {
        (**self).emit_bar(bar)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}

impl<S: RowSink + ?Sized> RowSink for Box<S> {
    fn emit_header(&mut self) -> Result<(), SinkError> {
        (**self).emit_header()
    }

    fn emit_bar(&mut self, bar: &Bar) -> Result<(), SinkError> {
        (**self).emit_bar(bar)
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        (**self).finish()
    }
}

/// In-memory sink that keeps every bar it receives.
///
/// Handy for callers that want the series as values rather than text.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BarBuffer {
    pub headers: usize,
    pub bars: Vec<Bar>,
    pub finished: bool,
}

impl RowSink for BarBuffer {
    fn emit_header(&mut self) -> Result<(), SinkError> {
        self.headers += 1;
        Ok(())
    }

    fn emit_bar(&mut self, bar: &Bar) -> Result<(), SinkError> {
        self.bars.push(bar.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.finished = true;
        Ok(())
    }
}
