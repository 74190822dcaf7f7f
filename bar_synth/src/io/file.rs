use std::{fs::File, path::Path};

use snafu::ResultExt;
use tracing::debug;

use crate::io::{
    delimited::DelimitedSink,
    sink::{CreateSnafu, RowSink, SinkError},
    spaced::SpacedSink,
};
use crate::models::format::OutputFormat;

/// Create (or truncate) `path` and return a sink writing `format` into it.
///
/// The parent directory must already exist.
pub fn create_file_sink(path: &Path, format: OutputFormat) -> Result<Box<dyn RowSink>, SinkError> {
    let file = File::create(path).context(CreateSnafu { path })?;
    debug!(path = %path.display(), %format, "opened fixture file");

    Ok(match format {
        OutputFormat::Delimited => Box::new(DelimitedSink::new(file)),
        OutputFormat::Spaced => Box::new(SpacedSink::new(file)),
    })
}
