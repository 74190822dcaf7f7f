use thiserror::Error;

use crate::{config::ConfigError, io::reader::ReadError, io::sink::SinkError};

/// The unified error type for the `bar_synth` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from a row sink (e.g. file creation, write, flush).
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// An error related to generator configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An error while loading a fixture back from disk.
    #[error("Read error: {0}")]
    Read(#[from] ReadError),
}
