use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to the caller as a rejected operation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid persona: {0}. Available personas: pm, sa, dev, qa, devops, security, ba, po")]
    InvalidPersona(String),

    #[error("{0}")]
    UnknownResource(String),

    #[error("Invalid identifier '{0}': must not be empty, start with '.', or contain path separators")]
    InvalidArgument(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
