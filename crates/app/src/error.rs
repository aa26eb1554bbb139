//! CLI-level errors (wraps codec errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Codec(#[from] huffpack_core::Error),

    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0} already exists (use --force to overwrite)")]
    OutputExists(PathBuf),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => exitcode::USAGE,
            CliError::Open { .. } => exitcode::NOINPUT,
            CliError::Create { .. } | CliError::OutputExists(_) => exitcode::CANTCREAT,
            CliError::Codec(e) if e.is_format() => exitcode::DATAERR,
            CliError::Codec(huffpack_core::Error::Io(_)) => exitcode::IOERR,
            CliError::Codec(huffpack_core::Error::Config(_)) => exitcode::CONFIG,
            CliError::Codec(_) => exitcode::SOFTWARE,
        }
    }
}
