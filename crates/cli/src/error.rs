use std::io;
use std::path::PathBuf;

use deflate::{DeflateError, ErrorCategory};
use thiserror::Error;

/// Exit status for usage and configuration mistakes.
pub const EXIT_USAGE: i32 = 1;
/// Exit status for malformed compressed input.
pub const EXIT_BAD_DATA: i32 = 2;
/// Exit status for unreadable input or unwritable output.
pub const EXIT_IO: i32 = 3;
/// Exit status for allocation failures and exceeded output limits.
pub const EXIT_RESOURCE: i32 = 4;

/// Failures surfaced by the command-line front-end.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument parsing failed.
    #[error("{0}")]
    Usage(String),

    /// An environment variable held a value that could not be used.
    #[error("invalid {variable} value '{value}': {reason}")]
    InvalidEnv {
        /// Variable name.
        variable: String,
        /// Offending value.
        value: String,
        /// What the variable accepts.
        reason: String,
    },

    /// An environment variable was not valid UTF-8.
    #[error("{variable} accepts only UTF-8 values")]
    NonUtf8Env {
        /// Variable name.
        variable: String,
    },

    /// `--max-output` was not a positive byte count.
    #[error("invalid --max-output value '{0}': expected a positive byte count")]
    InvalidLimit(String),

    /// The codec rejected the request or the input.
    #[error(transparent)]
    Deflate(#[from] DeflateError),

    /// Reading input or writing output failed.
    #[error("{action} {}: {source}", display_path(.path.as_ref()))]
    Io {
        /// `"failed to read"` or `"failed to write"`.
        action: &'static str,
        /// File involved, `None` for the standard streams.
        path: Option<PathBuf>,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl CliError {
    pub(crate) fn read(path: Option<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action: "failed to read",
            path,
            source,
        }
    }

    pub(crate) fn write(path: Option<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action: "failed to write",
            path,
            source,
        }
    }

    /// Maps the error onto the process exit status.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_)
            | Self::InvalidEnv { .. }
            | Self::NonUtf8Env { .. }
            | Self::InvalidLimit(_) => EXIT_USAGE,
            Self::Io { .. } => EXIT_IO,
            Self::Deflate(error) => match error.category() {
                ErrorCategory::Config | ErrorCategory::ImmutableBuffer => EXIT_USAGE,
                ErrorCategory::BadData => EXIT_BAD_DATA,
                ErrorCategory::Resource => EXIT_RESOURCE,
            },
        }
    }
}

fn display_path(path: Option<&PathBuf>) -> String {
    path.map_or_else(|| "standard stream".to_owned(), |p| p.display().to_string())
}
