//! Error type shared by the compressor, decompressor, and format parsers.

use crate::level::CompressionLevel;

/// Broad classification of a [`DeflateError`].
///
/// Callers that only need to decide between "fix the call", "reject the
/// payload", and "give up" can match on the category instead of every variant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorCategory {
    /// Invalid compression level or unrecognised container format.
    Config,
    /// Compressed input is corrupt, truncated, or in a different format.
    BadData,
    /// The caller supplied an output buffer that cannot be written.
    ImmutableBuffer,
    /// Native allocation failed or a size bound was exhausted.
    Resource,
}

/// Errors reported by the binding.
#[derive(Debug, thiserror::Error)]
pub enum DeflateError {
    /// Compression level outside `1..=12`.
    #[error(
        "compression level {0} is outside the supported range {min}-{max}",
        min = CompressionLevel::MIN,
        max = CompressionLevel::MAX
    )]
    InvalidLevel(i32),

    /// Compression level text that is not an integer.
    #[error("compression level '{0}' is not an integer")]
    UnknownLevel(String),

    /// Container format code that maps to none of deflate, zlib, or gzip.
    #[error("unknown compressed data format: {0}")]
    UnknownFormat(String),

    /// Output buffer is frozen.
    #[error("can't modify frozen output buffer")]
    ImmutableBuffer,

    /// libdeflate rejected the compressed stream.
    #[error("failed to decompress data")]
    BadData,

    /// Decompressed output would exceed the configured limit.
    #[error("decompressed output exceeds the {limit} byte limit")]
    OutputLimitExceeded {
        /// Limit in effect for the failing call.
        limit: usize,
    },

    /// libdeflate returned a null context.
    #[error("{0} returned no context")]
    Allocation(&'static str),

    /// libdeflate reported zero bytes written despite a bound-sized buffer.
    #[error("failed to compress data")]
    CompressFailed,

    /// libdeflate returned a result code the binding does not recognise.
    #[error("libdeflate returned unexpected status {0}")]
    Native(i64),
}

impl DeflateError {
    /// Returns the broad category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidLevel(_) | Self::UnknownLevel(_) | Self::UnknownFormat(_) => {
                ErrorCategory::Config
            }
            Self::BadData => ErrorCategory::BadData,
            Self::ImmutableBuffer => ErrorCategory::ImmutableBuffer,
            Self::OutputLimitExceeded { .. }
            | Self::Allocation(_)
            | Self::CompressFailed
            | Self::Native(_) => ErrorCategory::Resource,
        }
    }

    /// Reports whether the error stems from caller configuration.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self.category(), ErrorCategory::Config)
    }

    /// Reports whether the compressed input was rejected.
    #[must_use]
    pub const fn is_bad_data(&self) -> bool {
        matches!(self.category(), ErrorCategory::BadData)
    }
}
