//! Compression level accepted by libdeflate.
//!
//! libdeflate extends zlib's `1..=9` scale with three slower levels that use
//! near-optimal parsing. Levels are validated once, when the value is built, so
//! a [`crate::Compressor`] never sees an out-of-range level.

use core::fmt;
use core::str::FromStr;

use crate::error::DeflateError;

/// A validated libdeflate compression level in the range `1..=12`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CompressionLevel(i32);

impl CompressionLevel {
    /// Fastest supported level.
    pub const MIN: i32 = 1;
    /// Slowest, densest supported level.
    pub const MAX: i32 = 12;
    /// Level used when callers do not pick one.
    pub const DEFAULT: Self = Self(6);

    /// Validates `level` against the supported range.
    pub const fn new(level: i32) -> Result<Self, DeflateError> {
        if level >= Self::MIN && level <= Self::MAX {
            Ok(Self(level))
        } else {
            Err(DeflateError::InvalidLevel(level))
        }
    }

    /// Fastest level.
    #[must_use]
    pub const fn fastest() -> Self {
        Self(Self::MIN)
    }

    /// Densest level.
    #[must_use]
    pub const fn best() -> Self {
        Self(Self::MAX)
    }

    /// Returns the numeric level passed to libdeflate.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Iterates over every supported level, fastest first.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for CompressionLevel {
    type Error = DeflateError;

    fn try_from(level: i32) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<CompressionLevel> for i32 {
    fn from(level: CompressionLevel) -> Self {
        level.get()
    }
}

impl FromStr for CompressionLevel {
    type Err = DeflateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let level = trimmed
            .parse::<i32>()
            .map_err(|_| DeflateError::UnknownLevel(trimmed.to_owned()))?;
        Self::new(level)
    }
}
