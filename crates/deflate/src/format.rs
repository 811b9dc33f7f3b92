//! Container formats wrapped around a DEFLATE stream.

use core::fmt;
use core::str::FromStr;

use crate::error::DeflateError;

/// Framing applied around the compressed block stream.
///
/// The numeric codes returned by [`ContainerFormat::code`] are stable and can
/// be stored or passed across process boundaries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ContainerFormat {
    /// Bare RFC 1951 block stream with no header or trailer.
    #[default]
    RawDeflate,
    /// RFC 1950: two-byte header and a big-endian Adler-32 trailer.
    Zlib,
    /// RFC 1952: ten-byte header, little-endian CRC-32 and size trailer.
    Gzip,
}

impl ContainerFormat {
    /// Every format, in code order.
    pub const ALL: [Self; 3] = [Self::RawDeflate, Self::Zlib, Self::Gzip];

    /// Returns the canonical name used in diagnostics and CLI arguments.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RawDeflate => "deflate",
            Self::Zlib => "zlib",
            Self::Gzip => "gzip",
        }
    }

    /// Returns the stable numeric code for this format.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::RawDeflate => 0,
            Self::Zlib => 1,
            Self::Gzip => 2,
        }
    }

    /// Maps a numeric code back to its format.
    pub fn from_code(code: i32) -> Result<Self, DeflateError> {
        match code {
            0 => Ok(Self::RawDeflate),
            1 => Ok(Self::Zlib),
            2 => Ok(Self::Gzip),
            other => Err(DeflateError::UnknownFormat(other.to_string())),
        }
    }

    /// Number of framing bytes added around the raw block stream.
    #[must_use]
    pub const fn framing_overhead(self) -> usize {
        match self {
            Self::RawDeflate => 0,
            Self::Zlib => 2 + 4,
            Self::Gzip => 10 + 8,
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for ContainerFormat {
    type Error = DeflateError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl FromStr for ContainerFormat {
    type Err = DeflateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deflate" | "raw" => Ok(Self::RawDeflate),
            "zlib" => Ok(Self::Zlib),
            "gzip" | "gz" => Ok(Self::Gzip),
            other => Err(DeflateError::UnknownFormat(other.to_owned())),
        }
    }
}
