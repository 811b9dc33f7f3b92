//! One-shot compression through a reusable libdeflate context.

use std::fmt;

use crate::buffer::{OutputBuffer, ensure_writable, release_scratch};
use crate::error::DeflateError;
use crate::ffi::RawCompressor;
use crate::format::ContainerFormat;
use crate::level::CompressionLevel;
use crate::trace;

/// Compresses whole buffers into raw DEFLATE, zlib, or gzip streams.
///
/// Allocating the native context is the expensive part; build one compressor
/// per worker and reuse it for every call. The compressor also keeps a scratch
/// buffer whose allocation is reused across [`Compressor::compress_into`]
/// calls; after each call it keeps at most 1 MiB of that allocation.
///
/// ```
/// use deflate::{Compressor, ContainerFormat};
///
/// let mut compressor = Compressor::new(6)?;
/// let zlib = compressor.compress(b"foo", ContainerFormat::Zlib)?;
/// assert_eq!(&zlib[..2], &[0x78, 0x9c]);
/// # Ok::<(), deflate::DeflateError>(())
/// ```
pub struct Compressor {
    raw: RawCompressor,
    level: CompressionLevel,
    scratch: Vec<u8>,
}

impl Compressor {
    /// Creates a compressor for `level`, which must lie in `1..=12`.
    pub fn new(level: i32) -> Result<Self, DeflateError> {
        Self::with_level(CompressionLevel::new(level)?)
    }

    /// Creates a compressor for an already validated level.
    pub fn with_level(level: CompressionLevel) -> Result<Self, DeflateError> {
        let raw = RawCompressor::alloc(level.get())
            .ok_or(DeflateError::Allocation("libdeflate_alloc_compressor"))?;
        Ok(Self {
            raw,
            level,
            scratch: Vec::new(),
        })
    }

    /// Returns the level this compressor was built with.
    #[must_use]
    pub const fn level(&self) -> CompressionLevel {
        self.level
    }

    /// Upper bound on the compressed size of `len` input bytes in `format`.
    #[must_use]
    pub fn compress_bound(&self, len: usize, format: ContainerFormat) -> usize {
        self.raw.bound(format, len)
    }

    /// Compresses `input` into a freshly allocated buffer sized to fit exactly.
    pub fn compress(
        &mut self,
        input: &[u8],
        format: ContainerFormat,
    ) -> Result<Vec<u8>, DeflateError> {
        let mut output = vec![0u8; self.raw.bound(format, input.len())];
        let written = self.raw.compress(format, input, &mut output);
        if written == 0 {
            return Err(DeflateError::CompressFailed);
        }
        output.truncate(written);
        trace::trace_compress(format, self.level.get(), input.len(), written);
        Ok(output)
    }

    /// Compresses `input` and replaces the contents of `out` with the result.
    ///
    /// `out` is overwritten, not appended to, and only once compression has
    /// succeeded. A frozen buffer is rejected before any work is done. The
    /// returned slice views the new contents of `out`.
    pub fn compress_into<'a, B>(
        &mut self,
        input: &[u8],
        format: ContainerFormat,
        out: &'a mut B,
    ) -> Result<&'a [u8], DeflateError>
    where
        B: OutputBuffer + ?Sized,
    {
        ensure_writable(out)?;

        let bound = self.raw.bound(format, input.len());
        self.scratch.resize(bound, 0);
        let written = self.raw.compress(format, input, &mut self.scratch);
        let committed = if written == 0 {
            Err(DeflateError::CompressFailed)
        } else {
            debug_assert!(written <= bound);
            trace::trace_compress(format, self.level.get(), input.len(), written);
            out.overwrite(&self.scratch[..written])
        };
        release_scratch(&mut self.scratch);

        committed?;
        Ok(out.as_slice())
    }
}

impl fmt::Debug for Compressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compressor")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SCRATCH_RETAIN;
    use bytes::Bytes;

    #[test]
    fn construction_validates_level() {
        assert!(Compressor::new(0).unwrap_err().is_config());
        assert!(Compressor::new(13).unwrap_err().is_config());
        assert_eq!(Compressor::new(12).unwrap().level().get(), 12);
    }

    #[test]
    fn bound_covers_framing() {
        let compressor = Compressor::new(6).unwrap();
        let raw = compressor.compress_bound(1000, ContainerFormat::RawDeflate);
        assert!(raw >= 1000);
        assert!(compressor.compress_bound(1000, ContainerFormat::Zlib) >= raw);
        assert!(compressor.compress_bound(1000, ContainerFormat::Gzip) >= raw);
    }

    #[test]
    fn compress_into_overwrites_previous_contents() {
        let mut compressor = Compressor::new(6).unwrap();
        let mut out = b"bar".to_vec();
        let view = compressor
            .compress_into(b"foo", ContainerFormat::RawDeflate, &mut out)
            .unwrap()
            .to_vec();
        assert_eq!(view, b"\x01\x03\x00\xfc\xfffoo");
        assert_eq!(out, view);
    }

    #[test]
    fn compress_into_rejects_frozen_buffer_untouched() {
        let mut compressor = Compressor::new(6).unwrap();
        let mut out = Bytes::from_static(b"bar");
        let err = compressor
            .compress_into(b"foo", ContainerFormat::RawDeflate, &mut out)
            .unwrap_err();
        assert!(matches!(err, DeflateError::ImmutableBuffer));
        assert_eq!(&out[..], b"bar");
    }

    #[test]
    fn scratch_is_reused_across_calls() {
        let mut compressor = Compressor::new(1).unwrap();
        let mut out = Vec::new();
        compressor
            .compress_into(&vec![7u8; 4096], ContainerFormat::Gzip, &mut out)
            .unwrap();
        let capacity = compressor.scratch.capacity();
        compressor
            .compress_into(b"short", ContainerFormat::Gzip, &mut out)
            .unwrap();
        assert_eq!(compressor.scratch.capacity(), capacity);
    }

    #[test]
    fn large_call_does_not_pin_scratch_memory() {
        let mut compressor = Compressor::new(1).unwrap();
        let mut out = Vec::new();
        let big: Vec<u8> = (0..8u32 << 20)
            .map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8)
            .collect();
        compressor
            .compress_into(&big, ContainerFormat::Zlib, &mut out)
            .unwrap();
        assert!(compressor.scratch.capacity() <= SCRATCH_RETAIN);
    }

    #[test]
    fn debug_output_names_level() {
        let compressor = Compressor::new(9).unwrap();
        assert!(format!("{compressor:?}").contains("level"));
    }
}
