//! One-shot decompression with bounded output growth.
//!
//! None of the three formats records the decompressed size up front (gzip's
//! ISIZE trailer is modulo 2^32 and untrusted), so the decompressor guesses a
//! capacity, lets libdeflate try, and doubles the buffer whenever libdeflate
//! reports that it ran out of space. Growth stops at a configurable limit.

use std::fmt;

use crate::buffer::{OutputBuffer, ensure_writable, release_scratch};
use crate::error::DeflateError;
use crate::ffi::{InflateStatus, RawDecompressor};
use crate::format::ContainerFormat;
use crate::trace;

/// Default cap on decompressed output: 1 GiB.
pub const DEFAULT_MAX_OUTPUT: usize = 1 << 30;

/// Smallest initial output capacity.
const MIN_INITIAL_CAPACITY: usize = 64;

/// Decompresses whole raw DEFLATE, zlib, or gzip streams.
///
/// The native context is format-agnostic, so one decompressor serves every
/// [`ContainerFormat`]. [`Decompressor::decompress_into`] works in an internal
/// scratch buffer that keeps at most 1 MiB of its allocation between calls.
pub struct Decompressor {
    raw: RawDecompressor,
    max_output: usize,
    scratch: Vec<u8>,
}

impl Decompressor {
    /// Creates a decompressor with the [`DEFAULT_MAX_OUTPUT`] limit.
    pub fn new() -> Result<Self, DeflateError> {
        Self::with_limit(DEFAULT_MAX_OUTPUT)
    }

    /// Creates a decompressor that refuses to produce more than `max_output`
    /// bytes from a single call.
    pub fn with_limit(max_output: usize) -> Result<Self, DeflateError> {
        let raw = RawDecompressor::alloc()
            .ok_or(DeflateError::Allocation("libdeflate_alloc_decompressor"))?;
        Ok(Self {
            raw,
            max_output,
            scratch: Vec::new(),
        })
    }

    /// Returns the output limit applied to each call.
    #[must_use]
    pub const fn max_output(&self) -> usize {
        self.max_output
    }

    /// Decompresses `input` into a freshly allocated buffer.
    pub fn decompress(
        &mut self,
        input: &[u8],
        format: ContainerFormat,
    ) -> Result<Vec<u8>, DeflateError> {
        let mut output = Vec::new();
        let len = inflate_growing(&mut self.raw, self.max_output, input, format, &mut output)?;
        output.truncate(len);
        Ok(output)
    }

    /// Decompresses `input` and replaces the contents of `out` with the result.
    ///
    /// `out` is overwritten only on success; on any error it keeps its previous
    /// contents. A frozen buffer is rejected before any work is done.
    pub fn decompress_into<'a, B>(
        &mut self,
        input: &[u8],
        format: ContainerFormat,
        out: &'a mut B,
    ) -> Result<&'a [u8], DeflateError>
    where
        B: OutputBuffer + ?Sized,
    {
        ensure_writable(out)?;

        let committed = inflate_growing(
            &mut self.raw,
            self.max_output,
            input,
            format,
            &mut self.scratch,
        )
        .and_then(|len| out.overwrite(&self.scratch[..len]));
        release_scratch(&mut self.scratch);

        committed?;
        Ok(out.as_slice())
    }
}

impl fmt::Debug for Decompressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decompressor")
            .field("max_output", &self.max_output)
            .finish_non_exhaustive()
    }
}

/// First capacity tried for `input_len` compressed bytes.
pub(crate) fn initial_capacity(input_len: usize, max_output: usize) -> usize {
    let guess = input_len
        .checked_next_power_of_two()
        .and_then(|n| n.checked_mul(16))
        .unwrap_or(max_output);
    guess.clamp(MIN_INITIAL_CAPACITY.min(max_output), max_output)
}

/// Runs libdeflate against `buf`, growing it until the stream fits or the
/// limit is reached. Returns the decompressed length; bytes past it in `buf`
/// are unspecified.
fn inflate_growing(
    raw: &mut RawDecompressor,
    max_output: usize,
    input: &[u8],
    format: ContainerFormat,
    buf: &mut Vec<u8>,
) -> Result<usize, DeflateError> {
    let mut capacity = initial_capacity(input.len(), max_output).max(buf.len());
    let mut attempts = 0u32;

    loop {
        buf.resize(capacity, 0);
        attempts += 1;

        match raw.decompress(format, input, buf) {
            InflateStatus::Done(len) => {
                trace::trace_decompress(format, input.len(), len, attempts);
                return Ok(len);
            }
            InflateStatus::InsufficientSpace => {
                if capacity >= max_output {
                    return Err(DeflateError::OutputLimitExceeded { limit: max_output });
                }
                let next = capacity.saturating_mul(2).clamp(1, max_output);
                trace::trace_grow(format, capacity, next);
                capacity = next;
            }
            InflateStatus::BadData => return Err(DeflateError::BadData),
            InflateStatus::Other(code) => return Err(DeflateError::Native(i64::from(code))),
        }
    }
}
