//! Destinations that can receive compressed or decompressed output.
//!
//! The compressor and decompressor never hand a caller buffer to libdeflate.
//! They work in a private scratch buffer and call [`OutputBuffer::overwrite`]
//! only once the native call has succeeded, so a failed operation leaves the
//! caller's buffer exactly as it was.

use bytes::{Bytes, BytesMut};

use crate::error::DeflateError;

/// A byte buffer whose contents can be replaced with an operation's result.
pub trait OutputBuffer {
    /// Reports whether [`OutputBuffer::overwrite`] can succeed.
    fn is_writable(&self) -> bool {
        true
    }

    /// Replaces the entire contents with `data`. Existing bytes are discarded,
    /// never appended to.
    fn overwrite(&mut self, data: &[u8]) -> Result<(), DeflateError>;

    /// Current contents.
    fn as_slice(&self) -> &[u8];
}

impl OutputBuffer for Vec<u8> {
    fn overwrite(&mut self, data: &[u8]) -> Result<(), DeflateError> {
        self.clear();
        self.extend_from_slice(data);
        Ok(())
    }

    fn as_slice(&self) -> &[u8] {
        self
    }
}

impl OutputBuffer for BytesMut {
    fn overwrite(&mut self, data: &[u8]) -> Result<(), DeflateError> {
        self.clear();
        self.extend_from_slice(data);
        Ok(())
    }

    fn as_slice(&self) -> &[u8] {
        self
    }
}

/// Frozen buffers are shared and immutable; writing to one is a usage error.
impl OutputBuffer for Bytes {
    fn is_writable(&self) -> bool {
        false
    }

    fn overwrite(&mut self, _data: &[u8]) -> Result<(), DeflateError> {
        Err(DeflateError::ImmutableBuffer)
    }

    fn as_slice(&self) -> &[u8] {
        self
    }
}

/// Scratch capacity kept between calls; anything above is released.
pub(crate) const SCRATCH_RETAIN: usize = 1 << 20;

/// Empties `scratch` and caps the memory it keeps to [`SCRATCH_RETAIN`].
pub(crate) fn release_scratch(scratch: &mut Vec<u8>) {
    scratch.clear();
    scratch.shrink_to(SCRATCH_RETAIN);
}

/// Fails with [`DeflateError::ImmutableBuffer`] unless `out` accepts writes.
pub(crate) fn ensure_writable<B>(out: &B) -> Result<(), DeflateError>
where
    B: OutputBuffer + ?Sized,
{
    if out.is_writable() {
        Ok(())
    } else {
        Err(DeflateError::ImmutableBuffer)
    }
}
