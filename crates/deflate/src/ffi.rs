#![allow(unsafe_code)]

//! Owned handles over libdeflate's native contexts.
//!
//! Everything `unsafe` in the crate lives here. Each handle owns exactly one
//! context pointer, obtained from the matching `libdeflate_alloc_*` call and
//! released in [`Drop`]. Handles take `&mut self` for every native call, so a
//! context is never used from two threads at once.

use std::ffi::c_void;
use std::ptr::NonNull;

use libdeflate_sys::{
    libdeflate_adler32, libdeflate_alloc_compressor, libdeflate_alloc_decompressor,
    libdeflate_compressor, libdeflate_crc32, libdeflate_decompressor, libdeflate_deflate_compress,
    libdeflate_deflate_compress_bound, libdeflate_deflate_decompress, libdeflate_free_compressor,
    libdeflate_free_decompressor, libdeflate_gzip_compress, libdeflate_gzip_compress_bound,
    libdeflate_gzip_decompress, libdeflate_result, libdeflate_result_LIBDEFLATE_BAD_DATA,
    libdeflate_result_LIBDEFLATE_INSUFFICIENT_SPACE, libdeflate_result_LIBDEFLATE_SUCCESS,
    libdeflate_zlib_compress, libdeflate_zlib_compress_bound, libdeflate_zlib_decompress,
};

use crate::format::ContainerFormat;

/// A libdeflate compressor context bound to one compression level.
pub(crate) struct RawCompressor {
    ptr: NonNull<libdeflate_compressor>,
}

// SAFETY: libdeflate contexts hold no thread-affine state; exclusive access is
// enforced by `&mut self` on every call.
unsafe impl Send for RawCompressor {}

impl RawCompressor {
    /// Allocates a context for `level`; `None` when libdeflate refuses it.
    pub(crate) fn alloc(level: i32) -> Option<Self> {
        // SAFETY: plain allocation call; a null return is handled below.
        let ptr = unsafe { libdeflate_alloc_compressor(level) };
        NonNull::new(ptr).map(|ptr| Self { ptr })
    }

    /// Worst-case compressed size of `len` input bytes in `format`.
    pub(crate) fn bound(&self, format: ContainerFormat, len: usize) -> usize {
        let ptr = self.ptr.as_ptr();
        // SAFETY: `ptr` is a live context; the bound functions only read it.
        unsafe {
            match format {
                ContainerFormat::RawDeflate => libdeflate_deflate_compress_bound(ptr, len),
                ContainerFormat::Zlib => libdeflate_zlib_compress_bound(ptr, len),
                ContainerFormat::Gzip => libdeflate_gzip_compress_bound(ptr, len),
            }
        }
    }

    /// Compresses `input` into `output`, returning the number of bytes written.
    /// Zero means `output` was too small.
    pub(crate) fn compress(
        &mut self,
        format: ContainerFormat,
        input: &[u8],
        output: &mut [u8],
    ) -> usize {
        let ptr = self.ptr.as_ptr();
        let in_ptr = input.as_ptr().cast::<c_void>();
        let out_ptr = output.as_mut_ptr().cast::<c_void>();
        // SAFETY: both slices are valid for their full lengths for the
        // duration of the call and do not overlap.
        unsafe {
            match format {
                ContainerFormat::RawDeflate => {
                    libdeflate_deflate_compress(ptr, in_ptr, input.len(), out_ptr, output.len())
                }
                ContainerFormat::Zlib => {
                    libdeflate_zlib_compress(ptr, in_ptr, input.len(), out_ptr, output.len())
                }
                ContainerFormat::Gzip => {
                    libdeflate_gzip_compress(ptr, in_ptr, input.len(), out_ptr, output.len())
                }
            }
        }
    }
}

impl Drop for RawCompressor {
    fn drop(&mut self) {
        // SAFETY: the pointer came from `libdeflate_alloc_compressor` and is
        // freed exactly once.
        unsafe { libdeflate_free_compressor(self.ptr.as_ptr()) }
    }
}

/// Outcome of a single native decompression attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum InflateStatus {
    /// Stream decoded; payload length in bytes.
    Done(usize),
    /// The output buffer is too small for the stream.
    InsufficientSpace,
    /// The stream is corrupt, truncated, or in another format.
    BadData,
    /// Any other result code.
    Other(libdeflate_result),
}

/// A libdeflate decompressor context.
pub(crate) struct RawDecompressor {
    ptr: NonNull<libdeflate_decompressor>,
}

// SAFETY: see `RawCompressor`.
unsafe impl Send for RawDecompressor {}

impl RawDecompressor {
    pub(crate) fn alloc() -> Option<Self> {
        // SAFETY: plain allocation call; a null return is handled below.
        let ptr = unsafe { libdeflate_alloc_decompressor() };
        NonNull::new(ptr).map(|ptr| Self { ptr })
    }

    /// Decompresses the whole of `input` into `output`.
    pub(crate) fn decompress(
        &mut self,
        format: ContainerFormat,
        input: &[u8],
        output: &mut [u8],
    ) -> InflateStatus {
        let ptr = self.ptr.as_ptr();
        let in_ptr = input.as_ptr().cast::<c_void>();
        let out_ptr = output.as_mut_ptr().cast::<c_void>();
        let mut actual = 0usize;
        // SAFETY: both slices are valid for their full lengths and do not
        // overlap; `actual` outlives the call.
        let result = unsafe {
            match format {
                ContainerFormat::RawDeflate => libdeflate_deflate_decompress(
                    ptr,
                    in_ptr,
                    input.len(),
                    out_ptr,
                    output.len(),
                    &mut actual,
                ),
                ContainerFormat::Zlib => libdeflate_zlib_decompress(
                    ptr,
                    in_ptr,
                    input.len(),
                    out_ptr,
                    output.len(),
                    &mut actual,
                ),
                ContainerFormat::Gzip => libdeflate_gzip_decompress(
                    ptr,
                    in_ptr,
                    input.len(),
                    out_ptr,
                    output.len(),
                    &mut actual,
                ),
            }
        };

        match result {
            r if r == libdeflate_result_LIBDEFLATE_SUCCESS => InflateStatus::Done(actual),
            r if r == libdeflate_result_LIBDEFLATE_INSUFFICIENT_SPACE => {
                InflateStatus::InsufficientSpace
            }
            r if r == libdeflate_result_LIBDEFLATE_BAD_DATA => InflateStatus::BadData,
            other => InflateStatus::Other(other),
        }
    }
}

impl Drop for RawDecompressor {
    fn drop(&mut self) {
        // SAFETY: the pointer came from `libdeflate_alloc_decompressor` and is
        // freed exactly once.
        unsafe { libdeflate_free_decompressor(self.ptr.as_ptr()) }
    }
}

/// Extends an Adler-32 value over `data`.
pub(crate) fn adler32(seed: u32, data: &[u8]) -> u32 {
    // SAFETY: `data` is valid for `data.len()` bytes; an empty slice still has
    // a non-null pointer, so libdeflate returns `seed` unchanged.
    unsafe { libdeflate_adler32(seed, data.as_ptr().cast::<c_void>(), data.len()) }
}

/// Extends a CRC-32 value over `data`.
pub(crate) fn crc32(seed: u32, data: &[u8]) -> u32 {
    // SAFETY: as for `adler32`.
    unsafe { libdeflate_crc32(seed, data.as_ptr().cast::<c_void>(), data.len()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressor_alloc_rejects_levels_above_twelve() {
        assert!(RawCompressor::alloc(13).is_none());
        assert!(RawCompressor::alloc(6).is_some());
    }

    #[test]
    fn tiny_output_reports_zero_bytes() {
        let mut compressor = RawCompressor::alloc(6).expect("context");
        let mut out = [0u8; 2];
        assert_eq!(
            compressor.compress(ContainerFormat::Zlib, b"foo", &mut out),
            0
        );
    }

    #[test]
    fn decompress_reports_insufficient_space() {
        let mut compressor = RawCompressor::alloc(6).expect("context");
        let input = vec![b'a'; 4096];
        let mut compressed = vec![0u8; compressor.bound(ContainerFormat::RawDeflate, input.len())];
        let n = compressor.compress(ContainerFormat::RawDeflate, &input, &mut compressed);
        compressed.truncate(n);

        let mut decompressor = RawDecompressor::alloc().expect("context");
        let mut small = vec![0u8; 16];
        assert_eq!(
            decompressor.decompress(ContainerFormat::RawDeflate, &compressed, &mut small),
            InflateStatus::InsufficientSpace
        );

        let mut full = vec![0u8; input.len()];
        assert_eq!(
            decompressor.decompress(ContainerFormat::RawDeflate, &compressed, &mut full),
            InflateStatus::Done(input.len())
        );
        assert_eq!(full, input);
    }

    #[test]
    fn garbage_is_bad_data() {
        let mut decompressor = RawDecompressor::alloc().expect("context");
        let mut out = vec![0u8; 64];
        assert_eq!(
            decompressor.decompress(ContainerFormat::RawDeflate, b"foo", &mut out),
            InflateStatus::BadData
        );
    }

    #[test]
    fn empty_data_leaves_seed_unchanged() {
        assert_eq!(adler32(42, &[]), 42);
        assert_eq!(crc32(42, &[]), 42);
    }
}
