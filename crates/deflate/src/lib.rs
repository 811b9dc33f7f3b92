#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `deflate` binds the [libdeflate](https://github.com/ebiggers/libdeflate)
//! codec for use by the rest of the workspace. It exposes a [`Compressor`] and
//! a [`Decompressor`] that hold reusable native contexts, plus the Adler-32 and
//! CRC-32 functions in [`checksum`]. The crate contains no codec logic of its
//! own: it sizes buffers, calls libdeflate's one-shot routines, and translates
//! native result codes into [`DeflateError`].
//!
//! # Design
//!
//! - [`Compressor`] validates its [`CompressionLevel`] at construction, sizes
//!   output with libdeflate's worst-case bound, and trims the result to the
//!   length libdeflate reports.
//! - [`Decompressor`] does not know the decompressed size in advance. It starts
//!   from a guess derived from the input length and doubles the buffer on every
//!   "insufficient space" result, up to a per-instance limit.
//! - Every framing variant is selected per call through [`ContainerFormat`].
//!
//! # Invariants
//!
//! - All `unsafe` code is confined to the private `ffi` module, whose handles
//!   own their native context and free it on drop.
//! - Caller-supplied [`OutputBuffer`]s are overwritten only after the native
//!   call succeeded. A failed call leaves them unchanged, and frozen buffers
//!   are rejected before any work starts.
//! - Instances are `Send` but not `Sync`; every operation takes `&mut self`.
//!
//! # Errors
//!
//! Every fallible operation returns [`DeflateError`]. Use
//! [`DeflateError::category`] to distinguish configuration mistakes, corrupt
//! input, frozen buffers, and resource exhaustion.
//!
//! # Examples
//!
//! ```
//! use deflate::{Compressor, ContainerFormat, Decompressor};
//!
//! # fn main() -> Result<(), deflate::DeflateError> {
//! let mut compressor = Compressor::new(6)?;
//! let mut decompressor = Decompressor::new()?;
//!
//! let gzip = compressor.compress(b"foo", ContainerFormat::Gzip)?;
//! assert_eq!(&gzip[..3], &[0x1f, 0x8b, 0x08]);
//!
//! let mut out = b"stale".to_vec();
//! decompressor.decompress_into(&gzip, ContainerFormat::Gzip, &mut out)?;
//! assert_eq!(out, b"foo");
//! # Ok(())
//! # }
//! ```

mod buffer;
pub mod checksum;
mod compressor;
mod decompressor;
mod error;
mod ffi;
mod format;
mod level;
mod trace;

pub use buffer::OutputBuffer;
pub use checksum::{adler32, crc32};
pub use compressor::Compressor;
pub use decompressor::{DEFAULT_MAX_OUTPUT, Decompressor};
pub use error::{DeflateError, ErrorCategory};
pub use format::ContainerFormat;
pub use level::CompressionLevel;
