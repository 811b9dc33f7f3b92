//! Debug events for sizing decisions (enabled by the `tracing` feature).

#[cfg(feature = "tracing")]
use tracing::debug;

use crate::format::ContainerFormat;

/// Records a finished compression call.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_compress(format: ContainerFormat, level: i32, input: usize, output: usize) {
    debug!(
        target: "deflate::compress",
        format = format.name(),
        level = level,
        input = input,
        output = output,
        "compressed {} -> {} bytes ({}, level {})",
        input,
        output,
        format,
        level
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_compress(_format: ContainerFormat, _level: i32, _input: usize, _output: usize) {}

/// Records a buffer growth step after libdeflate ran out of output space.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_grow(format: ContainerFormat, from: usize, to: usize) {
    debug!(
        target: "deflate::decompress",
        format = format.name(),
        from = from,
        to = to,
        "output buffer too small, growing {} -> {} bytes",
        from,
        to
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_grow(_format: ContainerFormat, _from: usize, _to: usize) {}

/// Records a finished decompression call.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_decompress(format: ContainerFormat, input: usize, output: usize, attempts: u32) {
    debug!(
        target: "deflate::decompress",
        format = format.name(),
        input = input,
        output = output,
        attempts = attempts,
        "decompressed {} -> {} bytes ({}, {} attempt(s))",
        input,
        output,
        format,
        attempts
    );
}

#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_decompress(
    _format: ContainerFormat,
    _input: usize,
    _output: usize,
    _attempts: u32,
) {
}
