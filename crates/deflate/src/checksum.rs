//! Adler-32 and CRC-32 (IEEE 802.3) checksums computed by libdeflate.
//!
//! Both checksums fold: extending a value over `a` and then over `b` gives the
//! same result as a single pass over `a ++ b`. [`adler32`] and [`crc32`] take
//! optional data and seed; [`Adler32`] and [`Crc32`] carry the running value
//! for streaming use.

use std::io;

use crate::ffi;

/// Initial Adler-32 value.
pub const ADLER32_INIT: u32 = 1;

/// Initial CRC-32 value.
pub const CRC32_INIT: u32 = 0;

/// Reduces an arbitrary integer seed modulo 2^32.
#[inline]
const fn normalize_seed(seed: i64) -> u32 {
    seed.rem_euclid(1 << 32) as u32
}

/// Computes or extends an Adler-32 checksum.
///
/// `seed` defaults to [`ADLER32_INIT`] and is reduced modulo 2^32. With no
/// `data`, the seed is returned unchanged.
///
/// ```
/// use deflate::checksum::adler32;
///
/// assert_eq!(adler32(None, None), 1);
/// assert_eq!(adler32(Some(&b"foo"[..]), None), 42_074_437);
/// assert_eq!(adler32(Some(&b"oo"[..]), Some(adler32(Some(&b"f"[..]), None).into())), 42_074_437);
/// ```
#[must_use]
pub fn adler32(data: Option<&[u8]>, seed: Option<i64>) -> u32 {
    let seed = seed.map_or(ADLER32_INIT, normalize_seed);
    data.map_or(seed, |data| ffi::adler32(seed, data))
}

/// Computes or extends a CRC-32 checksum.
///
/// `seed` defaults to [`CRC32_INIT`] and is reduced modulo 2^32. With no
/// `data`, the seed is returned unchanged.
#[must_use]
pub fn crc32(data: Option<&[u8]>, seed: Option<i64>) -> u32 {
    let seed = seed.map_or(CRC32_INIT, normalize_seed);
    data.map_or(seed, |data| ffi::crc32(seed, data))
}

/// Extends `adler` over `data`.
#[must_use]
pub fn adler32_update(adler: u32, data: &[u8]) -> u32 {
    ffi::adler32(adler, data)
}

/// Extends `crc` over `data`.
#[must_use]
pub fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    ffi::crc32(crc, data)
}

/// Running Adler-32 state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Adler32 {
    value: u32,
}

impl Adler32 {
    /// Starts from [`ADLER32_INIT`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: ADLER32_INIT,
        }
    }

    /// Continues from a previously computed value.
    #[must_use]
    pub const fn with_seed(value: u32) -> Self {
        Self { value }
    }

    /// Folds `data` into the checksum.
    pub fn update(&mut self, data: &[u8]) {
        self.value = ffi::adler32(self.value, data);
    }

    /// Current checksum.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

impl io::Write for Adler32 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Running CRC-32 state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Crc32 {
    value: u32,
}

impl Crc32 {
    /// Starts from [`CRC32_INIT`].
    #[must_use]
    pub const fn new() -> Self {
        Self { value: CRC32_INIT }
    }

    /// Continues from a previously computed value.
    #[must_use]
    pub const fn with_seed(value: u32) -> Self {
        Self { value }
    }

    /// Folds `data` into the checksum.
    pub fn update(&mut self, data: &[u8]) {
        self.value = ffi::crc32(self.value, data);
    }

    /// Current checksum.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }
}

impl io::Write for Crc32 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn adler32_known_values() {
        assert_eq!(adler32(None, None), 1);
        assert_eq!(adler32(Some(&b""[..]), None), 1);
        assert_eq!(adler32(Some(&b"foo"[..]), None), 42_074_437);
        assert_eq!(adler32(Some(&b""[..]), Some(42)), 42);
        assert_eq!(adler32(Some(&b"foo"[..]), Some(42)), 50_135_406);
    }

    #[test]
    fn crc32_known_values() {
        assert_eq!(crc32(None, None), 0);
        assert_eq!(crc32(Some(&b""[..]), None), 0);
        assert_eq!(crc32(Some(&b"foo"[..]), None), 2_356_372_769);
        assert_eq!(crc32(Some(&b""[..]), Some(42)), 42);
        assert_eq!(crc32(Some(&b"foo"[..]), Some(42)), 3_114_903_063);
    }

    #[test]
    fn missing_data_returns_seed() {
        assert_eq!(adler32(None, Some(42)), 42);
        assert_eq!(crc32(None, Some(42)), 42);
    }

    #[test]
    fn seeds_wrap_modulo_two_pow_32() {
        assert_eq!(normalize_seed(-1), u32::MAX);
        assert_eq!(normalize_seed(-42), u32::MAX - 41);
        assert_eq!(normalize_seed(1 << 32), 0);
        assert_eq!(normalize_seed((1 << 32) + 42), 42);
        assert_eq!(
            crc32(Some(&b"foo"[..]), Some((1 << 32) + 42)),
            crc32(Some(&b"foo"[..]), Some(42))
        );
        assert_eq!(adler32(None, Some(-42)), u32::MAX - 41);
    }

    #[test]
    fn folding_matches_single_pass() {
        let f = adler32(Some(&b"f"[..]), None);
        assert_eq!(adler32(Some(&b"oo"[..]), Some(i64::from(f))), 42_074_437);
        let f = crc32(Some(&b"f"[..]), None);
        assert_eq!(crc32(Some(&b"oo"[..]), Some(i64::from(f))), 2_356_372_769);
    }

    #[test]
    fn streaming_state_matches_free_functions() {
        let mut adler = Adler32::new();
        let mut crc = Crc32::new();
        for chunk in [&b"f"[..], b"o", b"o"] {
            adler.write_all(chunk).unwrap();
            crc.update(chunk);
        }
        assert_eq!(adler.value(), 42_074_437);
        assert_eq!(crc.value(), 2_356_372_769);
        assert_eq!(Adler32::with_seed(42).value(), 42);
        assert_eq!(Adler32::default().value(), ADLER32_INIT);
    }
}
