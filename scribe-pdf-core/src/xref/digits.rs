//! Locale-free decimal formatting into caller-owned byte buffers.
//!
//! The xref layer sizes every buffer up front from [`decimal_len`] and then
//! fills it in place, so no intermediate strings are produced even for
//! tables with tens of thousands of entries.

/// Number of ASCII digits needed to print `value` in base 10.
pub fn decimal_len(value: u64) -> usize {
    let mut len = 1;
    let mut rest = value / 10;
    while rest > 0 {
        len += 1;
        rest /= 10;
    }
    len
}

/// Writes `value` right-aligned into `buf`, most significant digit first,
/// padding the remaining leading positions with `'0'`.
///
/// `buf.len()` is the field width. Digits that do not fit are dropped from
/// the front, so callers must check the width beforehand.
pub fn write_padded(buf: &mut [u8], value: u64) {
    let mut rest = value;
    for slot in buf.iter_mut().rev() {
        *slot = b'0' + (rest % 10) as u8;
        rest /= 10;
    }
}

/// Writes `value` without padding at the start of `buf` and returns the
/// number of bytes written.
pub fn write_decimal(buf: &mut [u8], value: u64) -> usize {
    let len = decimal_len(value);
    write_padded(&mut buf[..len], value);
    len
}
