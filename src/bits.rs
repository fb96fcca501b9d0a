//! Bit-window access into byte buffers.
//!
//! The IPMI wire convention packs fields least-significant-bit first
//! within each byte, in declaration order: bit `k` of the overall stream
//! lives at bit `k % 8` of byte `k / 8`, and a value's bit 0 lands on the
//! lowest stream bit of its window. A window may straddle byte
//! boundaries; these helpers mask and shift one byte at a time.

/// Read `width` bits (at most 64) starting at stream bit `off`.
///
/// Callers must ensure the window lies within `buf`.
pub(crate) fn read_bits(buf: &[u8], mut off: usize, mut width: usize) -> u64 {
    debug_assert!(width <= 64);
    debug_assert!(off + width <= buf.len() * 8);

    let mut out = 0u64;
    let mut shift = 0;
    while width > 0 {
        let bit = off % 8;
        let take = (8 - bit).min(width);
        let mask = (((1u16 << take) - 1) as u8) << bit;
        let chunk = (buf[off / 8] & mask) >> bit;
        out |= (chunk as u64) << shift;
        shift += take;
        off += take;
        width -= take;
    }
    out
}

/// Write the low `width` bits (at most 64) of `val` at stream bit `off`,
/// leaving bits outside the window untouched.
pub(crate) fn write_bits(buf: &mut [u8], mut off: usize, mut width: usize, mut val: u64) {
    debug_assert!(width <= 64);
    debug_assert!(off + width <= buf.len() * 8);

    while width > 0 {
        let bit = off % 8;
        let take = (8 - bit).min(width);
        let mask = (((1u16 << take) - 1) as u8) << bit;
        let byte = &mut buf[off / 8];
        *byte = (*byte & !mask) | (((val as u8) << bit) & mask);
        val >>= take;
        off += take;
        width -= take;
    }
}

/// Copy a bit window of arbitrary width between two buffers.
pub(crate) fn copy_bits(
    src: &[u8],
    mut src_off: usize,
    dst: &mut [u8],
    mut dst_off: usize,
    mut width: usize,
) {
    while width > 0 {
        let take = width.min(32);
        let val = read_bits(src, src_off, take);
        write_bits(dst, dst_off, take, val);
        src_off += take;
        dst_off += take;
        width -= take;
    }
}
