//! Bit-vector helpers
//!
//! Signal values are `BitVec`s stored least significant bit first.

use bitvec::prelude::*;

/// Low `width` bits of `value` as a bit vector (zero-extended past 128 bits)
pub fn bits_from_u128(value: u128, width: usize) -> BitVec {
    let mut bits = bitvec![0; width];
    for (i, mut bit) in bits.iter_mut().enumerate().take(128) {
        *bit = (value >> i) & 1 == 1;
    }
    bits
}

/// Value of a bit vector, or `None` if a set bit lies above bit 127
pub fn bits_to_u128(bits: &BitSlice) -> Option<u128> {
    if bits.iter_ones().any(|i| i >= 128) {
        return None;
    }
    Some(
        bits.iter_ones()
            .fold(0u128, |acc, i| acc | (1u128 << i)),
    )
}

/// Hex digits of a bit vector, most significant first, without prefix
///
/// Always renders `ceil(len / 4)` digits (at least one).
pub fn format_hex(bits: &BitSlice) -> String {
    let digits = bits.len().div_ceil(4).max(1);
    (0..digits)
        .rev()
        .map(|d| {
            let nibble = (0..4).fold(0u32, |acc, i| {
                let set = bits.get(d * 4 + i).map(|b| *b).unwrap_or(false);
                acc | (u32::from(set) << i)
            });
            // nibble < 16
            char::from_digit(nibble, 16).unwrap_or('0')
        })
        .collect()
}
