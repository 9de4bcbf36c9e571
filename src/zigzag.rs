//! Zig-zag sign mapping over an arbitrary bit width.
//!
//! Field deltas are computed modulo `2^W` where `W` is the width of the field
//! (11 or 52 bits for double exponents and mantissas, 23 for float mantissas,
//! 32 or 64 for whole values). Zig-zag maps those two's-complement
//! differences onto unsigned values so that small magnitudes of either sign
//! become small unsigned numbers:
//!
//! | signed | unsigned |
//! |--------|----------|
//! | 0      | 0        |
//! | -1     | 1        |
//! | 1      | 2        |
//! | -2     | 3        |

/// Bit widths the conditioner uses for signed differences.
pub const SUPPORTED_WIDTHS: [u32; 5] = [11, 23, 32, 52, 64];

/// Mask selecting the low `bits` bits of a `u64`.
#[inline]
pub fn mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Sign-extend the low `bits` bits of `x` to a full `i64`.
#[inline]
pub fn sign_extend(bits: u32, x: i64) -> i64 {
    let shift = 64 - bits;
    (x << shift) >> shift
}

/// Map a `bits`-wide two's-complement value to its zig-zag unsigned form.
///
/// Only the low `bits` bits of `x` are significant, so a wrapping difference
/// of two field values can be passed in directly. The result is always
/// below `2^bits`.
#[inline]
pub fn to_unsigned(bits: u32, x: i64) -> u64 {
    debug_assert!((1..=64).contains(&bits));
    let extended = sign_extend(bits, x);
    (((extended << 1) ^ (extended >> 63)) as u64) & mask(bits)
}

/// Inverse of [`to_unsigned`]: recover the sign-extended signed value.
#[inline]
pub fn to_signed(bits: u32, u: u64) -> i64 {
    debug_assert!((1..=64).contains(&bits));
    let half = (u & mask(bits)) >> 1;
    if u & 1 == 0 {
        half as i64
    } else {
        !(half as i64)
    }
}
