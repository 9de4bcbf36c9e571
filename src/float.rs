//! IEEE-754 bit views and field splitting.
//!
//! [`FloatBits`] is the only place that knows how a float is laid out in
//! memory. Everything downstream works on the three unsigned fields it
//! exposes (sign, exponent, mantissa) or on the whole raw bit pattern.

use std::fmt::Debug;

/// How successive values of a field are differenced by the delta strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaMode {
    /// Signed difference, zig-zag mapped at the field width.
    ZigZag,
    /// Plain truncating subtraction modulo `2^bits`, no sign mapping.
    ///
    /// Only float exponents use this. Switching them to zig-zag would change
    /// the conditioned bytes.
    Wrapping,
}

/// An unsigned field extracted from a float's raw bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Number of significant bits in the field.
    pub bits: u32,
    /// How deltas over this field are formed.
    pub delta: DeltaMode,
}

impl Field {
    /// A field of `bits` bits using zig-zag deltas.
    pub const fn zigzag(bits: u32) -> Self {
        Field {
            bits,
            delta: DeltaMode::ZigZag,
        }
    }

    /// A field of `bits` bits using wrapping deltas.
    pub const fn wrapping(bits: u32) -> Self {
        Field {
            bits,
            delta: DeltaMode::Wrapping,
        }
    }

    /// Number of bytes needed to hold one value of this field.
    #[inline]
    pub const fn bytes(&self) -> usize {
        self.bits.div_ceil(8) as usize
    }

    /// Mask selecting the field's significant bits.
    #[inline]
    pub fn mask(&self) -> u64 {
        crate::zigzag::mask(self.bits)
    }
}

/// The sign, exponent and mantissa of a non-zero, non-NaN float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitFields {
    /// True when the sign bit is set.
    pub negative: bool,
    /// The biased exponent field, shifted down to bit 0.
    pub exponent: u64,
    /// The mantissa field without the implicit leading bit.
    pub mantissa: u64,
}

/// Fixed-width unsigned bit view of an IEEE-754 type.
pub trait FloatBits: Copy + PartialEq + Debug + 'static {
    /// Total width of the type in bits.
    const TOTAL_BITS: u32;
    /// Width of the exponent field in bits.
    const EXPONENT_BITS: u32;
    /// Width of the mantissa field in bits.
    const MANTISSA_BITS: u32;
    /// Delta mode used for the exponent field.
    const EXPONENT_DELTA: DeltaMode;
    /// The NaN every decoded NaN slot receives.
    const CANONICAL_NAN: Self;
    /// Positive zero.
    const ZERO: Self;

    /// The raw bit pattern, zero-extended to 64 bits.
    fn to_raw(self) -> u64;

    /// Rebuild a value from the low `TOTAL_BITS` bits of `raw`.
    fn from_raw(raw: u64) -> Self;

    /// True for NaN with any payload or sign.
    fn is_nan(self) -> bool;

    /// True for positive or negative zero.
    fn is_zero(self) -> bool;

    /// Mask of the sign bit within the raw pattern.
    #[inline]
    fn sign_mask() -> u64 {
        1u64 << (Self::TOTAL_BITS - 1)
    }

    /// Mask of the exponent field within the raw pattern.
    #[inline]
    fn exponent_mask() -> u64 {
        crate::zigzag::mask(Self::EXPONENT_BITS) << Self::MANTISSA_BITS
    }

    /// Mask of the mantissa field within the raw pattern.
    #[inline]
    fn mantissa_mask() -> u64 {
        crate::zigzag::mask(Self::MANTISSA_BITS)
    }

    /// Field description of the exponent.
    fn exponent_field() -> Field {
        Field {
            bits: Self::EXPONENT_BITS,
            delta: Self::EXPONENT_DELTA,
        }
    }

    /// Field description of the mantissa.
    fn mantissa_field() -> Field {
        Field::zigzag(Self::MANTISSA_BITS)
    }

    /// Field description of the entire raw bit pattern.
    fn whole_field() -> Field {
        Field::zigzag(Self::TOTAL_BITS)
    }
}

impl FloatBits for f32 {
    const TOTAL_BITS: u32 = 32;
    const EXPONENT_BITS: u32 = 8;
    const MANTISSA_BITS: u32 = 23;
    const EXPONENT_DELTA: DeltaMode = DeltaMode::Wrapping;
    const CANONICAL_NAN: Self = f32::NAN;
    const ZERO: Self = 0.0;

    #[inline]
    fn to_raw(self) -> u64 {
        self.to_bits() as u64
    }

    #[inline]
    fn from_raw(raw: u64) -> Self {
        f32::from_bits(raw as u32)
    }

    #[inline]
    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }

    #[inline]
    fn is_zero(self) -> bool {
        self == 0.0
    }
}

impl FloatBits for f64 {
    const TOTAL_BITS: u32 = 64;
    const EXPONENT_BITS: u32 = 11;
    const MANTISSA_BITS: u32 = 52;
    const EXPONENT_DELTA: DeltaMode = DeltaMode::ZigZag;
    const CANONICAL_NAN: Self = f64::NAN;
    const ZERO: Self = 0.0;

    #[inline]
    fn to_raw(self) -> u64 {
        self.to_bits()
    }

    #[inline]
    fn from_raw(raw: u64) -> Self {
        f64::from_bits(raw)
    }

    #[inline]
    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }

    #[inline]
    fn is_zero(self) -> bool {
        self == 0.0
    }
}

/// Decompose `x` into sign, exponent and mantissa fields.
///
/// Any bit pattern is accepted; the conditioner only calls this for values
/// classified as defined unless special values are stored inline.
#[inline]
pub fn split<F: FloatBits>(x: F) -> SplitFields {
    let raw = x.to_raw();
    SplitFields {
        negative: raw & F::sign_mask() != 0,
        exponent: (raw & F::exponent_mask()) >> F::MANTISSA_BITS,
        mantissa: raw & F::mantissa_mask(),
    }
}

/// Reassemble a value from its fields. Exact inverse of [`split`].
///
/// Bits above each field's width are ignored.
#[inline]
pub fn combine<F: FloatBits>(fields: SplitFields) -> F {
    let sign = if fields.negative { F::sign_mask() } else { 0 };
    let exponent = (fields.exponent << F::MANTISSA_BITS) & F::exponent_mask();
    F::from_raw(sign | exponent | (fields.mantissa & F::mantissa_mask()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks() {
        assert_eq!(f32::sign_mask(), 0x8000_0000);
        assert_eq!(f32::exponent_mask(), 0x7F80_0000);
        assert_eq!(f32::mantissa_mask(), 0x007F_FFFF);
        assert_eq!(f64::sign_mask(), 0x8000_0000_0000_0000);
        assert_eq!(f64::exponent_mask(), 0x7FF0_0000_0000_0000);
        assert_eq!(f64::mantissa_mask(), 0x000F_FFFF_FFFF_FFFF);
    }

    #[test]
    fn test_field_bytes() {
        assert_eq!(f32::exponent_field().bytes(), 1);
        assert_eq!(f32::mantissa_field().bytes(), 3);
        assert_eq!(f32::whole_field().bytes(), 4);
        assert_eq!(f64::exponent_field().bytes(), 2);
        assert_eq!(f64::mantissa_field().bytes(), 7);
        assert_eq!(f64::whole_field().bytes(), 8);
        assert_eq!(f32::exponent_field().delta, DeltaMode::Wrapping);
        assert_eq!(f64::exponent_field().delta, DeltaMode::ZigZag);
    }

    #[test]
    fn test_split_known_values() {
        assert_eq!(
            split(1.0f32),
            SplitFields {
                negative: false,
                exponent: 127,
                mantissa: 0
            }
        );
        assert_eq!(
            split(-2.5f64),
            SplitFields {
                negative: true,
                exponent: 1024,
                mantissa: 1 << 50
            }
        );
        assert_eq!(split(f32::INFINITY).exponent, 255);
        assert_eq!(split(f32::INFINITY).mantissa, 0);
        assert_eq!(split(f64::NEG_INFINITY).exponent, 2047);
    }

    #[test]
    fn test_split_combine_roundtrip_f32() {
        let values = [
            1.0f32,
            -1.0,
            3.9999999,
            f32::MIN_POSITIVE,
            f32::from_bits(1), // smallest subnormal
            -f32::from_bits(0x007F_FFFF),
            f32::MAX,
            f32::MIN,
            f32::INFINITY,
            f32::NEG_INFINITY,
        ];
        for x in values {
            let y: f32 = combine(split(x));
            assert_eq!(x.to_bits(), y.to_bits(), "{:?}", x);
        }
    }

    #[test]
    fn test_split_combine_roundtrip_f64() {
        let values = [
            1.0f64,
            -1.0,
            std::f64::consts::PI,
            f64::MIN_POSITIVE,
            f64::from_bits(1),
            f64::MAX,
            f64::MIN,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ];
        for x in values {
            let y: f64 = combine(split(x));
            assert_eq!(x.to_bits(), y.to_bits(), "{:?}", x);
        }
    }

    #[test]
    fn test_combine_ignores_excess_bits() {
        let y: f32 = combine(SplitFields {
            negative: false,
            exponent: 0x1FF,
            mantissa: 0xFF80_0000,
        });
        assert_eq!(y.to_bits(), 0x7F80_0000);
    }
}
