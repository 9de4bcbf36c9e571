//! Per-value classification tags and their 2-bit packing.
//!
//! Every input value gets a descriptor: zero, NaN, or a defined value with
//! its sign. Only defined values contribute to the exponent and mantissa
//! streams, so the descriptor stream is written first and read first.
//!
//! ## Packing
//!
//! Four descriptors per byte, first value in the most significant pair. A
//! trailing group of one to three values is right-aligned in its byte:
//!
//! | values in group | shifts      |
//! |-----------------|-------------|
//! | 4               | 6, 4, 2, 0  |
//! | 3               | 4, 2, 0     |
//! | 2               | 2, 0        |
//! | 1               | 0           |

use crate::error::ConditionerError;
use crate::float::FloatBits;
use crate::stream::{read_exact_vec, ByteSink, ByteSource};

/// Descriptors packed into each byte.
pub const DESCRIPTORS_PER_BYTE: usize = 4;

/// Bit shifts for each position of a descriptor group, indexed by group length.
const SHIFTS: [&[u32]; DESCRIPTORS_PER_BYTE + 1] = [&[], &[0], &[2, 0], &[4, 2, 0], &[6, 4, 2, 0]];

/// Signs packed into each byte when special values are stored inline.
pub const SIGNS_PER_BYTE: usize = 8;

/// Classification of a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Descriptor {
    /// Positive or negative zero.
    Zero = 0,
    /// NaN with any payload.
    NaN = 1,
    /// Finite or infinite value with the sign bit clear.
    Positive = 2,
    /// Finite or infinite value with the sign bit set.
    Negative = 3,
}

impl Descriptor {
    /// Classify `x`.
    #[inline]
    pub fn of<F: FloatBits>(x: F) -> Self {
        if x.is_zero() {
            Descriptor::Zero
        } else if x.is_nan() {
            Descriptor::NaN
        } else if x.to_raw() & F::sign_mask() != 0 {
            Descriptor::Negative
        } else {
            Descriptor::Positive
        }
    }

    /// The 2-bit tag of this descriptor.
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Decode a tag. Only the low two bits are looked at.
    #[inline]
    pub fn from_tag(tag: u8) -> Self {
        match tag & 0b11 {
            0 => Descriptor::Zero,
            1 => Descriptor::NaN,
            2 => Descriptor::Positive,
            _ => Descriptor::Negative,
        }
    }

    /// True when the value has stored exponent and mantissa fields.
    #[inline]
    pub fn is_defined(self) -> bool {
        matches!(self, Descriptor::Positive | Descriptor::Negative)
    }

    /// True for [`Descriptor::Negative`].
    #[inline]
    pub fn is_negative(self) -> bool {
        self == Descriptor::Negative
    }

    /// The value a slot decodes to without consulting the field streams.
    ///
    /// Zero always decodes to positive zero and NaN to the canonical NaN;
    /// defined slots return `None` and must be combined from their fields.
    #[inline]
    pub fn placeholder<F: FloatBits>(self) -> Option<F> {
        match self {
            Descriptor::Zero => Some(F::ZERO),
            Descriptor::NaN => Some(F::CANONICAL_NAN),
            Descriptor::Positive | Descriptor::Negative => None,
        }
    }
}

/// Number of bytes the descriptor stream of `count` values occupies.
#[inline]
pub fn packed_len(count: usize) -> usize {
    count.div_ceil(DESCRIPTORS_PER_BYTE)
}

/// Classify and write the descriptors of `values`.
///
/// Returns the number of defined values, which sizes the field streams.
pub fn write_descriptors<F, S>(values: &[F], sink: &mut S) -> Result<usize, ConditionerError>
where
    F: FloatBits,
    S: ByteSink + ?Sized,
{
    let mut defined = 0;
    let mut packed = Vec::with_capacity(packed_len(values.len()));

    for group in values.chunks(DESCRIPTORS_PER_BYTE) {
        let mut byte = 0u8;
        for (&x, &shift) in group.iter().zip(SHIFTS[group.len()]) {
            let descriptor = Descriptor::of(x);
            if descriptor.is_defined() {
                defined += 1;
            }
            byte |= descriptor.tag() << shift;
        }
        packed.push(byte);
    }

    sink.write_bytes(&packed)?;
    Ok(defined)
}

/// Read back `count` descriptors.
///
/// Returns the descriptors together with the number of defined values.
pub fn read_descriptors<S>(
    count: usize,
    source: &mut S,
) -> Result<(Vec<Descriptor>, usize), ConditionerError>
where
    S: ByteSource + ?Sized,
{
    let packed = read_exact_vec(source, packed_len(count))?;

    let mut descriptors = Vec::with_capacity(count);
    let mut defined = 0;
    let mut remaining = count;

    for &byte in &packed {
        let group = remaining.min(DESCRIPTORS_PER_BYTE);
        for &shift in SHIFTS[group] {
            let descriptor = Descriptor::from_tag(byte >> shift);
            if descriptor.is_defined() {
                defined += 1;
            }
            descriptors.push(descriptor);
        }
        remaining -= group;
    }

    Ok((descriptors, defined))
}

/// Write one sign bit per value, eight per byte, first value most significant.
///
/// A trailing partial byte is right-aligned, like the descriptor stream.
pub fn write_signs<S>(negative: &[bool], sink: &mut S) -> Result<(), ConditionerError>
where
    S: ByteSink + ?Sized,
{
    let packed: Vec<u8> = negative
        .chunks(SIGNS_PER_BYTE)
        .map(|group| {
            group
                .iter()
                .fold(0u8, |acc, &negative| (acc << 1) | negative as u8)
        })
        .collect();
    sink.write_bytes(&packed)
}

/// Read back `count` sign bits written by [`write_signs`].
pub fn read_signs<S>(count: usize, source: &mut S) -> Result<Vec<bool>, ConditionerError>
where
    S: ByteSource + ?Sized,
{
    let packed = read_exact_vec(source, count.div_ceil(SIGNS_PER_BYTE))?;

    let mut signs = Vec::with_capacity(count);
    let mut remaining = count;
    for &byte in &packed {
        let group = remaining.min(SIGNS_PER_BYTE);
        for position in (0..group).rev() {
            signs.push((byte >> position) & 1 == 1);
        }
        remaining -= group;
    }
    Ok(signs)
}
