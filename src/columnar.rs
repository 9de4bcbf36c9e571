//! Columnar byte-plane layout for fixed-width unsigned values.
//!
//! A [`Codec`] partitions the byte width of a value into ordered groups. For
//! each group, the corresponding bytes of *every* value are written before
//! moving on to the next group, so bytes at the same position across values
//! end up next to each other:
//!
//! ```text
//! values (3 bytes each, little-endian):  a0 a1 a2 | b0 b1 b2 | c0 c1 c2
//!
//! codec [3]       a0 a1 a2 b0 b1 b2 c0 c1 c2       (value-contiguous)
//! codec [1, 2]    a0 b0 c0 a1 a2 b1 b2 c1 c2
//! codec [1, 1, 1] a0 b0 c0 a1 b1 c1 a2 b2 c2       (fully transposed)
//! ```
//!
//! The codec is never written to the stream; the writer and reader must agree
//! on it out of band.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConditionerError;
use crate::stream::{read_exact_vec, ByteSink, ByteSource};

/// Maximum byte width of a value handled by the columnar layout.
pub const MAX_WIDTH: usize = 8;

/// An ordered partition of a value's byte width into groups.
///
/// Entries are positive and sum to [`Codec::width`]; both are checked at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<usize>", into = "Vec<usize>"))]
pub struct Codec {
    groups: Vec<usize>,
}

impl Codec {
    /// Build a codec from its group sizes, which must sum to `width` bytes.
    pub fn new(groups: Vec<usize>, width: usize) -> Result<Self, ConditionerError> {
        let codec = Self::from_groups(groups)?;
        codec.check_width(width)?;
        Ok(codec)
    }

    /// Build a codec from its group sizes, taking the width from their sum.
    pub fn from_groups(groups: Vec<usize>) -> Result<Self, ConditionerError> {
        if groups.is_empty() {
            return Err(ConditionerError::InvalidCodec(
                "codec must have at least one group".into(),
            ));
        }
        if let Some(&bad) = groups.iter().find(|&&n| n == 0) {
            return Err(ConditionerError::InvalidCodec(format!(
                "group size {} in {:?} is not positive",
                bad, groups
            )));
        }
        if let Some(&bad) = groups.iter().find(|&&n| n > MAX_WIDTH) {
            return Err(ConditionerError::InvalidCodec(format!(
                "group size {} in {:?} exceeds the maximum width of {}",
                bad, groups, MAX_WIDTH
            )));
        }
        let width = groups
            .iter()
            .try_fold(0usize, |acc, &n| acc.checked_add(n))
            .unwrap_or(usize::MAX);
        if width > MAX_WIDTH {
            return Err(ConditionerError::InvalidCodec(format!(
                "{:?} spans {} bytes, more than the maximum of {}",
                groups, width, MAX_WIDTH
            )));
        }
        Ok(Codec { groups })
    }

    /// Build a codec from signed group sizes, rejecting zero and negative entries.
    pub fn from_signed(groups: &[i64], width: usize) -> Result<Self, ConditionerError> {
        let groups = groups
            .iter()
            .map(|&n| {
                usize::try_from(n)
                    .ok()
                    .filter(|&n| n > 0)
                    .ok_or_else(|| {
                        ConditionerError::InvalidCodec(format!(
                            "group size {} in {:?} is not positive",
                            n, groups
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(groups, width)
    }

    /// The single-group codec: values stay contiguous.
    pub fn contiguous(width: usize) -> Result<Self, ConditionerError> {
        Self::new(vec![width], width)
    }

    /// One group per byte: every byte plane is separated.
    pub fn transposed(width: usize) -> Result<Self, ConditionerError> {
        Self::new(vec![1; width], width)
    }

    /// Single group of `width` bytes, for widths already known to be valid.
    pub(crate) fn whole_group(width: usize) -> Self {
        debug_assert!((1..=MAX_WIDTH).contains(&width));
        Codec {
            groups: vec![width],
        }
    }

    /// One group per byte, for widths already known to be valid.
    pub(crate) fn byte_planes(width: usize) -> Self {
        debug_assert!((1..=MAX_WIDTH).contains(&width));
        Codec {
            groups: vec![1; width],
        }
    }

    /// The group sizes, in order.
    pub fn groups(&self) -> &[usize] {
        &self.groups
    }

    /// Total byte width covered by the codec.
    pub fn width(&self) -> usize {
        self.groups.iter().sum()
    }

    /// Fail unless the codec covers exactly `width` bytes.
    pub fn check_width(&self, width: usize) -> Result<(), ConditionerError> {
        if self.width() != width {
            return Err(ConditionerError::InvalidCodec(format!(
                "{} sums to {} bytes but the field is {} bytes wide",
                self,
                self.width(),
                width
            )));
        }
        Ok(())
    }

    /// Write `values` in byte-plane order.
    ///
    /// Only the low [`Codec::width`] bytes of each value are written.
    pub fn write<S>(&self, values: &[u64], sink: &mut S) -> Result<(), ConditionerError>
    where
        S: ByteSink + ?Sized,
    {
        let mut planes = Vec::with_capacity(values.len() * self.width());
        let mut offset = 0u32;
        for &group in &self.groups {
            for &value in values {
                let bytes = (value >> offset).to_le_bytes();
                planes.extend_from_slice(&bytes[..group]);
            }
            offset += group as u32 * 8;
        }
        sink.write_bytes(&planes)
    }

    /// Read `count` values written by [`Codec::write`] with the same codec.
    pub fn read<S>(&self, count: usize, source: &mut S) -> Result<Vec<u64>, ConditionerError>
    where
        S: ByteSource + ?Sized,
    {
        let len = count.checked_mul(self.width()).ok_or_else(|| {
            ConditionerError::InvalidParameter(format!(
                "{} values of {} bytes overflow the addressable length",
                count,
                self.width()
            ))
        })?;
        let planes = read_exact_vec(source, len)?;

        let mut values = vec![0u64; count];
        let mut offset = 0u32;
        let mut chunks = planes.as_slice();
        for &group in &self.groups {
            let (plane, rest) = chunks.split_at(count * group);
            for (value, bytes) in values.iter_mut().zip(plane.chunks_exact(group)) {
                for (i, &byte) in bytes.iter().enumerate() {
                    *value |= (byte as u64) << (offset + i as u32 * 8);
                }
            }
            chunks = rest;
            offset += group as u32 * 8;
        }
        Ok(values)
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", group)?;
        }
        write!(f, "]")
    }
}

impl TryFrom<Vec<usize>> for Codec {
    type Error = ConditionerError;

    fn try_from(groups: Vec<usize>) -> Result<Self, Self::Error> {
        Codec::from_groups(groups)
    }
}

impl From<Codec> for Vec<usize> {
    fn from(codec: Codec) -> Self {
        codec.groups
    }
}
