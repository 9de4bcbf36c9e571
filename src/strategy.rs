//! Literal and delta encodings for a stream of field values.
//!
//! ## Literal
//!
//! Values go through the columnar layout unchanged.
//!
//! ## Delta
//!
//! The first value is written as a plain little-endian baseline of the
//! field's byte width. Each following value is replaced by its difference
//! from the previous original value, and the `count - 1` differences go
//! through the columnar layout. Differences are zig-zag mapped at the field
//! width, except for fields using [`DeltaMode::Wrapping`] where the
//! truncated difference is stored as-is.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::columnar::Codec;
use crate::error::ConditionerError;
use crate::float::{DeltaMode, Field};
use crate::stream::{ByteSink, ByteSource};
use crate::zigzag;

/// How one field stream is encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strategy {
    /// Values as-is, laid out by the codec.
    Literal(Codec),
    /// Baseline plus successive differences, differences laid out by the codec.
    Delta(Codec),
}

impl Strategy {
    /// The codec used for the columnar part of the stream.
    pub fn codec(&self) -> &Codec {
        match self {
            Strategy::Literal(codec) | Strategy::Delta(codec) => codec,
        }
    }

    /// True for [`Strategy::Delta`].
    pub fn is_delta(&self) -> bool {
        matches!(self, Strategy::Delta(_))
    }

    /// Fail unless the codec fits `field`.
    pub fn check_field(&self, field: Field) -> Result<(), ConditionerError> {
        self.codec().check_width(field.bytes())
    }

    /// Write `values`, each holding a `field.bits`-wide field value.
    pub fn write<S>(
        &self,
        field: Field,
        values: &[u64],
        sink: &mut S,
    ) -> Result<(), ConditionerError>
    where
        S: ByteSink + ?Sized,
    {
        log::trace!(
            "writing {} values of a {}-bit field as {}",
            values.len(),
            field.bits,
            self
        );
        match self {
            Strategy::Literal(codec) => codec.write(values, sink),
            Strategy::Delta(codec) => {
                let Some(&first) = values.first() else {
                    return Ok(());
                };
                write_baseline(field, first, sink)?;
                let deltas: Vec<u64> = values
                    .windows(2)
                    .map(|pair| delta(field, pair[0], pair[1]))
                    .collect();
                codec.write(&deltas, sink)
            }
        }
    }

    /// Read `count` values written by [`Strategy::write`] with the same field and strategy.
    pub fn read<S>(
        &self,
        field: Field,
        count: usize,
        source: &mut S,
    ) -> Result<Vec<u64>, ConditionerError>
    where
        S: ByteSource + ?Sized,
    {
        log::trace!("reading {} values of a {}-bit field as {}", count, field.bits, self);
        match self {
            Strategy::Literal(codec) => codec.read(count, source),
            Strategy::Delta(codec) => {
                if count == 0 {
                    return Ok(Vec::new());
                }
                let first = read_baseline(field, source)?;
                let deltas = codec.read(count - 1, source)?;

                let mut values = Vec::with_capacity(count);
                values.push(first);
                let mut last = first;
                for d in deltas {
                    last = undelta(field, last, d);
                    values.push(last);
                }
                Ok(values)
            }
        }
    }
}

#[inline]
fn delta(field: Field, previous: u64, current: u64) -> u64 {
    let diff = current.wrapping_sub(previous);
    match field.delta {
        DeltaMode::ZigZag => zigzag::to_unsigned(field.bits, diff as i64),
        DeltaMode::Wrapping => diff & field.mask(),
    }
}

#[inline]
fn undelta(field: Field, previous: u64, delta: u64) -> u64 {
    let step = match field.delta {
        DeltaMode::ZigZag => zigzag::to_signed(field.bits, delta) as u64,
        DeltaMode::Wrapping => delta,
    };
    previous.wrapping_add(step) & field.mask()
}

fn write_baseline<S>(field: Field, value: u64, sink: &mut S) -> Result<(), ConditionerError>
where
    S: ByteSink + ?Sized,
{
    let bytes = (value & field.mask()).to_le_bytes();
    sink.write_bytes(&bytes[..field.bytes()])
}

fn read_baseline<S>(field: Field, source: &mut S) -> Result<u64, ConditionerError>
where
    S: ByteSource + ?Sized,
{
    let mut bytes = [0u8; 8];
    source.read_bytes(&mut bytes[..field.bytes()])?;
    Ok(u64::from_le_bytes(bytes) & field.mask())
}

impl fmt::Display for Strategy {
    /// Formats as `literal:1,1,1` or `delta:3`, the form [`FromStr`] accepts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Strategy::Literal(_) => "literal",
            Strategy::Delta(_) => "delta",
        };
        write!(f, "{}:", kind)?;
        for (i, group) in self.codec().groups().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", group)?;
        }
        Ok(())
    }
}

impl FromStr for Strategy {
    type Err = ConditionerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, groups) = s.trim().split_once(':').ok_or_else(|| {
            ConditionerError::InvalidParameter(format!(
                "expected `literal:<groups>` or `delta:<groups>`, got {:?}",
                s
            ))
        })?;

        let groups = groups
            .split(',')
            .map(|g| {
                g.trim().parse::<i64>().map_err(|_| {
                    ConditionerError::InvalidParameter(format!("bad group size {:?} in {:?}", g, s))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let width = groups.iter().fold(0usize, |acc, &n| {
            acc.saturating_add(usize::try_from(n).unwrap_or(0))
        });
        let codec = Codec::from_signed(&groups, width)?;

        match kind.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(Strategy::Literal(codec)),
            "delta" => Ok(Strategy::Delta(codec)),
            other => Err(ConditionerError::InvalidParameter(format!(
                "unknown strategy {:?}",
                other
            ))),
        }
    }
}
