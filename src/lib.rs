//! # float-conditioner
//!
//! Rearranges sequences of IEEE-754 floats into a byte layout that a
//! downstream general-purpose compressor (gzip, zstd, xz, ...) can squeeze
//! much harder than the raw values.
//!
//! ## Overview
//!
//! Raw floats interleave sign, exponent and mantissa bits, which hides the
//! redundancy of slowly-varying series such as prices or sensor readings.
//! Conditioning undoes that:
//!
//! 1. **Classification**: every value gets a 2-bit descriptor (zero, NaN,
//!    positive, negative), packed four per byte
//! 2. **Field splitting**: defined values are split into exponent and
//!    mantissa streams
//! 3. **Delta encoding**: each stream is optionally replaced by zig-zag
//!    encoded differences between neighbours
//! 4. **Byte planes**: each stream is laid out column-wise, grouping bytes
//!    at the same position across values
//!
//! No compression happens here; the output is the same size or slightly
//! larger than the input, but compresses far better.
//!
//! ## Quick Start
//!
//! ```rust
//! use float_conditioner::{condition, uncondition};
//!
//! let series = vec![101.25f64, 101.5, 101.25, 0.0, f64::NAN, 102.0];
//!
//! let mut conditioned = Vec::new();
//! condition(&series, &mut conditioned).unwrap();
//! // feed `conditioned` into your compressor of choice
//!
//! let decoded: Vec<f64> = uncondition(&mut conditioned.as_slice(), series.len()).unwrap();
//! assert_eq!(decoded[..4], series[..4]);
//! assert!(decoded[4].is_nan());
//! ```
//!
//! ## Choosing Parameters
//!
//! Each field stream is encoded with a [`Strategy`]: `Literal` or `Delta`,
//! each combined with a [`Codec`] that partitions the field's byte width
//! into byte-plane groups. The best combination depends on the data and on
//! the compressor, so [`enumerate::strategies`] produces the whole search
//! space for an offline search. Neither the strategy nor the codec is
//! stored in the stream.
//!
//! | Field | f32 width | f64 width |
//! |-------|-----------|-----------|
//! | exponent | 8 bits / 1 byte | 11 bits / 2 bytes |
//! | mantissa | 23 bits / 3 bytes | 52 bits / 7 bytes |
//! | whole value | 32 bits / 4 bytes | 64 bits / 8 bytes |
//!
//! ## Lossy Points
//!
//! With the default (classified) layout, the sign of zero and NaN payloads
//! are not preserved: `-0.0` decodes as `0.0` and every NaN decodes as the
//! canonical NaN. Use [`SpecialValues::Inline`] or [`Layout::Whole`] when
//! every bit matters.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod columnar;
mod conditioner;
pub mod descriptor;
pub mod enumerate;
mod error;
pub mod float;
mod stream;
mod strategy;
pub mod zigzag;

pub use columnar::Codec;
pub use conditioner::{condition, uncondition, Conditioner, Layout, SpecialValues};
pub use error::ConditionerError;
pub use float::{combine, split, DeltaMode, Field, FloatBits, SplitFields};
pub use stream::{ByteSink, ByteSource};
pub use strategy::Strategy;

/// Convenience type alias for Results with ConditionerError.
pub type Result<T> = std::result::Result<T, ConditionerError>;
