//! The condition/uncondition pipeline.
//!
//! ## Split layout, classified special values
//!
//! For a sequence of `L` values of which `D` are defined (non-zero, non-NaN):
//!
//! 1. `ceil(L / 4)` descriptor bytes (see [`crate::descriptor`])
//! 2. the exponent stream of the `D` defined values
//! 3. the mantissa stream of the same `D` values
//!
//! Zeros decode to positive zero and NaNs to the canonical NaN: the sign of
//! zero and NaN payloads are not preserved. Infinities are ordinary defined
//! values and round-trip exactly.
//!
//! ## Split layout, inline special values
//!
//! `ceil(L / 8)` sign-bit bytes, then exponent and mantissa streams for all
//! `L` values. Every bit pattern round-trips.
//!
//! ## Whole layout
//!
//! The raw bit pattern of all `L` values as a single 32- or 64-bit field.
//! Every bit pattern round-trips.
//!
//! No lengths or parameters are embedded; the caller supplies the value count
//! and the same [`Layout`] on both sides.

use std::fmt;
use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::columnar::Codec;
use crate::descriptor::{self, Descriptor};
use crate::error::ConditionerError;
use crate::float::{combine, split, FloatBits, SplitFields};
use crate::stream::{ByteSink, ByteSource, CountingSink};
use crate::strategy::Strategy;

/// How zero and NaN values are handled by the split layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpecialValues {
    /// Classify every value with a descriptor; only defined values carry fields.
    #[default]
    Classified,
    /// Store a sign bit per value and split every value, zero and NaN included.
    Inline,
}

impl fmt::Display for SpecialValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialValues::Classified => write!(f, "classified"),
            SpecialValues::Inline => write!(f, "inline"),
        }
    }
}

/// The out-of-band parameters of a conditioned stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Layout {
    /// Each value's whole bit pattern as one field.
    Whole(Strategy),
    /// Sign, exponent and mantissa as separate streams.
    Split {
        /// Treatment of zero and NaN.
        special_values: SpecialValues,
        /// Strategy for the exponent stream.
        exponent: Strategy,
        /// Strategy for the mantissa stream.
        mantissa: Strategy,
    },
}

impl Layout {
    /// Check every strategy's codec against the fields of `F`.
    pub fn check<F: FloatBits>(&self) -> Result<(), ConditionerError> {
        match self {
            Layout::Whole(strategy) => strategy.check_field(F::whole_field()),
            Layout::Split {
                exponent, mantissa, ..
            } => {
                exponent.check_field(F::exponent_field())?;
                mantissa.check_field(F::mantissa_field())
            }
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Whole(strategy) => write!(f, "whole({})", strategy),
            Layout::Split {
                special_values,
                exponent,
                mantissa,
            } => write!(f, "split({}, {}, {})", special_values, exponent, mantissa),
        }
    }
}

/// Conditions and unconditions sequences of `F` with a fixed [`Layout`].
///
/// # Example
///
/// ```
/// use float_conditioner::{Codec, Conditioner, Strategy};
///
/// let conditioner = Conditioner::<f32>::split(
///     Strategy::Literal(Codec::contiguous(1).unwrap()),
///     Strategy::Delta(Codec::transposed(3).unwrap()),
/// )
/// .unwrap();
///
/// let prices = vec![101.25f32, 101.5, 101.25, 102.0];
/// let mut conditioned = Vec::new();
/// conditioner.condition(&prices, &mut conditioned).unwrap();
///
/// let decoded = conditioner
///     .uncondition(&mut conditioned.as_slice(), prices.len())
///     .unwrap();
/// assert_eq!(decoded, prices);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Conditioner<F> {
    layout: Layout,
    _float: PhantomData<fn() -> F>,
}

impl<F: FloatBits> Conditioner<F> {
    /// Create a conditioner, rejecting codecs that do not fit the fields of `F`.
    pub fn new(layout: Layout) -> Result<Self, ConditionerError> {
        layout.check::<F>()?;
        Ok(Conditioner {
            layout,
            _float: PhantomData,
        })
    }

    /// Split layout with classified special values.
    pub fn split(exponent: Strategy, mantissa: Strategy) -> Result<Self, ConditionerError> {
        Self::new(Layout::Split {
            special_values: SpecialValues::Classified,
            exponent,
            mantissa,
        })
    }

    /// Whole-value layout.
    pub fn whole(strategy: Strategy) -> Result<Self, ConditionerError> {
        Self::new(Layout::Whole(strategy))
    }

    /// The layout this conditioner writes and reads.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Condition `values` into `sink`, returning the number of bytes written.
    pub fn condition<S>(&self, values: &[F], sink: &mut S) -> Result<usize, ConditionerError>
    where
        S: ByteSink + ?Sized,
    {
        let mut sink = CountingSink::new(sink);
        match &self.layout {
            Layout::Whole(strategy) => {
                let raw: Vec<u64> = values.iter().map(|x| x.to_raw()).collect();
                strategy.write(F::whole_field(), &raw, &mut sink)?;
            }
            Layout::Split {
                special_values: SpecialValues::Classified,
                exponent,
                mantissa,
            } => {
                let defined = descriptor::write_descriptors(values, &mut sink)?;

                let mut exponents = Vec::with_capacity(defined);
                let mut mantissas = Vec::with_capacity(defined);
                for &x in values {
                    if Descriptor::of(x).is_defined() {
                        let fields = split(x);
                        exponents.push(fields.exponent);
                        mantissas.push(fields.mantissa);
                    }
                }
                log::debug!("{} of {} values are defined", defined, values.len());

                exponent.write(F::exponent_field(), &exponents, &mut sink)?;
                mantissa.write(F::mantissa_field(), &mantissas, &mut sink)?;
            }
            Layout::Split {
                special_values: SpecialValues::Inline,
                exponent,
                mantissa,
            } => {
                let fields: Vec<SplitFields> = values.iter().map(|&x| split(x)).collect();
                let signs: Vec<bool> = fields.iter().map(|f| f.negative).collect();
                let exponents: Vec<u64> = fields.iter().map(|f| f.exponent).collect();
                let mantissas: Vec<u64> = fields.iter().map(|f| f.mantissa).collect();

                descriptor::write_signs(&signs, &mut sink)?;
                exponent.write(F::exponent_field(), &exponents, &mut sink)?;
                mantissa.write(F::mantissa_field(), &mantissas, &mut sink)?;
            }
        }

        log::debug!(
            "conditioned {} values with {} into {} bytes",
            values.len(),
            self.layout,
            sink.written()
        );
        Ok(sink.written())
    }

    /// Read `count` values conditioned with the same layout.
    pub fn uncondition<S>(&self, source: &mut S, count: usize) -> Result<Vec<F>, ConditionerError>
    where
        S: ByteSource + ?Sized,
    {
        let values = match &self.layout {
            Layout::Whole(strategy) => strategy
                .read(F::whole_field(), count, source)?
                .into_iter()
                .map(F::from_raw)
                .collect(),
            Layout::Split {
                special_values: SpecialValues::Classified,
                exponent,
                mantissa,
            } => {
                let (descriptors, defined) = descriptor::read_descriptors(count, source)?;
                let exponents = exponent.read(F::exponent_field(), defined, source)?;
                let mantissas = mantissa.read(F::mantissa_field(), defined, source)?;
                log::debug!("{} of {} values are defined", defined, count);

                let mut fields = exponents.into_iter().zip(mantissas);
                let mut values = Vec::with_capacity(count);
                for (decoded, descriptor) in descriptors.into_iter().enumerate() {
                    let value = match descriptor.placeholder::<F>() {
                        Some(value) => value,
                        None => {
                            let (exponent, mantissa) = fields.next().ok_or(
                                ConditionerError::LengthMismatch {
                                    expected: defined,
                                    actual: decoded,
                                },
                            )?;
                            combine(SplitFields {
                                negative: descriptor.is_negative(),
                                exponent,
                                mantissa,
                            })
                        }
                    };
                    values.push(value);
                }
                values
            }
            Layout::Split {
                special_values: SpecialValues::Inline,
                exponent,
                mantissa,
            } => {
                let signs = descriptor::read_signs(count, source)?;
                let exponents = exponent.read(F::exponent_field(), count, source)?;
                let mantissas = mantissa.read(F::mantissa_field(), count, source)?;

                signs
                    .into_iter()
                    .zip(exponents)
                    .zip(mantissas)
                    .map(|((negative, exponent), mantissa)| {
                        combine(SplitFields {
                            negative,
                            exponent,
                            mantissa,
                        })
                    })
                    .collect()
            }
        };

        log::debug!("unconditioned {} values with {}", count, self.layout);
        Ok(values)
    }

    /// Read `count` values into `out`, which must hold exactly `count` slots.
    pub fn uncondition_into<S>(
        &self,
        source: &mut S,
        count: usize,
        out: &mut [F],
    ) -> Result<(), ConditionerError>
    where
        S: ByteSource + ?Sized,
    {
        if out.len() != count {
            return Err(ConditionerError::LengthMismatch {
                expected: count,
                actual: out.len(),
            });
        }
        let values = self.uncondition(source, count)?;
        out.copy_from_slice(&values);
        Ok(())
    }
}

impl<F: FloatBits> Default for Conditioner<F> {
    /// Split layout, classified special values, literal contiguous exponents
    /// and delta-encoded mantissas with every byte plane separated.
    fn default() -> Self {
        Conditioner {
            layout: Layout::Split {
                special_values: SpecialValues::Classified,
                exponent: Strategy::Literal(Codec::whole_group(F::exponent_field().bytes())),
                mantissa: Strategy::Delta(Codec::byte_planes(F::mantissa_field().bytes())),
            },
            _float: PhantomData,
        }
    }
}

/// Condition `values` with the default layout.
pub fn condition<F, S>(values: &[F], sink: &mut S) -> Result<usize, ConditionerError>
where
    F: FloatBits,
    S: ByteSink + ?Sized,
{
    Conditioner::<F>::default().condition(values, sink)
}

/// Read `count` values conditioned with the default layout.
pub fn uncondition<F, S>(source: &mut S, count: usize) -> Result<Vec<F>, ConditionerError>
where
    F: FloatBits,
    S: ByteSource + ?Sized,
{
    Conditioner::<F>::default().uncondition(source, count)
}
