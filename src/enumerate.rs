//! Enumeration of the codec and strategy search space.
//!
//! Nothing here runs while conditioning. These functions generate every
//! parameterization an offline search can try against a dataset.

use std::collections::BTreeSet;

use crate::columnar::Codec;
use crate::error::ConditionerError;
use crate::strategy::Strategy;

/// All ordered compositions of `width` into positive parts.
///
/// Built up one unit at a time from the empty composition of zero: every
/// composition of `n + 1` is a composition of `n` with either a new `1`
/// inserted somewhere or one existing part incremented. There are
/// `2^(width - 1)` of them for `width >= 1`, returned in lexicographic order.
pub fn compositions(width: usize) -> Vec<Vec<usize>> {
    let mut current: BTreeSet<Vec<usize>> = BTreeSet::new();
    current.insert(Vec::new());

    for _ in 0..width {
        let mut next = BTreeSet::new();
        for parts in &current {
            for at in 0..=parts.len() {
                let mut grown = parts.clone();
                grown.insert(at, 1);
                next.insert(grown);
            }
            for at in 0..parts.len() {
                let mut grown = parts.clone();
                grown[at] += 1;
                next.insert(grown);
            }
        }
        current = next;
    }

    if width == 0 {
        return Vec::new();
    }
    current.into_iter().collect()
}

/// Every codec covering a `width`-byte field.
pub fn valid_codecs(width: usize) -> Result<Vec<Codec>, ConditionerError> {
    compositions(width)
        .into_iter()
        .map(|groups| Codec::new(groups, width))
        .collect()
}

/// Every literal and delta strategy for a `width`-byte field.
///
/// Each codec contributes `Literal` followed by `Delta`.
pub fn strategies(width: usize) -> Result<Vec<Strategy>, ConditionerError> {
    Ok(valid_codecs(width)?
        .into_iter()
        .flat_map(|codec| [Strategy::Literal(codec.clone()), Strategy::Delta(codec)])
        .collect())
}
