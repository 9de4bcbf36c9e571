//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A deterministic price-like random walk in quarter ticks between 130 and 250.
pub fn price_series(len: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ticks: i64 = 600;
    (0..len)
        .map(|_| {
            ticks = (ticks + rng.random_range(-2..=2)).clamp(520, 999);
            ticks as f32 * 0.25
        })
        .collect()
}

/// Replace a `fraction` of the positions of `values` with NaN.
pub fn knock_out(values: &[f32], fraction: f64, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    values
        .iter()
        .map(|&x| {
            if rng.random::<f64>() < fraction {
                f32::NAN
            } else {
                x
            }
        })
        .collect()
}

/// Daily-return-like values in (-0.02, 0.02), with `zero_fraction` of them exactly zero.
pub fn returns_series(len: usize, zero_fraction: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            if rng.random::<f64>() < zero_fraction {
                0.0
            } else {
                rng.random_range(-0.02..0.02)
            }
        })
        .collect()
}

pub fn to_f64(values: &[f32]) -> Vec<f64> {
    values.iter().map(|&x| x as f64).collect()
}

/// Raw big-endian bytes of `values`, the unconditioned baseline.
pub fn raw_f32(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|x| x.to_be_bytes()).collect()
}

pub fn raw_f64(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|x| x.to_be_bytes()).collect()
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

pub fn gunzip(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out).unwrap();
    out
}

/// Compare two sequences bit for bit, except that any NaN matches any NaN.
pub fn assert_same_f32(expected: &[f32], actual: &[f32], context: &str) {
    assert_eq!(expected.len(), actual.len(), "{}", context);
    for (i, (x, y)) in expected.iter().zip(actual).enumerate() {
        if x.is_nan() {
            assert!(y.is_nan(), "{}: index {} expected NaN, got {:?}", context, i, y);
        } else {
            assert_eq!(x.to_bits(), y.to_bits(), "{}: index {}", context, i);
        }
    }
}

pub fn assert_same_f64(expected: &[f64], actual: &[f64], context: &str) {
    assert_eq!(expected.len(), actual.len(), "{}", context);
    for (i, (x, y)) in expected.iter().zip(actual).enumerate() {
        if x.is_nan() {
            assert!(y.is_nan(), "{}: index {} expected NaN, got {:?}", context, i, y);
        } else {
            assert_eq!(x.to_bits(), y.to_bits(), "{}: index {}", context, i);
        }
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
