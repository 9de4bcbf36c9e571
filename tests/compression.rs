//! Conditioning ahead of a general-purpose compressor.

mod common;

use common::*;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use float_conditioner::{Codec, Conditioner, Strategy};

const LEN: usize = 5000;

/// Condition straight into a gzip stream and read back through a decoder.
fn gzip_conditioned(conditioner: &Conditioner<f32>, values: &[f32]) -> (usize, Vec<f32>) {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    conditioner.condition(values, &mut encoder).unwrap();
    let compressed = encoder.finish().unwrap();

    let mut decoder = GzDecoder::new(compressed.as_slice());
    let back = conditioner.uncondition(&mut decoder, values.len()).unwrap();
    (compressed.len(), back)
}

#[test]
fn test_gzip_benefit_on_prices() {
    let prices = price_series(LEN, 7);
    let conditioner = Conditioner::<f32>::default();

    let (conditioned, back) = gzip_conditioned(&conditioner, &prices);
    assert_same_f32(&prices, &back, "default layout");

    let raw = gzip(&raw_f32(&prices)).len();
    assert!(
        conditioned + 1000 < raw,
        "conditioned {} bytes vs raw {} bytes",
        conditioned,
        raw
    );
}

#[test]
fn test_gzip_benefit_with_knocked_out_values() {
    let prices = knock_out(&price_series(LEN, 11), 0.05, 13);
    assert!(prices.iter().any(|x| x.is_nan()));
    let conditioner = Conditioner::<f32>::default();

    let (conditioned, back) = gzip_conditioned(&conditioner, &prices);
    assert_same_f32(&prices, &back, "knocked out");

    let raw = gzip(&raw_f32(&prices)).len();
    assert!(
        conditioned + 1000 < raw,
        "conditioned {} bytes vs raw {} bytes",
        conditioned,
        raw
    );
}

/// Gzip size of `values` conditioned with the default layout, checking the round trip.
fn gzip_conditioned_f64(values: &[f64]) -> usize {
    let conditioner = Conditioner::<f64>::default();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    conditioner.condition(values, &mut encoder).unwrap();
    let compressed = encoder.finish().unwrap();

    let mut decoder = GzDecoder::new(compressed.as_slice());
    let back = conditioner.uncondition(&mut decoder, values.len()).unwrap();
    assert_same_f64(values, &back, "default f64 layout");
    compressed.len()
}

#[test]
fn test_gzip_benefit_on_prices_as_doubles() {
    let prices = to_f64(&price_series(2 * LEN, 41));

    let conditioned = gzip_conditioned_f64(&prices);
    let raw = gzip(&raw_f64(&prices)).len();
    assert!(
        conditioned + 1000 < raw,
        "conditioned {} bytes vs raw {} bytes",
        conditioned,
        raw
    );
}

#[test]
fn test_gzip_benefit_on_returns_with_zeros() {
    let returns = returns_series(2 * LEN, 0.7, 43);
    assert!(returns.iter().filter(|&&r| r == 0.0).count() > LEN);

    let conditioned = gzip_conditioned_f64(&returns);
    let raw = gzip(&raw_f64(&returns)).len();
    assert!(
        conditioned + 2000 < raw,
        "conditioned {} bytes vs raw {} bytes",
        conditioned,
        raw
    );
}

#[test]
fn test_truncated_gzip_stream_fails() {
    let prices = price_series(LEN, 47);
    let conditioner = Conditioner::<f32>::default();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    conditioner.condition(&prices, &mut encoder).unwrap();
    let compressed = encoder.finish().unwrap();

    let truncated = &compressed[..compressed.len() / 2];
    let result = conditioner.uncondition(&mut GzDecoder::new(truncated), prices.len());
    assert!(result.is_err());
}

#[test]
fn test_zstd_benefit_on_prices() {
    let prices = price_series(LEN, 17);
    let conditioner = Conditioner::<f32>::default();

    let mut conditioned = Vec::new();
    conditioner.condition(&prices, &mut conditioned).unwrap();
    let compressed = zstd::encode_all(conditioned.as_slice(), 3).unwrap();
    let raw = zstd::encode_all(raw_f32(&prices).as_slice(), 3).unwrap();
    assert!(
        compressed.len() < raw.len(),
        "conditioned {} bytes vs raw {} bytes",
        compressed.len(),
        raw.len()
    );

    let decompressed = zstd::decode_all(compressed.as_slice()).unwrap();
    assert_eq!(decompressed, conditioned);
    let back = conditioner
        .uncondition(&mut decompressed.as_slice(), prices.len())
        .unwrap();
    assert_same_f32(&prices, &back, "zstd");
}

#[test]
fn test_mantissa_wraparound_through_gzip() {
    let values = [2.0f32, 3.999_999_9, 2.0, f32::from_bits(0x407F_FFFF), 2.0];
    for mantissa in [Codec::contiguous(3).unwrap(), Codec::transposed(3).unwrap()] {
        let conditioner = Conditioner::<f32>::split(
            Strategy::Delta(Codec::contiguous(1).unwrap()),
            Strategy::Delta(mantissa),
        )
        .unwrap();
        let (_, back) = gzip_conditioned(&conditioner, &values);
        assert_same_f32(&values, &back, "wraparound");
    }
}

#[test]
fn test_conditioned_size_before_compression() {
    let prices = price_series(LEN, 19);

    let mut conditioned = Vec::new();
    let written = Conditioner::<f32>::default()
        .condition(&prices, &mut conditioned)
        .unwrap();
    assert_eq!(written, conditioned.len());
    // descriptors, then one exponent byte and three mantissa bytes per value
    assert_eq!(written, LEN / 4 + LEN + 3 * LEN);
    assert_eq!(gunzip(&gzip(&conditioned)), conditioned);
}
