//! Shared helpers for the precision test suites: ULP distance and
//! chunked batch-vs-scalar sweeps over arbitrary input sets.
#![allow(dead_code)]

use lanewise::simd::{F32s, SimdBatch};

/// Distance between two floats in units in the last place, treating the
/// float line as a monotonic integer line. NaN pairs count as equal;
/// a NaN mismatch saturates.
pub fn ulps(a: f32, b: f32) -> u64 {
    if a.is_nan() || b.is_nan() {
        return if a.is_nan() == b.is_nan() { 0 } else { u64::MAX };
    }
    if a == b {
        return 0;
    }
    let ordinal = |x: f32| -> i64 {
        let bits = x.to_bits() as i32;
        if bits < 0 {
            i64::from(i32::MIN) - i64::from(bits)
        } else {
            i64::from(bits)
        }
    };
    (ordinal(a) - ordinal(b)).unsigned_abs()
}

/// Runs a unary batch function over `inputs` in lane-width chunks and
/// asserts every lane is within `bound` ULP of the scalar reference.
/// Returns the maximum observed ULP distance.
pub fn check_unary(
    name: &str,
    batch_fn: impl Fn(F32s) -> F32s,
    scalar_fn: impl Fn(f32) -> f32,
    inputs: &[f32],
    bound: u64,
) -> u64 {
    let lanes = F32s::LANES;
    let mut max_seen = 0u64;
    for chunk in inputs.chunks(lanes) {
        // short tail: repeat the first element to fill the batch
        let mut padded = vec![chunk[0]; lanes];
        padded[..chunk.len()].copy_from_slice(chunk);

        let got = batch_fn(F32s::from_slice(&padded));
        for (i, &x) in padded.iter().enumerate() {
            let want = scalar_fn(x);
            let seen = ulps(got.extract(i), want);
            assert!(
                seen <= bound,
                "{name}({x:e}): got {:e}, want {want:e} ({seen} ulp > {bound})",
                got.extract(i),
            );
            max_seen = max_seen.max(seen);
        }
    }
    max_seen
}

/// Binary counterpart of [`check_unary`]; `inputs` holds (x, y) pairs.
pub fn check_binary(
    name: &str,
    batch_fn: impl Fn(F32s, F32s) -> F32s,
    scalar_fn: impl Fn(f32, f32) -> f32,
    inputs: &[(f32, f32)],
    bound: u64,
) -> u64 {
    let lanes = F32s::LANES;
    let mut max_seen = 0u64;
    for chunk in inputs.chunks(lanes) {
        let mut xs = vec![chunk[0].0; lanes];
        let mut ys = vec![chunk[0].1; lanes];
        for (i, &(x, y)) in chunk.iter().enumerate() {
            xs[i] = x;
            ys[i] = y;
        }

        let got = batch_fn(F32s::from_slice(&xs), F32s::from_slice(&ys));
        for i in 0..chunk.len() {
            let want = scalar_fn(xs[i], ys[i]);
            let seen = ulps(got.extract(i), want);
            assert!(
                seen <= bound,
                "{name}({:e}, {:e}): got {:e}, want {want:e} ({seen} ulp > {bound})",
                xs[i],
                ys[i],
                got.extract(i),
            );
            max_seen = max_seen.max(seen);
        }
    }
    max_seen
}

/// Uniform random samples in `range`, reproducible across runs.
pub fn random_samples(count: usize, range: std::ops::RangeInclusive<f32>, seed: u64) -> Vec<f32> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.random_range(range.clone())).collect()
}
