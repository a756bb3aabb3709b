//! Precision of `atan` and `atan2` against the scalar reference.

use lanewise::simd::math::{atan, atan2};
use lanewise::simd::{F32s, SimdBatch};

mod common;

#[test]
fn atan_edge_cases() {
    let cases = [
        0.0f32, -0.0, 0.1, -0.1, 0.4142, 0.5, 1.0, -1.0, 2.414, 10.0, -10.0, 1e6, -1e6, 1e30,
    ];
    common::check_unary("atan", atan, f32::atan, &cases, 3);
}

#[test]
fn atan_random_sweep() {
    let inputs = common::random_samples(4096, -1000.0..=1000.0, 64);
    let max = common::check_unary("atan", atan, f32::atan, &inputs, 3);
    println!("atan max error: {max} ulp over 4096 samples");
}

#[test]
fn atan_limits() {
    let got = atan(F32s::splat(f32::INFINITY)).extract(0);
    assert!((got - std::f32::consts::FRAC_PI_2).abs() <= f32::EPSILON * 2.0);
    let got = atan(F32s::splat(f32::NEG_INFINITY)).extract(0);
    assert!((got + std::f32::consts::FRAC_PI_2).abs() <= f32::EPSILON * 2.0);
    assert!(atan(F32s::splat(f32::NAN)).extract(0).is_nan());
}

#[test]
fn atan2_all_quadrants() {
    let cases: Vec<(f32, f32)> = vec![
        (1.0, 1.0),
        (1.0, -1.0),
        (-1.0, 1.0),
        (-1.0, -1.0),
        (0.5, 2.0),
        (2.0, 0.5),
        (-0.5, 2.0),
        (-2.0, 0.5),
        (1.0, 0.0),
        (-1.0, 0.0),
        (0.0, 1.0),
        (3.0, 4.0),
        (-3.0, -4.0),
        (1e-10, 1.0),
        (1.0, 1e-10),
    ];
    common::check_binary("atan2", atan2, f32::atan2, &cases, 4);
}

#[test]
fn atan2_random_sweep() {
    let xs = common::random_samples(2048, -100.0..=100.0, 65);
    let ys = common::random_samples(2048, -100.0..=100.0, 66);
    let pairs: Vec<(f32, f32)> = ys.into_iter().zip(xs).collect();
    let max = common::check_binary("atan2", atan2, f32::atan2, &pairs, 4);
    println!("atan2 max error: {max} ulp over 2048 samples");
}

#[test]
fn atan2_zero_axis() {
    // x = +0 with nonzero y gives ±π/2
    let got = atan2(F32s::splat(1.0), F32s::splat(0.0)).extract(0);
    assert!((got - std::f32::consts::FRAC_PI_2).abs() <= f32::EPSILON * 2.0);
    let got = atan2(F32s::splat(-1.0), F32s::splat(0.0)).extract(0);
    assert!((got + std::f32::consts::FRAC_PI_2).abs() <= f32::EPSILON * 2.0);
    // the origin with positive x sign is ±0
    assert_eq!(atan2(F32s::splat(0.0), F32s::splat(0.0)).extract(0), 0.0);
    // NaN in either argument propagates
    assert!(atan2(F32s::splat(f32::NAN), F32s::splat(1.0)).extract(0).is_nan());
    assert!(atan2(F32s::splat(1.0), F32s::splat(f32::NAN)).extract(0).is_nan());
}
