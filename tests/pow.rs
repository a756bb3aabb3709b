//! Precision of `pow`, `cbrt`, and `hypot` against the scalar reference.

use lanewise::simd::math::{cbrt, hypot, pow};
use lanewise::simd::{F32s, SimdBatch};

mod common;

#[test]
fn pow_moderate_domain_relative_error() {
    let bases = common::random_samples(1024, 0.01..=100.0, 80);
    let exps = common::random_samples(1024, -4.0..=4.0, 81);
    for (&x, &y) in bases.iter().zip(&exps) {
        let got = pow(F32s::splat(x), F32s::splat(y)).extract(0);
        let want = x.powf(y);
        let rel = (got - want).abs() / want.abs().max(f32::MIN_POSITIVE);
        assert!(rel < 1e-5, "pow({x}, {y}): {got} vs {want} (rel {rel:e})");
    }
}

#[test]
fn pow_special_cases() {
    assert_eq!(pow(F32s::splat(2.0), F32s::splat(0.0)).extract(0), 1.0);
    assert_eq!(pow(F32s::splat(0.0), F32s::splat(0.0)).extract(0), 1.0);
    assert_eq!(pow(F32s::splat(1.0), F32s::splat(1e30)).extract(0), 1.0);
    assert_eq!(pow(F32s::splat(1.0), F32s::splat(f32::NAN)).extract(0), 1.0);
    assert_eq!(pow(F32s::splat(0.0), F32s::splat(3.0)).extract(0), 0.0);
    assert_eq!(
        pow(F32s::splat(0.0), F32s::splat(-2.0)).extract(0),
        f32::INFINITY
    );
    assert!(pow(F32s::splat(-2.0), F32s::splat(2.0)).extract(0).is_nan());
    assert!(pow(F32s::splat(2.0), F32s::splat(f32::NAN)).extract(0).is_nan());
}

#[test]
fn pow_exact_small_integer_cases() {
    for (x, y, want) in [
        (2.0f32, 2.0f32, 4.0f32),
        (2.0, 10.0, 1024.0),
        (3.0, 3.0, 27.0),
        (10.0, 3.0, 1000.0),
        (4.0, 0.5, 2.0),
        (9.0, 0.5, 3.0),
    ] {
        let got = pow(F32s::splat(x), F32s::splat(y)).extract(0);
        let rel = (got - want).abs() / want;
        assert!(rel < 1e-5, "pow({x}, {y}) = {got}, want {want}");
    }
}

#[test]
fn cbrt_edge_cases_and_sweep() {
    let cases = [
        0.0f32, -0.0, 1.0, -1.0, 8.0, -8.0, 27.0, -27.0, 1e-20, -1e-20, 1e20, -1e20, 0.001, 2.0,
    ];
    common::check_unary("cbrt", cbrt, f32::cbrt, &cases, 3);

    let inputs = common::random_samples(4096, -1e10..=1e10, 82);
    let max = common::check_unary("cbrt", cbrt, f32::cbrt, &inputs, 3);
    println!("cbrt max error: {max} ulp over 4096 samples");
}

#[test]
fn cbrt_preserves_sign_and_non_finites() {
    assert_eq!(cbrt(F32s::splat(-8.0)).extract(0), -2.0);
    assert_eq!(cbrt(F32s::splat(0.0)).extract(0), 0.0);
    assert!(cbrt(F32s::splat(-0.0)).extract(0).is_sign_negative());
    assert_eq!(cbrt(F32s::splat(f32::INFINITY)).extract(0), f32::INFINITY);
    assert_eq!(
        cbrt(F32s::splat(f32::NEG_INFINITY)).extract(0),
        f32::NEG_INFINITY
    );
    assert!(cbrt(F32s::splat(f32::NAN)).extract(0).is_nan());
}

#[test]
fn hypot_edge_cases_and_sweep() {
    let cases: Vec<(f32, f32)> = vec![
        (3.0, 4.0),
        (5.0, 12.0),
        (0.0, 0.0),
        (0.0, 2.5),
        (2.5, 0.0),
        (-3.0, 4.0),
        (3.0, -4.0),
        (1e-20, 1e-20),
        (1e19, 1e19),
        (1e-30, 1.0),
    ];
    common::check_binary("hypot", hypot, f32::hypot, &cases, 3);

    let xs = common::random_samples(2048, -1e15..=1e15, 83);
    let ys = common::random_samples(2048, -1e15..=1e15, 84);
    let pairs: Vec<(f32, f32)> = xs.into_iter().zip(ys).collect();
    let max = common::check_binary("hypot", hypot, f32::hypot, &pairs, 3);
    println!("hypot max error: {max} ulp over 2048 samples");
}

#[test]
#[allow(overflowing_literals)]
fn hypot_avoids_intermediate_overflow() {
    // x² would overflow f32; the scaled form must not.
    let got = hypot(F32s::splat(3e38), F32s::splat(4e38)).extract(0);
    assert!(got.is_infinite() || (got - 5e38).abs() < 1e33, "hypot(3e38, 4e38) = {got}");
    let exact = hypot(F32s::splat(3e19), F32s::splat(4e19)).extract(0);
    let want = 5e19f32;
    assert!((exact - want).abs() / want < 1e-6);
}

#[test]
fn hypot_infinity_beats_nan() {
    let got = hypot(F32s::splat(f32::INFINITY), F32s::splat(f32::NAN)).extract(0);
    assert_eq!(got, f32::INFINITY);
    let got = hypot(F32s::splat(f32::NAN), F32s::splat(1.0)).extract(0);
    assert!(got.is_nan());
}
