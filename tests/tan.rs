//! Precision of `tan` against the scalar reference.

use lanewise::simd::math::tan;
use lanewise::simd::{F32s, SimdBatch};

mod common;

#[test]
fn tan_edge_cases() {
    let cases = [
        0.0f32,
        -0.0,
        std::f32::consts::FRAC_PI_6,
        std::f32::consts::FRAC_PI_4,
        -std::f32::consts::FRAC_PI_4,
        1.0,
        -1.0,
        std::f32::consts::PI,
        10.0,
    ];
    common::check_unary("tan", tan, f32::tan, &cases, 5);
}

#[test]
fn tan_random_sweep_away_from_poles() {
    // Uniform samples essentially never land within ULPs of a pole, but
    // the relative check below tolerates the steep-slope cases anyway.
    let inputs = common::random_samples(4096, -100.0..=100.0, 56);
    for &x in &inputs {
        let got = tan(F32s::splat(x)).extract(0);
        let want = x.tan();
        let rel = (got - want).abs() / want.abs().max(1e-10);
        assert!(rel < 1e-3, "tan({x}): {got} vs {want} (rel {rel:e})");
    }
}

#[test]
fn tan_tight_sweep_small_domain() {
    let inputs = common::random_samples(2048, -1.5..=1.5, 57);
    let max = common::check_unary("tan", tan, f32::tan, &inputs, 5);
    println!("tan max error: {max} ulp over 2048 samples");
}

#[test]
fn tan_is_odd() {
    let inputs = common::random_samples(256, 0.0..=1.5, 58);
    for &x in &inputs {
        let pos = tan(F32s::splat(x)).extract(0);
        let neg = tan(F32s::splat(-x)).extract(0);
        assert_eq!(pos, -neg, "tan(-x) must mirror tan(x) at x = {x}");
    }
}

#[test]
fn tan_non_finite() {
    assert!(tan(F32s::splat(f32::INFINITY)).extract(0).is_nan());
    assert!(tan(F32s::splat(f32::NAN)).extract(0).is_nan());
}
