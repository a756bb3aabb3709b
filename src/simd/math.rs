//! Elementary functions over single-precision batches.
//!
//! Every function here is written once against the generic batch operation
//! set ([`SimdBatch`] + [`SimdFloat`]), so it compiles directly to the
//! instruction mapping of whichever backend tier the build selected; no
//! backend carries its own copy. Lane edge cases (NaN, infinities, domain
//! errors) are handled branch-free through masks and `select`, never by
//! per-lane branching.
//!
//! # Approximation approach
//!
//! Range reduction to a small primary interval, a Remez-optimized
//! minimax polynomial evaluated with fused multiply-adds, and an exact
//! reconstruction step (power-of-two scaling through [`SimdFloat::ldexp`],
//! quadrant selection through masks). The coefficient sets are the classic
//! Cephes single-precision kernels.
//!
//! # Precision contracts
//!
//! Maximum error versus the scalar `std` reference, in ULP of the result,
//! over the stated domain:
//!
//! | Function | Domain | Bound |
//! |----------|--------|-------|
//! | `exp`, `exp2` | non-over/underflowing inputs | 2 |
//! | `exp10` | non-over/underflowing inputs | 3 |
//! | `ln` | normal positives | 2 |
//! | `log2`, `log10` | normal positives | 3 |
//! | `sin`, `cos` | \|x\| ≤ 10² | 3, degrading progressively beyond |
//! | `tan` | \|x\| ≤ 10², away from poles | 5 |
//! | `asin`, `acos` | [-1, 1] | 3 |
//! | `atan` | all reals | 3 |
//! | `atan2` | all quadrants | 4 |
//! | `sinh`, `cosh`, `tanh` | non-overflowing inputs | 4 |
//! | `asinh`, `acosh`, `atanh` | their domains | 5 |
//! | `pow` | positive base, \|y·log₂x\| ≤ 16 | ~1e-5 relative, growing toward the range edges |
//! | `cbrt` | all reals | 3 |
//! | `hypot` | away from overflow | 3 |
//!
//! Domain errors (negative logarithm argument, \|x\| > 1 for `asin`)
//! produce NaN per lane; NaN inputs propagate; infinities follow the
//! scalar reference. Inputs beyond the trigonometric reduction domain
//! lose accuracy progressively rather than failing. The trigonometric
//! bounds assume a tier with fused multiply-add; the SSE tier's unfused
//! reduction loses precision near the zero crossings of large arguments.

use crate::simd::traits::{SimdBatch, SimdFloat};

const LOG2EF: f32 = 1.442_695_04_f32;
const SQRTHF: f32 = std::f32::consts::FRAC_1_SQRT_2;

// ln 2 split for Cody-Waite reduction: C1 + C2 == ln 2
const LN2_C1: f32 = 0.693_359_375_f32;
const LN2_C2: f32 = -2.121_944_4e-4_f32;

// π/2 split for trigonometric reduction: A + B + C == π/2
const PIO2F_A: f32 = 1.570_739_746_093_75_f32;
const PIO2F_B: f32 = 5.657_970_905_303_955_1e-5_f32;
const PIO2F_C: f32 = 9.920_936_294_705_029_5e-10_f32;

/// Horner evaluation with fused multiply-adds, highest coefficient first.
#[inline(always)]
fn poly<B: SimdFloat>(x: B, coeffs: &[f32]) -> B {
    let mut acc = B::splat(coeffs[0]);
    for &c in &coeffs[1..] {
        acc = acc.fma(x, B::splat(c));
    }
    acc
}

/// 2^k scaling in two steps so that the full finite exponent range is
/// reachable (a single `ldexp` saturates at 2¹²⁷).
#[inline(always)]
fn scale2<B: SimdFloat>(x: B, k: B) -> B {
    let k1 = (k * B::splat(0.5)).floor();
    let k2 = k - k1;
    x.ldexp(k1).ldexp(k2)
}

/// Copies the sign bit of `from` onto the magnitude of `x`.
#[inline(always)]
fn copysign<B: SimdFloat>(x: B, from: B) -> B {
    let sign_mask = B::splat(-0.0);
    (sign_mask & from) | x.abs()
}

// ================================================================
// Exponential family
// ================================================================

/// Per-lane eˣ.
pub fn exp<B: SimdFloat>(x: B) -> B {
    const HI: f32 = 88.722_83_f32;
    const LO: f32 = -87.336_55_f32;
    const P: [f32; 6] = [
        1.987_569_15e-4,
        1.398_199_95e-3,
        8.333_452e-3,
        4.166_579_6e-2,
        1.666_666_5e-1,
        5.000_000_1e-1,
    ];

    let t = x.min(B::splat(HI)).max(B::splat(LO));
    let k = (t * B::splat(LOG2EF)).round();
    let r = k.fnma(B::splat(LN2_C1), t);
    let r = k.fnma(B::splat(LN2_C2), r);
    let r2 = r * r;
    let y = r2.fma(poly(r, &P), r) + B::splat(1.0);
    let y = scale2(y, k);

    let y = B::select(x.simd_gt(B::splat(HI)), B::splat(f32::INFINITY), y);
    let y = B::select(x.simd_lt(B::splat(LO)), B::splat(0.0), y);
    B::select(x.isnan(), x, y)
}

/// Per-lane 2ˣ.
pub fn exp2<B: SimdFloat>(x: B) -> B {
    const HI: f32 = 127.999_99_f32;
    const LO: f32 = -126.0_f32;
    const P: [f32; 6] = [
        1.535_336_2e-4,
        1.339_887_4e-3,
        9.618_437_4e-3,
        5.550_332_5e-2,
        2.402_264_8e-1,
        6.931_472e-1,
    ];

    let t = x.min(B::splat(HI)).max(B::splat(LO));
    let k = t.round();
    let r = t - k;
    let y = r.fma(poly(r, &P), B::splat(1.0));
    let y = scale2(y, k);

    let y = B::select(x.simd_gt(B::splat(HI)), B::splat(f32::INFINITY), y);
    let y = B::select(x.simd_lt(B::splat(-150.0)), B::splat(0.0), y);
    B::select(x.isnan(), x, y)
}

/// Per-lane 10ˣ.
pub fn exp10<B: SimdFloat>(x: B) -> B {
    const HI: f32 = 38.230_81_f32;
    const LO: f32 = -37.929_78_f32;
    const LOG210: f32 = 3.321_928_1_f32;
    // log10(2) split: A + B == log10(2)
    const LG102A: f32 = 3.007_812_5e-1;
    const LG102B: f32 = 2.487_456_6e-4;
    const P: [f32; 6] = [
        2.063_216_7e-1,
        5.420_251_7e-1,
        1.171_292_7,
        2.034_649_9,
        2.650_948_7,
        2.302_585_2,
    ];

    let t = x.min(B::splat(HI)).max(B::splat(LO));
    let k = (t * B::splat(LOG210)).round();
    let r = k.fnma(B::splat(LG102A), t);
    let r = k.fnma(B::splat(LG102B), r);
    let y = r.fma(poly(r, &P), B::splat(1.0));
    let y = scale2(y, k);

    let y = B::select(x.simd_gt(B::splat(HI)), B::splat(f32::INFINITY), y);
    let y = B::select(x.simd_lt(B::splat(LO)), B::splat(0.0), y);
    B::select(x.isnan(), x, y)
}

// ================================================================
// Logarithmic family
// ================================================================

const LOG_P: [f32; 9] = [
    7.037_683_6e-2,
    -1.151_461e-1,
    1.167_699_9e-1,
    -1.242_014_1e-1,
    1.424_932_3e-1,
    -1.666_805_8e-1,
    2.000_071_5e-1,
    -2.499_999_4e-1,
    3.333_333_1e-1,
];

/// Shared mantissa/exponent decomposition: returns (ln of the adjusted
/// mantissa, adjusted exponent), with the mantissa normalized into
/// [√½, √2) so the polynomial argument stays small.
#[inline(always)]
fn ln_parts<B: SimdFloat>(x: B) -> (B, B) {
    let (m, e) = x.frexp();
    let small = m.simd_lt(B::splat(SQRTHF));
    let e = B::select(small, e - B::splat(1.0), e);
    let m = B::select(small, m + m, m) - B::splat(1.0);

    let z = m * m;
    let y = m * z * poly(m, &LOG_P);
    let y = y - B::splat(0.5) * z;
    (m + y, e)
}

/// Applies the logarithm edge contract: negative → NaN, ±0 → −∞,
/// +∞ → +∞, NaN propagates.
#[inline(always)]
fn log_edges<B: SimdFloat>(x: B, y: B) -> B {
    let y = B::select(x.simd_eq(B::splat(0.0)), B::splat(f32::NEG_INFINITY), y);
    let y = B::select(x.simd_lt(B::splat(0.0)), B::splat(f32::NAN), y);
    let y = B::select(x.simd_eq(B::splat(f32::INFINITY)), B::splat(f32::INFINITY), y);
    B::select(x.isnan(), x, y)
}

/// Per-lane natural logarithm.
pub fn ln<B: SimdFloat>(x: B) -> B {
    let (lnm, e) = ln_parts(x);
    let y = e.fma(B::splat(LN2_C2), lnm);
    let y = e.fma(B::splat(LN2_C1), y);
    log_edges(x, y)
}

/// Per-lane base-2 logarithm.
pub fn log2<B: SimdFloat>(x: B) -> B {
    let (lnm, e) = ln_parts(x);
    let y = lnm.fma(B::splat(LOG2EF), e);
    log_edges(x, y)
}

/// Per-lane base-10 logarithm.
pub fn log10<B: SimdFloat>(x: B) -> B {
    const LOG10E: f32 = 0.434_294_48_f32;
    const LOG10_2: f32 = 0.301_029_99_f32;
    let (lnm, e) = ln_parts(x);
    let y = lnm.fma(B::splat(LOG10E), e * B::splat(LOG10_2));
    log_edges(x, y)
}

// ================================================================
// Trigonometric family
// ================================================================

const SIN_P: [f32; 3] = [-1.951_529_6e-4, 8.332_161e-3, -1.666_665_5e-1];
const COS_P: [f32; 3] = [2.443_315_7e-5, -1.388_731_6e-3, 4.166_664_6e-2];

/// Cody-Waite reduction by π/2: returns the remainder r in [-π/4, π/4]
/// and the quadrant index as integer-valued lanes in {0, 1, 2, 3}.
#[inline(always)]
fn trig_reduce<B: SimdFloat>(x: B) -> (B, B) {
    let k = (x * B::splat(std::f32::consts::FRAC_2_PI)).round();
    let r = k.fnma(B::splat(PIO2F_A), x);
    let r = k.fnma(B::splat(PIO2F_B), r);
    let r = k.fnma(B::splat(PIO2F_C), r);
    let q = k - (k * B::splat(0.25)).floor() * B::splat(4.0);
    (r, q)
}

/// Primary-interval kernels: sin and cos on [-π/4, π/4].
#[inline(always)]
fn sincos_kernels<B: SimdFloat>(r: B) -> (B, B) {
    let z = r * r;
    let s = (z * r).fma(poly(z, &SIN_P), r);
    let c = (z * z).fma(poly(z, &COS_P), z.fnma(B::splat(0.5), B::splat(1.0)));
    (s, c)
}

#[inline(always)]
fn non_finite<B: SimdFloat>(x: B) -> <B as SimdBatch>::Mask {
    x.abs().simd_eq(B::splat(f32::INFINITY)) | x.isnan()
}

/// Per-lane sine.
pub fn sin<B: SimdFloat>(x: B) -> B {
    let (r, q) = trig_reduce(x);
    let (s, c) = sincos_kernels(r);

    let q1 = q.simd_eq(B::splat(1.0));
    let q2 = q.simd_eq(B::splat(2.0));
    let q3 = q.simd_eq(B::splat(3.0));

    let y = B::select(q1 | q3, c, s);
    let y = B::select(q2 | q3, -y, y);
    B::select(non_finite(x), B::splat(f32::NAN), y)
}

/// Per-lane cosine.
pub fn cos<B: SimdFloat>(x: B) -> B {
    let (r, q) = trig_reduce(x);
    let (s, c) = sincos_kernels(r);

    let q1 = q.simd_eq(B::splat(1.0));
    let q2 = q.simd_eq(B::splat(2.0));
    let q3 = q.simd_eq(B::splat(3.0));

    let y = B::select(q1 | q3, s, c);
    let y = B::select(q1 | q2, -y, y);
    B::select(non_finite(x), B::splat(f32::NAN), y)
}

/// Per-lane tangent, as the ratio of the shared sin/cos kernels.
pub fn tan<B: SimdFloat>(x: B) -> B {
    let (r, q) = trig_reduce(x);
    let (s, c) = sincos_kernels(r);

    let odd = q.simd_eq(B::splat(1.0)) | q.simd_eq(B::splat(3.0));
    let y = B::select(odd, -(c / s), s / c);
    B::select(non_finite(x), B::splat(f32::NAN), y)
}

// ================================================================
// Inverse trigonometric family
// ================================================================

const ASIN_P: [f32; 5] = [
    4.216_32e-2,
    2.418_131_1e-2,
    4.547_002_6e-2,
    7.495_300_3e-2,
    1.666_675_2e-1,
];

/// asin on [0, 0.5]: w + w·z·P(z) with z = w².
#[inline(always)]
fn asin_small<B: SimdFloat>(w: B) -> B {
    let z = w * w;
    (z * w).fma(poly(z, &ASIN_P), w)
}

/// Per-lane arcsine; |x| > 1 is a domain error and produces NaN.
pub fn asin<B: SimdFloat>(x: B) -> B {
    let a = x.abs();
    let big = a.simd_gt(B::splat(0.5));

    // |x| > 0.5: asin(a) = π/2 - 2·asin(√((1-a)/2))
    let z = B::splat(0.5) * (B::splat(1.0) - a);
    let w = B::select(big, z.sqrt(), a);
    let small_val = asin_small(w);
    let y = B::select(
        big,
        small_val.fnma(B::splat(2.0), B::splat(std::f32::consts::FRAC_PI_2)),
        small_val,
    );

    let y = copysign(y, x);
    let y = B::select(a.simd_gt(B::splat(1.0)), B::splat(f32::NAN), y);
    B::select(x.isnan(), x, y)
}

/// Per-lane arccosine; |x| > 1 is a domain error and produces NaN.
pub fn acos<B: SimdFloat>(x: B) -> B {
    let a = x.abs();
    let big = a.simd_gt(B::splat(0.5));

    // |x| > 0.5: acos(|x|) = 2·asin(√((1-|x|)/2)), reflected for x < 0
    let z = B::splat(0.5) * (B::splat(1.0) - a);
    let w = B::select(big, z.sqrt(), a);
    let small_val = asin_small(w);

    let outer = small_val + small_val;
    let outer = B::select(
        x.simd_lt(B::splat(0.0)),
        outer.fnma(B::splat(1.0), B::splat(std::f32::consts::PI)),
        outer,
    );

    let inner = B::splat(std::f32::consts::FRAC_PI_2) - copysign(small_val, x);
    let y = B::select(big, outer, inner);

    let y = B::select(a.simd_gt(B::splat(1.0)), B::splat(f32::NAN), y);
    B::select(x.isnan(), x, y)
}

const ATAN_P: [f32; 4] = [
    8.053_744_5e-2,
    -1.387_768_6e-1,
    1.997_771e-1,
    -3.333_294_9e-1,
];

/// Per-lane arctangent.
pub fn atan<B: SimdFloat>(x: B) -> B {
    const TAN_3PI_8: f32 = 2.414_213_6_f32;
    const TAN_PI_8: f32 = 0.414_213_56_f32;

    let a = x.abs();
    let big = a.simd_gt(B::splat(TAN_3PI_8));
    let mid = a.simd_gt(B::splat(TAN_PI_8)) & !big;

    let one = B::splat(1.0);
    let t = B::select(
        big,
        -(one / a),
        B::select(mid, (a - one) / (a + one), a),
    );
    let base = B::select(
        big,
        B::splat(std::f32::consts::FRAC_PI_2),
        B::select(mid, B::splat(std::f32::consts::FRAC_PI_4), B::splat(0.0)),
    );

    let z = t * t;
    let y = base + (z * t).fma(poly(z, &ATAN_P), t);
    let y = copysign(y, x);
    B::select(x.isnan(), x, y)
}

/// Per-lane two-argument arctangent of `y/x` with quadrant handling.
pub fn atan2<B: SimdFloat>(y: B, x: B) -> B {
    let base = atan(y / x);

    let x_neg = x.simd_lt(B::splat(0.0));
    let y_neg = y.simd_lt(B::splat(0.0));
    let r = B::select(x_neg & !y_neg, base + B::splat(std::f32::consts::PI), base);
    let r = B::select(x_neg & y_neg, base - B::splat(std::f32::consts::PI), r);

    // x == 0, y != 0 already yields ±π/2 through atan(±∞). The origin
    // needs its own fixup; negative zero in x is not distinguished.
    let both_zero = x.simd_eq(B::splat(0.0)) & y.simd_eq(B::splat(0.0));
    let r = B::select(
        both_zero & !x_neg,
        copysign(B::splat(0.0), y),
        r,
    );
    let r = B::select(
        both_zero & x_neg,
        copysign(B::splat(std::f32::consts::PI), y),
        r,
    );
    B::select(y.isnan() | x.isnan(), B::splat(f32::NAN), r)
}

// ================================================================
// Hyperbolic family
// ================================================================

const SINH_P: [f32; 3] = [2.037_219_1e-4, 8.330_284e-3, 1.666_671_6e-1];

/// Per-lane hyperbolic sine.
pub fn sinh<B: SimdFloat>(x: B) -> B {
    let a = x.abs();

    // small |x|: odd polynomial avoids the e^x - e^-x cancellation
    let z = x * x;
    let small_val = (z * x).fma(poly(z, &SINH_P), x);

    let e = exp(a);
    let large_val = copysign(
        B::splat(0.5) * (e - B::splat(1.0) / e),
        x,
    );

    let y = B::select(a.simd_lt(B::splat(1.0)), small_val, large_val);
    B::select(x.isnan(), x, y)
}

/// Per-lane hyperbolic cosine.
pub fn cosh<B: SimdFloat>(x: B) -> B {
    let e = exp(x.abs());
    let y = B::splat(0.5) * (e + B::splat(1.0) / e);
    B::select(x.isnan(), x, y)
}

const TANH_P: [f32; 5] = [
    -5.704_988_7e-3,
    2.063_908_9e-2,
    -5.373_971_6e-2,
    1.333_144_2e-1,
    -3.333_328_2e-1,
];

/// Per-lane hyperbolic tangent.
pub fn tanh<B: SimdFloat>(x: B) -> B {
    let a = x.abs();

    let z = x * x;
    let small_val = (z * x).fma(poly(z, &TANH_P), x);

    let e = exp(a + a);
    let large_val = copysign(
        B::splat(1.0) - B::splat(2.0) / (e + B::splat(1.0)),
        x,
    );

    let y = B::select(a.simd_lt(B::splat(0.625)), small_val, large_val);
    let y = B::select(a.simd_gt(B::splat(9.0)), copysign(B::splat(1.0), x), y);
    B::select(x.isnan(), x, y)
}

// ================================================================
// Inverse hyperbolic family
// ================================================================

const ASINH_P: [f32; 4] = [
    2.012_200_3e-2,
    -4.269_934_1e-2,
    7.484_758_6e-2,
    -1.666_628_8e-1,
];

/// Per-lane inverse hyperbolic sine.
pub fn asinh<B: SimdFloat>(x: B) -> B {
    let a = x.abs();
    let one = B::splat(1.0);

    let z = x * x;
    let small_val = (z * x).fma(poly(z, &ASINH_P), x);

    let log_val = ln(a + (a * a + one).sqrt());
    // a² would overflow: asinh(a) → ln(2a) = ln(a) + ln 2
    let huge = a.simd_gt(B::splat(1.0e18));
    let log_val = B::select(huge, ln(a) + B::splat(std::f32::consts::LN_2), log_val);

    let y = B::select(a.simd_lt(B::splat(0.5)), small_val, copysign(log_val, x));
    B::select(x.isnan(), x, y)
}

const ACOSH_P: [f32; 5] = [
    1.759_688_1e-3,
    -7.527_288_7e-3,
    2.645_490_5e-2,
    -1.178_474_2e-1,
    1.414_213_5,
];

/// Per-lane inverse hyperbolic cosine; x < 1 is a domain error and
/// produces NaN.
pub fn acosh<B: SimdFloat>(x: B) -> B {
    let one = B::splat(1.0);
    let z = x - one;

    // near 1: acosh(1 + z) = √z · P(z), stable where the log form cancels
    let near_val = z.sqrt() * poly(z, &ACOSH_P);

    let log_val = ln(x + (x * x - one).sqrt());
    let huge = x.simd_gt(B::splat(1.0e18));
    let log_val = B::select(huge, ln(x) + B::splat(std::f32::consts::LN_2), log_val);

    let y = B::select(z.simd_lt(B::splat(0.5)), near_val, log_val);
    let y = B::select(x.simd_lt(one), B::splat(f32::NAN), y);
    B::select(x.isnan(), x, y)
}

const ATANH_P: [f32; 5] = [
    1.817_400_8e-1,
    8.243_703e-2,
    1.466_914_3e-1,
    1.997_821_6e-1,
    3.333_373e-1,
];

/// Per-lane inverse hyperbolic tangent; |x| > 1 is a domain error and
/// produces NaN, |x| == 1 yields ±∞.
pub fn atanh<B: SimdFloat>(x: B) -> B {
    let a = x.abs();
    let one = B::splat(1.0);

    let z = x * x;
    let small_val = (z * x).fma(poly(z, &ATANH_P), x);

    let log_val = B::splat(0.5) * ln((one + x) / (one - x));

    let y = B::select(a.simd_lt(B::splat(0.5)), small_val, log_val);
    let y = B::select(
        a.simd_eq(one),
        copysign(B::splat(f32::INFINITY), x),
        y,
    );
    let y = B::select(a.simd_gt(one), B::splat(f32::NAN), y);
    B::select(x.isnan(), x, y)
}

// ================================================================
// Power and root family
// ================================================================

/// Per-lane xʸ for positive bases.
///
/// Negative bases are a domain error (NaN) — no integer-exponent special
/// casing is attempted. `pow(x, 0) == 1` and `pow(1, y) == 1` for every
/// lane value, NaN included.
pub fn pow<B: SimdFloat>(x: B, y: B) -> B {
    let r = exp2(y * log2(x));

    let one = B::splat(1.0);
    let r = B::select(x.simd_lt(B::splat(0.0)), B::splat(f32::NAN), r);
    let r = B::select(y.simd_eq(B::splat(0.0)), one, r);
    B::select(x.simd_eq(one), one, r)
}

/// Per-lane cube root, sign-preserving.
pub fn cbrt<B: SimdFloat>(x: B) -> B {
    let a = x.abs();

    // seed from the exponent path, then two Newton steps:
    // t ← (2t + a/t²) / 3
    let t = exp2(log2(a) * B::splat(1.0 / 3.0));
    let t = (t + t + a / (t * t)) * B::splat(1.0 / 3.0);
    let t = (t + t + a / (t * t)) * B::splat(1.0 / 3.0);

    let y = copysign(t, x);
    let y = B::select(x.simd_eq(B::splat(0.0)), x, y);
    let y = B::select(a.simd_eq(B::splat(f32::INFINITY)), x, y);
    B::select(x.isnan(), x, y)
}

/// Per-lane √(x² + y²), scaled to avoid intermediate overflow.
pub fn hypot<B: SimdFloat>(x: B, y: B) -> B {
    let ax = x.abs();
    let ay = y.abs();
    let hi = ax.max(ay);
    let lo = ax.min(ay);

    let r = lo / hi;
    let out = hi * r.fma(r, B::splat(1.0)).sqrt();

    let out = B::select(hi.simd_eq(B::splat(0.0)), B::splat(0.0), out);
    let out = B::select(x.isnan() | y.isnan(), B::splat(f32::NAN), out);
    // ±∞ wins even over NaN in the other argument
    let inf = B::splat(f32::INFINITY);
    B::select(ax.simd_eq(inf) | ay.simd_eq(inf), inf, out)
}

// ================================================================
// Rounding family
// ================================================================

/// Per-lane round toward negative infinity.
#[inline(always)]
pub fn floor<B: SimdFloat>(x: B) -> B {
    x.floor()
}

/// Per-lane round toward positive infinity.
#[inline(always)]
pub fn ceil<B: SimdFloat>(x: B) -> B {
    x.ceil()
}

/// Per-lane round to nearest, ties to even.
#[inline(always)]
pub fn round<B: SimdFloat>(x: B) -> B {
    x.round()
}

/// Per-lane round toward zero.
#[inline(always)]
pub fn trunc<B: SimdFloat>(x: B) -> B {
    x.trunc()
}
