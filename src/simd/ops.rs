//! Named scalar-vs-batch operation pairs.
//!
//! External benchmarking and testing harnesses need to enumerate "the
//! same computation, once per lane and once per batch" under a stable
//! label. Rather than generating named functor types textually, each
//! operation is a plain value: a label, the batch implementation, and the
//! per-lane scalar reference. [`unary_ops`] and [`binary_ops`] return the
//! full catalogue for any single-precision batch type.

use crate::simd::math;
use crate::simd::traits::{SimdBatch, SimdFloat};

/// A named one-argument operation with paired batch and scalar forms.
#[derive(Copy, Clone)]
pub struct UnaryOp<B: SimdFloat> {
    /// Stable label, usable as a benchmark or test case name.
    pub name: &'static str,
    /// Batch implementation.
    pub batch: fn(B) -> B,
    /// Per-lane scalar reference.
    pub scalar: fn(f32) -> f32,
}

/// A named two-argument operation with paired batch and scalar forms.
#[derive(Copy, Clone)]
pub struct BinaryOp<B: SimdFloat> {
    /// Stable label, usable as a benchmark or test case name.
    pub name: &'static str,
    /// Batch implementation.
    pub batch: fn(B, B) -> B,
    /// Per-lane scalar reference.
    pub scalar: fn(f32, f32) -> f32,
}

impl<B: SimdFloat> UnaryOp<B> {
    /// Applies the batch form.
    #[inline(always)]
    pub fn apply(&self, x: B) -> B {
        (self.batch)(x)
    }

    /// Applies the scalar reference to one lane value.
    #[inline(always)]
    pub fn apply_scalar(&self, x: f32) -> f32 {
        (self.scalar)(x)
    }
}

impl<B: SimdFloat> BinaryOp<B> {
    /// Applies the batch form.
    #[inline(always)]
    pub fn apply(&self, x: B, y: B) -> B {
        (self.batch)(x, y)
    }

    /// Applies the scalar reference to one lane-value pair.
    #[inline(always)]
    pub fn apply_scalar(&self, x: f32, y: f32) -> f32 {
        (self.scalar)(x, y)
    }
}

/// Every named one-argument operation.
pub fn unary_ops<B: SimdFloat>() -> Vec<UnaryOp<B>> {
    vec![
        UnaryOp { name: "abs", batch: SimdBatch::abs, scalar: f32::abs },
        UnaryOp { name: "sqrt", batch: SimdBatch::sqrt, scalar: f32::sqrt },
        UnaryOp { name: "floor", batch: math::floor, scalar: f32::floor },
        UnaryOp { name: "ceil", batch: math::ceil, scalar: f32::ceil },
        UnaryOp { name: "round", batch: math::round, scalar: f32::round_ties_even },
        UnaryOp { name: "trunc", batch: math::trunc, scalar: f32::trunc },
        UnaryOp { name: "exp", batch: math::exp, scalar: f32::exp },
        UnaryOp { name: "exp2", batch: math::exp2, scalar: f32::exp2 },
        UnaryOp { name: "exp10", batch: math::exp10, scalar: |x| 10.0f32.powf(x) },
        UnaryOp { name: "ln", batch: math::ln, scalar: f32::ln },
        UnaryOp { name: "log2", batch: math::log2, scalar: f32::log2 },
        UnaryOp { name: "log10", batch: math::log10, scalar: f32::log10 },
        UnaryOp { name: "sin", batch: math::sin, scalar: f32::sin },
        UnaryOp { name: "cos", batch: math::cos, scalar: f32::cos },
        UnaryOp { name: "tan", batch: math::tan, scalar: f32::tan },
        UnaryOp { name: "asin", batch: math::asin, scalar: f32::asin },
        UnaryOp { name: "acos", batch: math::acos, scalar: f32::acos },
        UnaryOp { name: "atan", batch: math::atan, scalar: f32::atan },
        UnaryOp { name: "sinh", batch: math::sinh, scalar: f32::sinh },
        UnaryOp { name: "cosh", batch: math::cosh, scalar: f32::cosh },
        UnaryOp { name: "tanh", batch: math::tanh, scalar: f32::tanh },
        UnaryOp { name: "asinh", batch: math::asinh, scalar: f32::asinh },
        UnaryOp { name: "acosh", batch: math::acosh, scalar: f32::acosh },
        UnaryOp { name: "atanh", batch: math::atanh, scalar: f32::atanh },
        UnaryOp { name: "cbrt", batch: math::cbrt, scalar: f32::cbrt },
    ]
}

/// Every named two-argument operation.
pub fn binary_ops<B: SimdFloat>() -> Vec<BinaryOp<B>> {
    vec![
        BinaryOp { name: "add", batch: |a, b| a + b, scalar: |a, b| a + b },
        BinaryOp { name: "sub", batch: |a, b| a - b, scalar: |a, b| a - b },
        BinaryOp { name: "mul", batch: |a, b| a * b, scalar: |a, b| a * b },
        BinaryOp { name: "div", batch: |a, b| a / b, scalar: |a, b| a / b },
        BinaryOp { name: "min", batch: SimdBatch::min, scalar: f32::min },
        BinaryOp { name: "max", batch: SimdBatch::max, scalar: f32::max },
        BinaryOp { name: "pow", batch: math::pow, scalar: f32::powf },
        BinaryOp { name: "hypot", batch: math::hypot, scalar: f32::hypot },
        BinaryOp { name: "atan2", batch: math::atan2, scalar: f32::atan2 },
    ]
}
