//! SSE4.1 backend tier: 128-bit vector registers.
//!
//! Compiled when the build host supports SSE4.1 but not AVX2. This tier
//! has no fused multiply-add unit: the `fma` family is emulated as a
//! multiply followed by an add, i.e. two rounding steps instead of one.

pub mod f32x4;

pub mod f64x2;
