//! AVX2 backend tier: 256-bit vector registers.
//!
//! Compiled only when `build.rs` selects the `avx2` cfg flag, which also
//! enables the `avx`, `avx2`, and `fma` target features. The fused
//! multiply-add family on this tier is a single rounding step.
//!
//! # Available Types
//!
//! - [`f32x8::F32x8`]: 8 packed single-precision lanes (with [`f32x8::Mask32x8`])
//! - [`f64x4::F64x4`]: 4 packed double-precision lanes (with [`f64x4::Mask64x4`])
//!
//! Optimal aligned access requires 32-byte boundaries.

pub mod f32x8;

pub mod f64x4;
