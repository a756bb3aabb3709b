//! NEON backend tier: 128-bit vector registers on aarch64.
//!
//! NEON loads and stores have no separate aligned encodings; the aligned
//! variants are the same instruction with the contract's stricter
//! precondition. The fused multiply-add family uses the native `vfmaq`
//! instructions: one rounding step.

pub mod f32x4;

pub mod f64x2;
