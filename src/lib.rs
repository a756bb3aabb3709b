//! Portable explicit SIMD batches.
//!
//! `lanewise` gives numeric code a single, architecture-independent API for
//! operating on fixed-width groups of scalar lanes, compiled for each CPU
//! feature level into the best native vector instructions available. The
//! active backend tier (scalar fallback, SSE4.1, AVX2, or NEON) is selected
//! once at build time by `build.rs`; there is no runtime dispatch.
//!
//! # Layout
//!
//! - [`simd::traits`] — the trait registry binding a (scalar type, lane
//!   count) pair to its batch and mask types and the generic operation set.
//! - `simd::fallback` / `simd::sse` / `simd::avx2` / `simd::neon` — one
//!   concrete backend per tier; exactly one is compiled per build.
//! - [`simd::math`] — elementary functions (exponential, logarithmic,
//!   trigonometric, hyperbolic, power families) written once against the
//!   batch operation set, so every backend specializes them for free.
//! - [`simd::ops`] — named scalar-vs-batch operation pairs for external
//!   benchmarking and testing harnesses.
//!
//! # Example
//!
//! ```rust
//! use lanewise::simd::{F32s, SimdBatch};
//!
//! let a = F32s::splat(2.0);
//! let b = F32s::splat(3.0);
//! let sum = a + b;
//! assert_eq!(sum.extract(0), 5.0);
//! ```

pub mod simd;
