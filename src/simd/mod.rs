//! Batch types, backend tiers, and the generic operations built on them.
//!
//! Exactly one backend module is compiled per build, selected by the cfg
//! flag `build.rs` emits after probing the host CPU. The `F32s`/`F64s`
//! aliases always name the active tier's native-width batch types, so
//! portable code never spells out a concrete backend.

#[cfg(avx2)]
pub mod avx2;

#[cfg(sse)]
pub mod sse;

#[cfg(neon)]
pub mod neon;

#[cfg(fallback)]
pub mod fallback;

pub mod math;
pub mod ops;
pub mod traits;

pub use traits::{
    RoundMode, SimdBatch, SimdCvtLoad, SimdCvtLoadI32, SimdCvtStore, SimdFloat, SimdMask,
};

/// Single-precision batch of the active backend tier.
#[cfg(avx2)]
pub use avx2::f32x8::F32x8 as F32s;
/// Double-precision batch of the active backend tier.
#[cfg(avx2)]
pub use avx2::f64x4::F64x4 as F64s;

#[cfg(sse)]
pub use sse::f32x4::F32x4 as F32s;
#[cfg(sse)]
pub use sse::f64x2::F64x2 as F64s;

#[cfg(neon)]
pub use neon::f32x4::F32x4 as F32s;
#[cfg(neon)]
pub use neon::f64x2::F64x2 as F64s;

#[cfg(fallback)]
pub use fallback::F32x8 as F32s;
#[cfg(fallback)]
pub use fallback::F64x4 as F64s;
