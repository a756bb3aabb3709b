//! AVX2 8-lane single-precision batch.
//!
//! [`F32x8`] wraps the 256-bit `__m256` register and maps the generic
//! batch operation set onto AVX2 instructions. Its companion mask type
//! [`Mask32x8`] stores per-lane truth as all-ones/all-zeros 32-bit lanes,
//! the representation AVX2 comparisons produce and `vblendvps` consumes.
//!
//! # Architecture Requirements
//!
//! - x86/x86_64 with AVX2 and FMA (Intel Haswell or AMD Excavator and
//!   later); the build script enables the matching target features.
//! - Aligned loads and stores require 32-byte boundaries. The alignment
//!   precondition is documented, not checked: violating it is undefined
//!   behavior at the caller's risk.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::simd::traits::{
    RoundMode, SimdBatch, SimdCvtLoad, SimdCvtLoadI32, SimdCvtStore, SimdFloat, SimdMask,
};

/// AVX2 native register width in bytes; the aligned-access precondition.
pub(crate) const AVX_ALIGNMENT: usize = 32;

/// Number of f32 lanes in a 256-bit register.
const LANE_COUNT: usize = 8;

/// 8 packed `f32` lanes in one AVX2 register.
///
/// A pure value type: `Copy`, no heap resources, bit-compatible with
/// `__m256` (guaranteed by `repr(transparent)`), so conversion to and
/// from the native register never copies lane-by-lane.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct F32x8(pub(crate) __m256);

/// Companion boolean batch of [`F32x8`]: 8 lanes of all-ones (true) or
/// all-zeros (false) bit patterns.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct Mask32x8(pub(crate) __m256);

impl F32x8 {
    /// Builds a batch from 8 explicit lanes, lane 0 first.
    #[allow(clippy::too_many_arguments)]
    #[inline(always)]
    pub fn new(e0: f32, e1: f32, e2: f32, e3: f32, e4: f32, e5: f32, e6: f32, e7: f32) -> Self {
        Self(unsafe { _mm256_setr_ps(e0, e1, e2, e3, e4, e5, e6, e7) })
    }

    /// Wraps a raw register value.
    #[inline(always)]
    pub fn from_register(reg: __m256) -> Self {
        Self(reg)
    }

    /// Unwraps to the raw register value.
    #[inline(always)]
    pub fn to_register(self) -> __m256 {
        self.0
    }
}

impl SimdBatch for F32x8 {
    type Scalar = f32;
    type Mask = Mask32x8;
    type Array = [f32; LANE_COUNT];

    const LANES: usize = LANE_COUNT;
    const ALIGN: usize = AVX_ALIGNMENT;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self(unsafe { _mm256_set1_ps(value) })
    }

    #[inline(always)]
    fn from_array(lanes: [f32; LANE_COUNT]) -> Self {
        unsafe { Self::load_unaligned(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(self) -> [f32; LANE_COUNT] {
        let mut out = [0.0f32; LANE_COUNT];
        unsafe { _mm256_storeu_ps(out.as_mut_ptr(), self.0) };
        out
    }

    /// Uses `vmovaps`; the 32-byte alignment precondition is the caller's.
    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        Self(_mm256_load_ps(ptr))
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f32) -> Self {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        Self(_mm256_loadu_ps(ptr))
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f32) {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        _mm256_store_ps(ptr, self.0)
    }

    #[inline(always)]
    unsafe fn store_unaligned(self, ptr: *mut f32) {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        _mm256_storeu_ps(ptr, self.0)
    }

    #[inline(always)]
    fn extract(self, index: usize) -> f32 {
        self.to_array()[index & (LANE_COUNT - 1)]
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        // vandnps computes !a & b directly
        Self(unsafe { _mm256_andnot_ps(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_eq(self, rhs: Self) -> Mask32x8 {
        Mask32x8(unsafe { _mm256_cmp_ps::<_CMP_EQ_OQ>(self.0, rhs.0) })
    }

    /// Unordered: true when either lane is NaN.
    #[inline(always)]
    fn simd_ne(self, rhs: Self) -> Mask32x8 {
        Mask32x8(unsafe { _mm256_cmp_ps::<_CMP_NEQ_UQ>(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_lt(self, rhs: Self) -> Mask32x8 {
        Mask32x8(unsafe { _mm256_cmp_ps::<_CMP_LT_OQ>(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_le(self, rhs: Self) -> Mask32x8 {
        Mask32x8(unsafe { _mm256_cmp_ps::<_CMP_LE_OQ>(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_gt(self, rhs: Self) -> Mask32x8 {
        Mask32x8(unsafe { _mm256_cmp_ps::<_CMP_GT_OQ>(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_ge(self, rhs: Self) -> Mask32x8 {
        Mask32x8(unsafe { _mm256_cmp_ps::<_CMP_GE_OQ>(self.0, rhs.0) })
    }

    #[inline(always)]
    fn select(cond: Mask32x8, a: Self, b: Self) -> Self {
        // vblendvps picks from the second source where the mask is set
        Self(unsafe { _mm256_blendv_ps(b.0, a.0, cond.0) })
    }

    /// `vminps`: returns the second operand when either lane is NaN.
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_min_ps(self.0, rhs.0) })
    }

    /// `vmaxps`: returns the second operand when either lane is NaN.
    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_max_ps(self.0, rhs.0) })
    }

    /// Clears the sign bit; no native abs instruction exists at this tier.
    #[inline(always)]
    fn abs(self) -> Self {
        let sign_mask = Self::splat(-0.0);
        sign_mask.andnot(self)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self(unsafe { _mm256_sqrt_ps(self.0) })
    }

    /// Native `vfmadd`: one rounding step.
    #[inline(always)]
    fn fma(self, y: Self, z: Self) -> Self {
        Self(unsafe { _mm256_fmadd_ps(self.0, y.0, z.0) })
    }

    #[inline(always)]
    fn fms(self, y: Self, z: Self) -> Self {
        Self(unsafe { _mm256_fmsub_ps(self.0, y.0, z.0) })
    }

    #[inline(always)]
    fn fnma(self, y: Self, z: Self) -> Self {
        Self(unsafe { _mm256_fnmadd_ps(self.0, y.0, z.0) })
    }

    #[inline(always)]
    fn fnms(self, y: Self, z: Self) -> Self {
        Self(unsafe { _mm256_fnmsub_ps(self.0, y.0, z.0) })
    }

    #[inline(always)]
    fn floor(self) -> Self {
        Self(unsafe { _mm256_floor_ps(self.0) })
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        Self(unsafe { _mm256_ceil_ps(self.0) })
    }

    #[inline(always)]
    fn round(self) -> Self {
        Self(unsafe {
            _mm256_round_ps::<{ _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC }>(self.0)
        })
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        Self(unsafe { _mm256_round_ps::<{ _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC }>(self.0) })
    }

    /// Unordered self-compare: a lane is NaN iff it compares unordered
    /// with itself.
    #[inline(always)]
    fn isnan(self) -> Mask32x8 {
        Mask32x8(unsafe { _mm256_cmp_ps::<_CMP_UNORD_Q>(self.0, self.0) })
    }

    /// Folds halves logarithmically: upper half onto lower, then a
    /// 128-bit reduction tree.
    #[inline(always)]
    fn hadd(self) -> f32 {
        unsafe {
            let tmp = _mm256_add_ps(self.0, _mm256_permute2f128_ps::<1>(self.0, self.0));
            let lo = _mm256_castps256_ps128(tmp);
            let lo = _mm_add_ps(lo, _mm_movehl_ps(lo, lo));
            let lo = _mm_add_ss(lo, _mm_shuffle_ps::<1>(lo, lo));
            _mm_cvtss_f32(lo)
        }
    }

    /// Pairwise `vhaddps` tree with a cross-half blend: lane i of the
    /// result is the sum of all lanes of `rows[i]`.
    #[inline(always)]
    fn haddp(rows: &[Self]) -> Self {
        debug_assert!(rows.len() == LANE_COUNT, "haddp needs exactly {LANE_COUNT} rows");
        unsafe {
            let tmp0 = _mm256_hadd_ps(rows[0].0, rows[1].0);
            let tmp1 = _mm256_hadd_ps(rows[2].0, rows[3].0);
            let tmp1 = _mm256_hadd_ps(tmp0, tmp1);
            let tmp0 = _mm256_hadd_ps(rows[4].0, rows[5].0);
            let tmp2 = _mm256_hadd_ps(rows[6].0, rows[7].0);
            let tmp2 = _mm256_hadd_ps(tmp0, tmp2);
            // tmp1 holds rows 0-3 in its even 128-bit positions, tmp2
            // rows 4-7; blend keeps the in-place halves, the permute
            // fetches the displaced ones.
            let blended = _mm256_blend_ps::<0b1111_0000>(tmp1, tmp2);
            let crossed = _mm256_permute2f128_ps::<0x21>(tmp1, tmp2);
            Self(_mm256_add_ps(blended, crossed))
        }
    }
}

impl SimdFloat for F32x8 {
    #[inline(always)]
    fn ldexp(self, pow: Self) -> Self {
        unsafe {
            let k = _mm256_cvtps_epi32(pow.0);
            let biased = _mm256_add_epi32(k, _mm256_set1_epi32(127));
            let two_k = _mm256_castsi256_ps(_mm256_slli_epi32::<23>(biased));
            Self(_mm256_mul_ps(self.0, two_k))
        }
    }

    #[inline(always)]
    fn frexp(self) -> (Self, Self) {
        unsafe {
            let bits = _mm256_castps_si256(self.0);
            let exp_bits = _mm256_and_si256(bits, _mm256_set1_epi32(0x7f80_0000));
            let exponent = _mm256_sub_epi32(_mm256_srli_epi32::<23>(exp_bits), _mm256_set1_epi32(126));
            let mantissa = _mm256_or_si256(
                _mm256_and_si256(bits, _mm256_set1_epi32(0x807f_ffffu32 as i32)),
                _mm256_set1_epi32(0x3f00_0000),
            );
            (
                Self(_mm256_castsi256_ps(mantissa)),
                Self(_mm256_cvtepi32_ps(exponent)),
            )
        }
    }
}

impl SimdCvtLoadI32 for F32x8 {
    /// Both modes lower to `vcvtdq2ps`, which follows the MXCSR rounding
    /// field; `Nearest` is accurate under the default floating-point
    /// environment. Inexact above 2²⁴.
    #[inline(always)]
    unsafe fn cvt_load_i32_aligned(ptr: *const i32, mode: RoundMode) -> Self {
        let raw = _mm256_load_si256(ptr.cast());
        match mode {
            RoundMode::Nearest | RoundMode::Current => Self(_mm256_cvtepi32_ps(raw)),
        }
    }

    #[inline(always)]
    unsafe fn cvt_load_i32_unaligned(ptr: *const i32, mode: RoundMode) -> Self {
        let raw = _mm256_loadu_si256(ptr.cast());
        match mode {
            RoundMode::Nearest | RoundMode::Current => Self(_mm256_cvtepi32_ps(raw)),
        }
    }
}

impl SimdCvtLoad<i64> for F32x8 {
    /// No packed i64 → f32 conversion exists at this tier; lanes convert
    /// through a stack temporary.
    #[inline(always)]
    unsafe fn cvt_load_aligned(ptr: *const i64) -> Self {
        <Self as SimdCvtLoad<i64>>::cvt_load_unaligned(ptr)
    }

    #[inline(always)]
    unsafe fn cvt_load_unaligned(ptr: *const i64) -> Self {
        let src = std::slice::from_raw_parts(ptr, LANE_COUNT);
        let mut tmp = [0.0f32; LANE_COUNT];
        for (dst, &lane) in tmp.iter_mut().zip(src) {
            *dst = lane as f32;
        }
        Self::load_unaligned(tmp.as_ptr())
    }
}

impl SimdCvtLoad<f64> for F32x8 {
    #[inline(always)]
    unsafe fn cvt_load_aligned(ptr: *const f64) -> Self {
        let lo = _mm256_cvtpd_ps(_mm256_load_pd(ptr));
        let hi = _mm256_cvtpd_ps(_mm256_load_pd(ptr.add(4)));
        Self(_mm256_set_m128(hi, lo))
    }

    #[inline(always)]
    unsafe fn cvt_load_unaligned(ptr: *const f64) -> Self {
        let lo = _mm256_cvtpd_ps(_mm256_loadu_pd(ptr));
        let hi = _mm256_cvtpd_ps(_mm256_loadu_pd(ptr.add(4)));
        Self(_mm256_set_m128(hi, lo))
    }
}

impl SimdCvtStore<i32> for F32x8 {
    /// `vcvttps2dq` truncates toward zero; out-of-range lanes (including
    /// NaN) store the x86 integer-indefinite value `i32::MIN`.
    #[inline(always)]
    unsafe fn cvt_store_aligned(self, ptr: *mut i32) {
        _mm256_store_si256(ptr.cast(), _mm256_cvttps_epi32(self.0))
    }

    #[inline(always)]
    unsafe fn cvt_store_unaligned(self, ptr: *mut i32) {
        _mm256_storeu_si256(ptr.cast(), _mm256_cvttps_epi32(self.0))
    }
}

impl SimdCvtStore<i64> for F32x8 {
    #[inline(always)]
    unsafe fn cvt_store_aligned(self, ptr: *mut i64) {
        <Self as SimdCvtStore<i64>>::cvt_store_unaligned(self, ptr)
    }

    #[inline(always)]
    unsafe fn cvt_store_unaligned(self, ptr: *mut i64) {
        let lanes = self.to_array();
        let dst = std::slice::from_raw_parts_mut(ptr, LANE_COUNT);
        for (out, &lane) in dst.iter_mut().zip(lanes.iter()) {
            *out = lane as i64;
        }
    }
}

impl SimdCvtStore<f64> for F32x8 {
    #[inline(always)]
    unsafe fn cvt_store_aligned(self, ptr: *mut f64) {
        _mm256_store_pd(ptr, _mm256_cvtps_pd(_mm256_castps256_ps128(self.0)));
        _mm256_store_pd(ptr.add(4), _mm256_cvtps_pd(_mm256_extractf128_ps::<1>(self.0)));
    }

    #[inline(always)]
    unsafe fn cvt_store_unaligned(self, ptr: *mut f64) {
        _mm256_storeu_pd(ptr, _mm256_cvtps_pd(_mm256_castps256_ps128(self.0)));
        _mm256_storeu_pd(ptr.add(4), _mm256_cvtps_pd(_mm256_extractf128_ps::<1>(self.0)));
    }
}

impl Add for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_add_ps(self.0, rhs.0) })
    }
}

impl Sub for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_sub_ps(self.0, rhs.0) })
    }
}

impl Mul for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_mul_ps(self.0, rhs.0) })
    }
}

impl Div for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_div_ps(self.0, rhs.0) })
    }
}

impl Neg for F32x8 {
    type Output = Self;

    /// Zero-subtraction; no native negate instruction exists.
    #[inline(always)]
    fn neg(self) -> Self {
        Self(unsafe { _mm256_sub_ps(_mm256_setzero_ps(), self.0) })
    }
}

impl BitAnd for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_and_ps(self.0, rhs.0) })
    }
}

impl BitOr for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_or_ps(self.0, rhs.0) })
    }
}

impl BitXor for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_xor_ps(self.0, rhs.0) })
    }
}

impl Not for F32x8 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self(unsafe {
            _mm256_xor_ps(self.0, _mm256_castsi256_ps(_mm256_set1_epi32(-1)))
        })
    }
}

impl Mask32x8 {
    /// Wraps a backend-native mask value (all-ones/all-zeros lanes).
    #[inline(always)]
    pub fn from_register(reg: __m256) -> Self {
        Self(reg)
    }

    /// Unwraps to the backend-native mask value.
    #[inline(always)]
    pub fn to_register(self) -> __m256 {
        self.0
    }

    /// Builds a mask from 8 explicit booleans, lane 0 first.
    #[allow(clippy::too_many_arguments)]
    #[inline(always)]
    pub fn new(b0: bool, b1: bool, b2: bool, b3: bool, b4: bool, b5: bool, b6: bool, b7: bool) -> Self {
        Self::from_array([b0, b1, b2, b3, b4, b5, b6, b7])
    }

    #[inline(always)]
    fn bitmask(self) -> i32 {
        unsafe { _mm256_movemask_ps(self.0) }
    }
}

impl SimdMask for Mask32x8 {
    type BoolArray = [bool; LANE_COUNT];

    #[inline(always)]
    fn from_array(lanes: [bool; LANE_COUNT]) -> Self {
        let word = |b: bool| -(b as i32);
        Self(unsafe {
            _mm256_castsi256_ps(_mm256_setr_epi32(
                word(lanes[0]),
                word(lanes[1]),
                word(lanes[2]),
                word(lanes[3]),
                word(lanes[4]),
                word(lanes[5]),
                word(lanes[6]),
                word(lanes[7]),
            ))
        })
    }

    #[inline(always)]
    fn to_array(self) -> [bool; LANE_COUNT] {
        let bits = self.bitmask();
        let mut out = [false; LANE_COUNT];
        for (i, lane) in out.iter_mut().enumerate() {
            *lane = bits & (1 << i) != 0;
        }
        out
    }

    #[inline(always)]
    fn splat(value: bool) -> Self {
        Self(unsafe { _mm256_castsi256_ps(_mm256_set1_epi32(-(value as i32))) })
    }

    #[inline(always)]
    fn any(self) -> bool {
        self.bitmask() != 0
    }

    #[inline(always)]
    fn all(self) -> bool {
        self.bitmask() == 0xff
    }

    #[inline(always)]
    fn extract(self, index: usize) -> bool {
        self.bitmask() & (1 << (index & (LANE_COUNT - 1))) != 0
    }
}

impl BitAnd for Mask32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_and_ps(self.0, rhs.0) })
    }
}

impl BitOr for Mask32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_or_ps(self.0, rhs.0) })
    }
}

impl BitXor for Mask32x8 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_xor_ps(self.0, rhs.0) })
    }
}

impl Not for Mask32x8 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self(unsafe {
            _mm256_xor_ps(self.0, _mm256_castsi256_ps(_mm256_set1_epi32(-1)))
        })
    }
}
