//! SSE4.1 4-lane single-precision batch.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::simd::traits::{
    RoundMode, SimdBatch, SimdCvtLoad, SimdCvtLoadI32, SimdCvtStore, SimdFloat, SimdMask,
};

/// SSE native register width in bytes; the aligned-access precondition.
pub(crate) const SSE_ALIGNMENT: usize = 16;

const LANE_COUNT: usize = 4;

/// 4 packed `f32` lanes in one SSE register.
///
/// Bit-compatible with `__m128` (`repr(transparent)`); pure value
/// semantics, no heap resources.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct F32x4(pub(crate) __m128);

/// Companion boolean batch of [`F32x4`]: all-ones/all-zeros 32-bit lanes.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct Mask32x4(pub(crate) __m128);

impl F32x4 {
    /// Builds a batch from 4 explicit lanes, lane 0 first.
    #[inline(always)]
    pub fn new(e0: f32, e1: f32, e2: f32, e3: f32) -> Self {
        Self(unsafe { _mm_setr_ps(e0, e1, e2, e3) })
    }

    /// Wraps a raw register value.
    #[inline(always)]
    pub fn from_register(reg: __m128) -> Self {
        Self(reg)
    }

    /// Unwraps to the raw register value.
    #[inline(always)]
    pub fn to_register(self) -> __m128 {
        self.0
    }
}

impl SimdBatch for F32x4 {
    type Scalar = f32;
    type Mask = Mask32x4;
    type Array = [f32; LANE_COUNT];

    const LANES: usize = LANE_COUNT;
    const ALIGN: usize = SSE_ALIGNMENT;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self(unsafe { _mm_set1_ps(value) })
    }

    #[inline(always)]
    fn from_array(lanes: [f32; LANE_COUNT]) -> Self {
        unsafe { Self::load_unaligned(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(self) -> [f32; LANE_COUNT] {
        let mut out = [0.0f32; LANE_COUNT];
        unsafe { _mm_storeu_ps(out.as_mut_ptr(), self.0) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        Self(_mm_load_ps(ptr))
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f32) -> Self {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        Self(_mm_loadu_ps(ptr))
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f32) {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        _mm_store_ps(ptr, self.0)
    }

    #[inline(always)]
    unsafe fn store_unaligned(self, ptr: *mut f32) {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        _mm_storeu_ps(ptr, self.0)
    }

    #[inline(always)]
    fn extract(self, index: usize) -> f32 {
        self.to_array()[index & (LANE_COUNT - 1)]
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        Self(unsafe { _mm_andnot_ps(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_eq(self, rhs: Self) -> Mask32x4 {
        Mask32x4(unsafe { _mm_cmpeq_ps(self.0, rhs.0) })
    }

    /// `cmpneqps` is the unordered predicate: true on NaN.
    #[inline(always)]
    fn simd_ne(self, rhs: Self) -> Mask32x4 {
        Mask32x4(unsafe { _mm_cmpneq_ps(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_lt(self, rhs: Self) -> Mask32x4 {
        Mask32x4(unsafe { _mm_cmplt_ps(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_le(self, rhs: Self) -> Mask32x4 {
        Mask32x4(unsafe { _mm_cmple_ps(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_gt(self, rhs: Self) -> Mask32x4 {
        Mask32x4(unsafe { _mm_cmpgt_ps(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_ge(self, rhs: Self) -> Mask32x4 {
        Mask32x4(unsafe { _mm_cmpge_ps(self.0, rhs.0) })
    }

    #[inline(always)]
    fn select(cond: Mask32x4, a: Self, b: Self) -> Self {
        Self(unsafe { _mm_blendv_ps(b.0, a.0, cond.0) })
    }

    /// `minps`: returns the second operand when either lane is NaN.
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self(unsafe { _mm_min_ps(self.0, rhs.0) })
    }

    /// `maxps`: returns the second operand when either lane is NaN.
    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self(unsafe { _mm_max_ps(self.0, rhs.0) })
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self::splat(-0.0).andnot(self)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self(unsafe { _mm_sqrt_ps(self.0) })
    }

    /// No FMA unit at this tier: multiply then add, two roundings.
    #[inline(always)]
    fn fma(self, y: Self, z: Self) -> Self {
        self * y + z
    }

    #[inline(always)]
    fn fms(self, y: Self, z: Self) -> Self {
        self * y - z
    }

    #[inline(always)]
    fn fnma(self, y: Self, z: Self) -> Self {
        z - self * y
    }

    #[inline(always)]
    fn fnms(self, y: Self, z: Self) -> Self {
        -(self * y) - z
    }

    #[inline(always)]
    fn floor(self) -> Self {
        Self(unsafe { _mm_floor_ps(self.0) })
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        Self(unsafe { _mm_ceil_ps(self.0) })
    }

    #[inline(always)]
    fn round(self) -> Self {
        Self(unsafe { _mm_round_ps::<{ _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC }>(self.0) })
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        Self(unsafe { _mm_round_ps::<{ _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC }>(self.0) })
    }

    #[inline(always)]
    fn isnan(self) -> Mask32x4 {
        Mask32x4(unsafe { _mm_cmpunord_ps(self.0, self.0) })
    }

    #[inline(always)]
    fn hadd(self) -> f32 {
        unsafe {
            let folded = _mm_add_ps(self.0, _mm_movehl_ps(self.0, self.0));
            let folded = _mm_add_ss(folded, _mm_shuffle_ps::<1>(folded, folded));
            _mm_cvtss_f32(folded)
        }
    }

    #[inline(always)]
    fn haddp(rows: &[Self]) -> Self {
        debug_assert!(rows.len() == LANE_COUNT, "haddp needs exactly {LANE_COUNT} rows");
        unsafe {
            let tmp0 = _mm_hadd_ps(rows[0].0, rows[1].0);
            let tmp1 = _mm_hadd_ps(rows[2].0, rows[3].0);
            Self(_mm_hadd_ps(tmp0, tmp1))
        }
    }
}

impl SimdFloat for F32x4 {
    #[inline(always)]
    fn ldexp(self, pow: Self) -> Self {
        unsafe {
            let k = _mm_cvtps_epi32(pow.0);
            let biased = _mm_add_epi32(k, _mm_set1_epi32(127));
            let two_k = _mm_castsi128_ps(_mm_slli_epi32::<23>(biased));
            Self(_mm_mul_ps(self.0, two_k))
        }
    }

    #[inline(always)]
    fn frexp(self) -> (Self, Self) {
        unsafe {
            let bits = _mm_castps_si128(self.0);
            let exp_bits = _mm_and_si128(bits, _mm_set1_epi32(0x7f80_0000));
            let exponent = _mm_sub_epi32(_mm_srli_epi32::<23>(exp_bits), _mm_set1_epi32(126));
            let mantissa = _mm_or_si128(
                _mm_and_si128(bits, _mm_set1_epi32(0x807f_ffffu32 as i32)),
                _mm_set1_epi32(0x3f00_0000),
            );
            (
                Self(_mm_castsi128_ps(mantissa)),
                Self(_mm_cvtepi32_ps(exponent)),
            )
        }
    }
}

impl SimdCvtLoadI32 for F32x4 {
    /// Both modes lower to `cvtdq2ps`, which follows the MXCSR rounding
    /// field; `Nearest` is accurate under the default environment.
    #[inline(always)]
    unsafe fn cvt_load_i32_aligned(ptr: *const i32, mode: RoundMode) -> Self {
        let raw = _mm_load_si128(ptr.cast());
        match mode {
            RoundMode::Nearest | RoundMode::Current => Self(_mm_cvtepi32_ps(raw)),
        }
    }

    #[inline(always)]
    unsafe fn cvt_load_i32_unaligned(ptr: *const i32, mode: RoundMode) -> Self {
        let raw = _mm_loadu_si128(ptr.cast());
        match mode {
            RoundMode::Nearest | RoundMode::Current => Self(_mm_cvtepi32_ps(raw)),
        }
    }
}

impl SimdCvtLoad<i64> for F32x4 {
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

impl SimdCvtLoad<f64> for F32x4 {
    #[inline(always)]
    unsafe fn cvt_load_aligned(ptr: *const f64) -> Self {
        let lo = _mm_cvtpd_ps(_mm_load_pd(ptr));
        let hi = _mm_cvtpd_ps(_mm_load_pd(ptr.add(2)));
        Self(_mm_movelh_ps(lo, hi))
    }

    #[inline(always)]
    unsafe fn cvt_load_unaligned(ptr: *const f64) -> Self {
        let lo = _mm_cvtpd_ps(_mm_loadu_pd(ptr));
        let hi = _mm_cvtpd_ps(_mm_loadu_pd(ptr.add(2)));
        Self(_mm_movelh_ps(lo, hi))
    }
}

impl SimdCvtStore<i32> for F32x4 {
    /// `cvttps2dq` truncates toward zero.
    #[inline(always)]
    unsafe fn cvt_store_aligned(self, ptr: *mut i32) {
        _mm_store_si128(ptr.cast(), _mm_cvttps_epi32(self.0))
    }

    #[inline(always)]
    unsafe fn cvt_store_unaligned(self, ptr: *mut i32) {
        _mm_storeu_si128(ptr.cast(), _mm_cvttps_epi32(self.0))
    }
}

impl SimdCvtStore<i64> for F32x4 {
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

impl SimdCvtStore<f64> for F32x4 {
    #[inline(always)]
    unsafe fn cvt_store_aligned(self, ptr: *mut f64) {
        _mm_store_pd(ptr, _mm_cvtps_pd(self.0));
        _mm_store_pd(ptr.add(2), _mm_cvtps_pd(_mm_movehl_ps(self.0, self.0)));
    }

    #[inline(always)]
    unsafe fn cvt_store_unaligned(self, ptr: *mut f64) {
        _mm_storeu_pd(ptr, _mm_cvtps_pd(self.0));
        _mm_storeu_pd(ptr.add(2), _mm_cvtps_pd(_mm_movehl_ps(self.0, self.0)));
    }
}

impl Add for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(unsafe { _mm_add_ps(self.0, rhs.0) })
    }
}

impl Sub for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(unsafe { _mm_sub_ps(self.0, rhs.0) })
    }
}

impl Mul for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(unsafe { _mm_mul_ps(self.0, rhs.0) })
    }
}

impl Div for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self(unsafe { _mm_div_ps(self.0, rhs.0) })
    }
}

impl Neg for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self(unsafe { _mm_sub_ps(_mm_setzero_ps(), self.0) })
    }
}

impl BitAnd for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(unsafe { _mm_and_ps(self.0, rhs.0) })
    }
}

impl BitOr for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(unsafe { _mm_or_ps(self.0, rhs.0) })
    }
}

impl BitXor for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(unsafe { _mm_xor_ps(self.0, rhs.0) })
    }
}

impl Not for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self(unsafe { _mm_xor_ps(self.0, _mm_castsi128_ps(_mm_set1_epi32(-1))) })
    }
}

impl Mask32x4 {
    /// Wraps a backend-native mask value (all-ones/all-zeros lanes).
    #[inline(always)]
    pub fn from_register(reg: __m128) -> Self {
        Self(reg)
    }

    /// Unwraps to the backend-native mask value.
    #[inline(always)]
    pub fn to_register(self) -> __m128 {
        self.0
    }

    /// Builds a mask from 4 explicit booleans, lane 0 first.
    #[inline(always)]
    pub fn new(b0: bool, b1: bool, b2: bool, b3: bool) -> Self {
        Self::from_array([b0, b1, b2, b3])
    }

    #[inline(always)]
    fn bitmask(self) -> i32 {
        unsafe { _mm_movemask_ps(self.0) }
    }
}

impl SimdMask for Mask32x4 {
    type BoolArray = [bool; LANE_COUNT];

    #[inline(always)]
    fn from_array(lanes: [bool; LANE_COUNT]) -> Self {
        let word = |b: bool| -(b as i32);
        Self(unsafe {
            _mm_castsi128_ps(_mm_setr_epi32(
                word(lanes[0]),
                word(lanes[1]),
                word(lanes[2]),
                word(lanes[3]),
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
        Self(unsafe { _mm_castsi128_ps(_mm_set1_epi32(-(value as i32))) })
    }

    #[inline(always)]
    fn any(self) -> bool {
        self.bitmask() != 0
    }

    #[inline(always)]
    fn all(self) -> bool {
        self.bitmask() == 0xf
    }

    #[inline(always)]
    fn extract(self, index: usize) -> bool {
        self.bitmask() & (1 << (index & (LANE_COUNT - 1))) != 0
    }
}

impl BitAnd for Mask32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(unsafe { _mm_and_ps(self.0, rhs.0) })
    }
}

impl BitOr for Mask32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(unsafe { _mm_or_ps(self.0, rhs.0) })
    }
}

impl BitXor for Mask32x4 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(unsafe { _mm_xor_ps(self.0, rhs.0) })
    }
}

impl Not for Mask32x4 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self(unsafe { _mm_xor_ps(self.0, _mm_castsi128_ps(_mm_set1_epi32(-1))) })
    }
}
