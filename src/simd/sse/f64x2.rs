//! SSE4.1 2-lane double-precision batch.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::simd::sse::f32x4::SSE_ALIGNMENT;
use crate::simd::traits::{SimdBatch, SimdCvtLoad, SimdCvtStore, SimdMask};

const LANE_COUNT: usize = 2;

/// 2 packed `f64` lanes in one SSE register.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct F64x2(pub(crate) __m128d);

/// Companion boolean batch of [`F64x2`].
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct Mask64x2(pub(crate) __m128d);

impl F64x2 {
    /// Builds a batch from 2 explicit lanes, lane 0 first.
    #[inline(always)]
    pub fn new(e0: f64, e1: f64) -> Self {
        Self(unsafe { _mm_setr_pd(e0, e1) })
    }

    /// Wraps a raw register value.
    #[inline(always)]
    pub fn from_register(reg: __m128d) -> Self {
        Self(reg)
    }

    /// Unwraps to the raw register value.
    #[inline(always)]
    pub fn to_register(self) -> __m128d {
        self.0
    }
}

impl SimdBatch for F64x2 {
    type Scalar = f64;
    type Mask = Mask64x2;
    type Array = [f64; LANE_COUNT];

    const LANES: usize = LANE_COUNT;
    const ALIGN: usize = SSE_ALIGNMENT;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        Self(unsafe { _mm_set1_pd(value) })
    }

    #[inline(always)]
    fn from_array(lanes: [f64; LANE_COUNT]) -> Self {
        unsafe { Self::load_unaligned(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(self) -> [f64; LANE_COUNT] {
        let mut out = [0.0f64; LANE_COUNT];
        unsafe { _mm_storeu_pd(out.as_mut_ptr(), self.0) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        Self(_mm_load_pd(ptr))
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        Self(_mm_loadu_pd(ptr))
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        _mm_store_pd(ptr, self.0)
    }

    #[inline(always)]
    unsafe fn store_unaligned(self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        _mm_storeu_pd(ptr, self.0)
    }

    #[inline(always)]
    fn extract(self, index: usize) -> f64 {
        self.to_array()[index & (LANE_COUNT - 1)]
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        Self(unsafe { _mm_andnot_pd(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_eq(self, rhs: Self) -> Mask64x2 {
        Mask64x2(unsafe { _mm_cmpeq_pd(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_ne(self, rhs: Self) -> Mask64x2 {
        Mask64x2(unsafe { _mm_cmpneq_pd(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_lt(self, rhs: Self) -> Mask64x2 {
        Mask64x2(unsafe { _mm_cmplt_pd(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_le(self, rhs: Self) -> Mask64x2 {
        Mask64x2(unsafe { _mm_cmple_pd(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_gt(self, rhs: Self) -> Mask64x2 {
        Mask64x2(unsafe { _mm_cmpgt_pd(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_ge(self, rhs: Self) -> Mask64x2 {
        Mask64x2(unsafe { _mm_cmpge_pd(self.0, rhs.0) })
    }

    #[inline(always)]
    fn select(cond: Mask64x2, a: Self, b: Self) -> Self {
        Self(unsafe { _mm_blendv_pd(b.0, a.0, cond.0) })
    }

    /// `minpd`: returns the second operand when either lane is NaN.
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self(unsafe { _mm_min_pd(self.0, rhs.0) })
    }

    /// `maxpd`: returns the second operand when either lane is NaN.
    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self(unsafe { _mm_max_pd(self.0, rhs.0) })
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self::splat(-0.0).andnot(self)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self(unsafe { _mm_sqrt_pd(self.0) })
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
        Self(unsafe { _mm_floor_pd(self.0) })
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        Self(unsafe { _mm_ceil_pd(self.0) })
    }

    #[inline(always)]
    fn round(self) -> Self {
        Self(unsafe { _mm_round_pd::<{ _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC }>(self.0) })
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        Self(unsafe { _mm_round_pd::<{ _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC }>(self.0) })
    }

    #[inline(always)]
    fn isnan(self) -> Mask64x2 {
        Mask64x2(unsafe { _mm_cmpunord_pd(self.0, self.0) })
    }

    #[inline(always)]
    fn hadd(self) -> f64 {
        unsafe {
            let folded = _mm_add_sd(self.0, _mm_unpackhi_pd(self.0, self.0));
            _mm_cvtsd_f64(folded)
        }
    }

    #[inline(always)]
    fn haddp(rows: &[Self]) -> Self {
        debug_assert!(rows.len() == LANE_COUNT, "haddp needs exactly {LANE_COUNT} rows");
        unsafe {
            Self(_mm_add_pd(
                _mm_unpacklo_pd(rows[0].0, rows[1].0),
                _mm_unpackhi_pd(rows[0].0, rows[1].0),
            ))
        }
    }
}

impl SimdCvtLoad<i32> for F64x2 {
    /// Exact: every i32 is representable as f64.
    #[inline(always)]
    unsafe fn cvt_load_aligned(ptr: *const i32) -> Self {
        <Self as SimdCvtLoad<i32>>::cvt_load_unaligned(ptr)
    }

    #[inline(always)]
    unsafe fn cvt_load_unaligned(ptr: *const i32) -> Self {
        // 8-byte load of the two source lanes into the low half
        Self(_mm_cvtepi32_pd(_mm_loadl_epi64(ptr.cast())))
    }
}

impl SimdCvtLoad<i64> for F64x2 {
    #[inline(always)]
    unsafe fn cvt_load_aligned(ptr: *const i64) -> Self {
        <Self as SimdCvtLoad<i64>>::cvt_load_unaligned(ptr)
    }

    #[inline(always)]
    unsafe fn cvt_load_unaligned(ptr: *const i64) -> Self {
        let src = std::slice::from_raw_parts(ptr, LANE_COUNT);
        let mut tmp = [0.0f64; LANE_COUNT];
        for (dst, &lane) in tmp.iter_mut().zip(src) {
            *dst = lane as f64;
        }
        Self::load_unaligned(tmp.as_ptr())
    }
}

impl SimdCvtLoad<f32> for F64x2 {
    /// Exact widening.
    #[inline(always)]
    unsafe fn cvt_load_aligned(ptr: *const f32) -> Self {
        <Self as SimdCvtLoad<f32>>::cvt_load_unaligned(ptr)
    }

    #[inline(always)]
    unsafe fn cvt_load_unaligned(ptr: *const f32) -> Self {
        Self(_mm_cvtps_pd(_mm_castpd_ps(_mm_load_sd(ptr.cast()))))
    }
}

impl SimdCvtStore<i32> for F64x2 {
    /// `cvttpd2dq` truncates toward zero.
    #[inline(always)]
    unsafe fn cvt_store_aligned(self, ptr: *mut i32) {
        <Self as SimdCvtStore<i32>>::cvt_store_unaligned(self, ptr)
    }

    #[inline(always)]
    unsafe fn cvt_store_unaligned(self, ptr: *mut i32) {
        _mm_storel_epi64(ptr.cast(), _mm_cvttpd_epi32(self.0))
    }
}

impl SimdCvtStore<i64> for F64x2 {
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

impl SimdCvtStore<f32> for F64x2 {
    #[inline(always)]
    unsafe fn cvt_store_aligned(self, ptr: *mut f32) {
        <Self as SimdCvtStore<f32>>::cvt_store_unaligned(self, ptr)
    }

    #[inline(always)]
    unsafe fn cvt_store_unaligned(self, ptr: *mut f32) {
        _mm_store_sd(ptr.cast(), _mm_castps_pd(_mm_cvtpd_ps(self.0)))
    }
}

impl Add for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(unsafe { _mm_add_pd(self.0, rhs.0) })
    }
}

impl Sub for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(unsafe { _mm_sub_pd(self.0, rhs.0) })
    }
}

impl Mul for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(unsafe { _mm_mul_pd(self.0, rhs.0) })
    }
}

impl Div for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self(unsafe { _mm_div_pd(self.0, rhs.0) })
    }
}

impl Neg for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self(unsafe { _mm_sub_pd(_mm_setzero_pd(), self.0) })
    }
}

impl BitAnd for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(unsafe { _mm_and_pd(self.0, rhs.0) })
    }
}

impl BitOr for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(unsafe { _mm_or_pd(self.0, rhs.0) })
    }
}

impl BitXor for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(unsafe { _mm_xor_pd(self.0, rhs.0) })
    }
}

impl Not for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self(unsafe { _mm_xor_pd(self.0, _mm_castsi128_pd(_mm_set1_epi32(-1))) })
    }
}

impl Mask64x2 {
    /// Wraps a backend-native mask value (all-ones/all-zeros lanes).
    #[inline(always)]
    pub fn from_register(reg: __m128d) -> Self {
        Self(reg)
    }

    /// Unwraps to the backend-native mask value.
    #[inline(always)]
    pub fn to_register(self) -> __m128d {
        self.0
    }

    /// Builds a mask from 2 explicit booleans, lane 0 first.
    #[inline(always)]
    pub fn new(b0: bool, b1: bool) -> Self {
        Self::from_array([b0, b1])
    }

    #[inline(always)]
    fn bitmask(self) -> i32 {
        unsafe { _mm_movemask_pd(self.0) }
    }
}

impl SimdMask for Mask64x2 {
    type BoolArray = [bool; LANE_COUNT];

    #[inline(always)]
    fn from_array(lanes: [bool; LANE_COUNT]) -> Self {
        let word = |b: bool| -(b as i64);
        // set_epi64x takes high lane first
        Self(unsafe { _mm_castsi128_pd(_mm_set_epi64x(word(lanes[1]), word(lanes[0]))) })
    }

    #[inline(always)]
    fn to_array(self) -> [bool; LANE_COUNT] {
        let bits = self.bitmask();
        [bits & 1 != 0, bits & 2 != 0]
    }

    #[inline(always)]
    fn splat(value: bool) -> Self {
        Self(unsafe { _mm_castsi128_pd(_mm_set1_epi64x(-(value as i64))) })
    }

    #[inline(always)]
    fn any(self) -> bool {
        self.bitmask() != 0
    }

    #[inline(always)]
    fn all(self) -> bool {
        self.bitmask() == 0b11
    }

    #[inline(always)]
    fn extract(self, index: usize) -> bool {
        self.bitmask() & (1 << (index & (LANE_COUNT - 1))) != 0
    }
}

impl BitAnd for Mask64x2 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(unsafe { _mm_and_pd(self.0, rhs.0) })
    }
}

impl BitOr for Mask64x2 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(unsafe { _mm_or_pd(self.0, rhs.0) })
    }
}

impl BitXor for Mask64x2 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(unsafe { _mm_xor_pd(self.0, rhs.0) })
    }
}

impl Not for Mask64x2 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self(unsafe { _mm_xor_pd(self.0, _mm_castsi128_pd(_mm_set1_epi32(-1))) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_and_reduction() {
        let a = F64x2::new(1.5, 2.5);
        let b = F64x2::new(0.5, 0.5);
        assert_eq!((a + b).to_array(), [2.0, 3.0]);
        assert_eq!((a / b).to_array(), [3.0, 5.0]);
        assert_eq!(a.hadd(), 4.0);
    }

    #[test]
    fn haddp_two_rows() {
        let rows = [F64x2::new(1.0, 2.0), F64x2::new(10.0, 20.0)];
        assert_eq!(F64x2::haddp(&rows).to_array(), [3.0, 30.0]);
    }

    #[test]
    fn select_and_compare() {
        let a = F64x2::new(1.0, 5.0);
        let mask = a.simd_gt(F64x2::splat(2.0));
        assert_eq!(mask.to_array(), [false, true]);
        let out = F64x2::select(mask, a, F64x2::splat(0.0)).to_array();
        assert_eq!(out, [0.0, 5.0]);
    }

    #[test]
    fn converting_roundtrips() {
        let ints = [7i32, -7];
        let v = unsafe { <F64x2 as SimdCvtLoad<i32>>::cvt_load_unaligned(ints.as_ptr()) };
        assert_eq!(v.to_array(), [7.0, -7.0]);

        let v = F64x2::new(2.75, -2.75);
        let mut dst = [0i32; 2];
        unsafe { <F64x2 as SimdCvtStore<i32>>::cvt_store_unaligned(v, dst.as_mut_ptr()) };
        assert_eq!(dst, [2, -2]);

        let mut singles = [0.0f32; 2];
        unsafe { <F64x2 as SimdCvtStore<f32>>::cvt_store_unaligned(v, singles.as_mut_ptr()) };
        assert_eq!(singles, [2.75, -2.75]);
    }
}
