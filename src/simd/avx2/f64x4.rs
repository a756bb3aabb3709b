//! AVX2 4-lane double-precision batch.
//!
//! Same instruction mapping as the single-precision sibling, on the
//! `__m256d` register. Double batches carry the full batch operation set;
//! the transcendental library is single-precision only.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::simd::avx2::f32x8::AVX_ALIGNMENT;
use crate::simd::traits::{SimdBatch, SimdCvtLoad, SimdCvtStore, SimdMask};

const LANE_COUNT: usize = 4;

/// 4 packed `f64` lanes in one AVX2 register.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct F64x4(pub(crate) __m256d);

/// Companion boolean batch of [`F64x4`].
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct Mask64x4(pub(crate) __m256d);

impl F64x4 {
    /// Builds a batch from 4 explicit lanes, lane 0 first.
    #[inline(always)]
    pub fn new(e0: f64, e1: f64, e2: f64, e3: f64) -> Self {
        Self(unsafe { _mm256_setr_pd(e0, e1, e2, e3) })
    }

    /// Wraps a raw register value.
    #[inline(always)]
    pub fn from_register(reg: __m256d) -> Self {
        Self(reg)
    }

    /// Unwraps to the raw register value.
    #[inline(always)]
    pub fn to_register(self) -> __m256d {
        self.0
    }
}

impl SimdBatch for F64x4 {
    type Scalar = f64;
    type Mask = Mask64x4;
    type Array = [f64; LANE_COUNT];

    const LANES: usize = LANE_COUNT;
    const ALIGN: usize = AVX_ALIGNMENT;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        Self(unsafe { _mm256_set1_pd(value) })
    }

    #[inline(always)]
    fn from_array(lanes: [f64; LANE_COUNT]) -> Self {
        unsafe { Self::load_unaligned(lanes.as_ptr()) }
    }

    #[inline(always)]
    fn to_array(self) -> [f64; LANE_COUNT] {
        let mut out = [0.0f64; LANE_COUNT];
        unsafe { _mm256_storeu_pd(out.as_mut_ptr(), self.0) };
        out
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        Self(_mm256_load_pd(ptr))
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f64) -> Self {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        Self(_mm256_loadu_pd(ptr))
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        _mm256_store_pd(ptr, self.0)
    }

    #[inline(always)]
    unsafe fn store_unaligned(self, ptr: *mut f64) {
        debug_assert!(!ptr.is_null(), "pointer must not be null");
        _mm256_storeu_pd(ptr, self.0)
    }

    #[inline(always)]
    fn extract(self, index: usize) -> f64 {
        self.to_array()[index & (LANE_COUNT - 1)]
    }

    #[inline(always)]
    fn andnot(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_andnot_pd(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_eq(self, rhs: Self) -> Mask64x4 {
        Mask64x4(unsafe { _mm256_cmp_pd::<_CMP_EQ_OQ>(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_ne(self, rhs: Self) -> Mask64x4 {
        Mask64x4(unsafe { _mm256_cmp_pd::<_CMP_NEQ_UQ>(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_lt(self, rhs: Self) -> Mask64x4 {
        Mask64x4(unsafe { _mm256_cmp_pd::<_CMP_LT_OQ>(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_le(self, rhs: Self) -> Mask64x4 {
        Mask64x4(unsafe { _mm256_cmp_pd::<_CMP_LE_OQ>(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_gt(self, rhs: Self) -> Mask64x4 {
        Mask64x4(unsafe { _mm256_cmp_pd::<_CMP_GT_OQ>(self.0, rhs.0) })
    }

    #[inline(always)]
    fn simd_ge(self, rhs: Self) -> Mask64x4 {
        Mask64x4(unsafe { _mm256_cmp_pd::<_CMP_GE_OQ>(self.0, rhs.0) })
    }

    #[inline(always)]
    fn select(cond: Mask64x4, a: Self, b: Self) -> Self {
        Self(unsafe { _mm256_blendv_pd(b.0, a.0, cond.0) })
    }

    /// `vminpd`: returns the second operand when either lane is NaN.
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_min_pd(self.0, rhs.0) })
    }

    /// `vmaxpd`: returns the second operand when either lane is NaN.
    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_max_pd(self.0, rhs.0) })
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self::splat(-0.0).andnot(self)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self(unsafe { _mm256_sqrt_pd(self.0) })
    }

    #[inline(always)]
    fn fma(self, y: Self, z: Self) -> Self {
        Self(unsafe { _mm256_fmadd_pd(self.0, y.0, z.0) })
    }

    #[inline(always)]
    fn fms(self, y: Self, z: Self) -> Self {
        Self(unsafe { _mm256_fmsub_pd(self.0, y.0, z.0) })
    }

    #[inline(always)]
    fn fnma(self, y: Self, z: Self) -> Self {
        Self(unsafe { _mm256_fnmadd_pd(self.0, y.0, z.0) })
    }

    #[inline(always)]
    fn fnms(self, y: Self, z: Self) -> Self {
        Self(unsafe { _mm256_fnmsub_pd(self.0, y.0, z.0) })
    }

    #[inline(always)]
    fn floor(self) -> Self {
        Self(unsafe { _mm256_floor_pd(self.0) })
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        Self(unsafe { _mm256_ceil_pd(self.0) })
    }

    #[inline(always)]
    fn round(self) -> Self {
        Self(unsafe {
            _mm256_round_pd::<{ _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC }>(self.0)
        })
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        Self(unsafe { _mm256_round_pd::<{ _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC }>(self.0) })
    }

    #[inline(always)]
    fn isnan(self) -> Mask64x4 {
        Mask64x4(unsafe { _mm256_cmp_pd::<_CMP_UNORD_Q>(self.0, self.0) })
    }

    #[inline(always)]
    fn hadd(self) -> f64 {
        unsafe {
            let crossed = _mm256_add_pd(self.0, _mm256_permute2f128_pd::<1>(self.0, self.0));
            let lo = _mm256_castpd256_pd128(crossed);
            let lo = _mm_add_sd(lo, _mm_unpackhi_pd(lo, lo));
            _mm_cvtsd_f64(lo)
        }
    }

    #[inline(always)]
    fn haddp(rows: &[Self]) -> Self {
        debug_assert!(rows.len() == LANE_COUNT, "haddp needs exactly {LANE_COUNT} rows");
        unsafe {
            let tmp0 = _mm256_hadd_pd(rows[0].0, rows[1].0);
            let tmp1 = _mm256_hadd_pd(rows[2].0, rows[3].0);
            let blended = _mm256_blend_pd::<0b1100>(tmp0, tmp1);
            let crossed = _mm256_permute2f128_pd::<0x21>(tmp0, tmp1);
            Self(_mm256_add_pd(blended, crossed))
        }
    }
}

impl SimdCvtLoad<i32> for F64x4 {
    /// Exact: every i32 is representable as f64.
    #[inline(always)]
    unsafe fn cvt_load_aligned(ptr: *const i32) -> Self {
        Self(_mm256_cvtepi32_pd(_mm_load_si128(ptr.cast())))
    }

    #[inline(always)]
    unsafe fn cvt_load_unaligned(ptr: *const i32) -> Self {
        Self(_mm256_cvtepi32_pd(_mm_loadu_si128(ptr.cast())))
    }
}

impl SimdCvtLoad<i64> for F64x4 {
    /// No packed i64 → f64 conversion below AVX-512; lanes convert
    /// through a stack temporary, rounding to nearest above 2⁵³.
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

impl SimdCvtLoad<f32> for F64x4 {
    /// Exact widening.
    #[inline(always)]
    unsafe fn cvt_load_aligned(ptr: *const f32) -> Self {
        Self(_mm256_cvtps_pd(_mm_load_ps(ptr)))
    }

    #[inline(always)]
    unsafe fn cvt_load_unaligned(ptr: *const f32) -> Self {
        Self(_mm256_cvtps_pd(_mm_loadu_ps(ptr)))
    }
}

impl SimdCvtStore<i32> for F64x4 {
    /// `vcvttpd2dq` truncates toward zero.
    #[inline(always)]
    unsafe fn cvt_store_aligned(self, ptr: *mut i32) {
        _mm_store_si128(ptr.cast(), _mm256_cvttpd_epi32(self.0))
    }

    #[inline(always)]
    unsafe fn cvt_store_unaligned(self, ptr: *mut i32) {
        _mm_storeu_si128(ptr.cast(), _mm256_cvttpd_epi32(self.0))
    }
}

impl SimdCvtStore<i64> for F64x4 {
    #[inline(always)]
    unsafe fn cvt_store_aligned(self, ptr: *mut i64) {
        <Self as SimdCvtStore<i64>>::cvt_store_unaligned(self, ptr)
    }

    /// Truncates toward zero through a stack temporary.
    #[inline(always)]
    unsafe fn cvt_store_unaligned(self, ptr: *mut i64) {
        let lanes = self.to_array();
        let dst = std::slice::from_raw_parts_mut(ptr, LANE_COUNT);
        for (out, &lane) in dst.iter_mut().zip(lanes.iter()) {
            *out = lane as i64;
        }
    }
}

impl SimdCvtStore<f32> for F64x4 {
    /// Narrows to nearest-representable `f32`.
    #[inline(always)]
    unsafe fn cvt_store_aligned(self, ptr: *mut f32) {
        _mm_store_ps(ptr, _mm256_cvtpd_ps(self.0))
    }

    #[inline(always)]
    unsafe fn cvt_store_unaligned(self, ptr: *mut f32) {
        _mm_storeu_ps(ptr, _mm256_cvtpd_ps(self.0))
    }
}

impl Add for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_add_pd(self.0, rhs.0) })
    }
}

impl Sub for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_sub_pd(self.0, rhs.0) })
    }
}

impl Mul for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_mul_pd(self.0, rhs.0) })
    }
}

impl Div for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_div_pd(self.0, rhs.0) })
    }
}

impl Neg for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self(unsafe { _mm256_sub_pd(_mm256_setzero_pd(), self.0) })
    }
}

impl BitAnd for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_and_pd(self.0, rhs.0) })
    }
}

impl BitOr for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_or_pd(self.0, rhs.0) })
    }
}

impl BitXor for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_xor_pd(self.0, rhs.0) })
    }
}

impl Not for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self(unsafe {
            _mm256_xor_pd(self.0, _mm256_castsi256_pd(_mm256_set1_epi64x(-1)))
        })
    }
}

impl Mask64x4 {
    /// Wraps a backend-native mask value (all-ones/all-zeros lanes).
    #[inline(always)]
    pub fn from_register(reg: __m256d) -> Self {
        Self(reg)
    }

    /// Unwraps to the backend-native mask value.
    #[inline(always)]
    pub fn to_register(self) -> __m256d {
        self.0
    }

    /// Builds a mask from 4 explicit booleans, lane 0 first.
    #[inline(always)]
    pub fn new(b0: bool, b1: bool, b2: bool, b3: bool) -> Self {
        Self::from_array([b0, b1, b2, b3])
    }

    #[inline(always)]
    fn bitmask(self) -> i32 {
        unsafe { _mm256_movemask_pd(self.0) }
    }
}

impl SimdMask for Mask64x4 {
    type BoolArray = [bool; LANE_COUNT];

    #[inline(always)]
    fn from_array(lanes: [bool; LANE_COUNT]) -> Self {
        let word = |b: bool| -(b as i64);
        Self(unsafe {
            _mm256_castsi256_pd(_mm256_setr_epi64x(
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
        Self(unsafe { _mm256_castsi256_pd(_mm256_set1_epi64x(-(value as i64))) })
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

impl BitAnd for Mask64x4 {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_and_pd(self.0, rhs.0) })
    }
}

impl BitOr for Mask64x4 {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_or_pd(self.0, rhs.0) })
    }
}

impl BitXor for Mask64x4 {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(unsafe { _mm256_xor_pd(self.0, rhs.0) })
    }
}

impl Not for Mask64x4 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self(unsafe {
            _mm256_xor_pd(self.0, _mm256_castsi256_pd(_mm256_set1_epi64x(-1)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: [f64; 4] = [1.0, 2.0, 3.0, 4.0];

    #[test]
    fn arithmetic_matches_scalar() {
        let a = F64x4::from_array(DATA);
        let b = F64x4::splat(0.5);
        assert_eq!((a + b).to_array(), [1.5, 2.5, 3.5, 4.5]);
        assert_eq!((a * b).to_array(), [0.5, 1.0, 1.5, 2.0]);
        assert_eq!((-a).to_array(), [-1.0, -2.0, -3.0, -4.0]);
    }

    #[test]
    fn compare_select_roundtrip() {
        let a = F64x4::new(1.0, 2.0, 3.0, 4.0);
        let mask = a.simd_le(F64x4::splat(2.0));
        assert_eq!(mask.to_array(), [true, true, false, false]);
        let out = F64x4::select(mask, a, F64x4::splat(0.0)).to_array();
        assert_eq!(out, [1.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn hadd_and_haddp() {
        assert_eq!(F64x4::from_array(DATA).hadd(), 10.0);
        let rows = [
            F64x4::new(1.0, 2.0, 3.0, 4.0),
            F64x4::new(10.0, 20.0, 30.0, 40.0),
            F64x4::new(0.5, 0.5, 0.5, 0.5),
            F64x4::new(-1.0, 1.0, -1.0, 1.0),
        ];
        assert_eq!(F64x4::haddp(&rows).to_array(), [10.0, 100.0, 2.0, 0.0]);
    }

    #[test]
    fn isnan_lane_accurate() {
        let x = F64x4::new(f64::NAN, 1.0, f64::INFINITY, -0.0);
        assert_eq!(x.isnan().to_array(), [true, false, false, false]);
    }

    #[test]
    fn converting_loads() {
        let ints = [-2i32, -1, 0, 3];
        let v = unsafe { <F64x4 as SimdCvtLoad<i32>>::cvt_load_unaligned(ints.as_ptr()) };
        assert_eq!(v.to_array(), [-2.0, -1.0, 0.0, 3.0]);

        let singles = [0.5f32, 1.5, 2.5, 3.5];
        let v = unsafe { <F64x4 as SimdCvtLoad<f32>>::cvt_load_unaligned(singles.as_ptr()) };
        assert_eq!(v.to_array(), [0.5, 1.5, 2.5, 3.5]);
    }

    #[test]
    fn truncating_integer_store() {
        let v = F64x4::new(2.9, -2.9, 0.4, -0.4);
        let mut dst = [0i32; 4];
        unsafe { <F64x4 as SimdCvtStore<i32>>::cvt_store_unaligned(v, dst.as_mut_ptr()) };
        assert_eq!(dst, [2, -2, 0, 0]);

        let mut wide = [0i64; 4];
        unsafe { <F64x4 as SimdCvtStore<i64>>::cvt_store_unaligned(v, wide.as_mut_ptr()) };
        assert_eq!(wide, [2, -2, 0, 0]);
    }
}
