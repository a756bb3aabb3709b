//! Converting load/store contracts: numeric conversion per lane (never a
//! bit reinterpretation), truncation toward zero for float → integer
//! narrowing, the explicit rounding mode of the i32 → f32 path, and
//! monotonicity of lossy conversions.

use lanewise::simd::{
    F32s, F64s, RoundMode, SimdBatch, SimdCvtLoad, SimdCvtLoadI32, SimdCvtStore,
};

#[test]
fn i32_load_is_numeric_not_bitcast() {
    let src: Vec<i32> = (0..F32s::LANES as i32).map(|i| i * 3 - 4).collect();
    let v = unsafe { F32s::cvt_load_i32_unaligned(src.as_ptr(), RoundMode::Nearest) };
    for (i, &s) in src.iter().enumerate() {
        assert_eq!(v.extract(i), s as f32);
        // a bit reinterpretation would produce denormals/garbage here
        assert_ne!(v.extract(i).to_bits(), s as u32, "lane {i} looks bitcast");
    }
}

#[test]
fn i32_load_above_2_pow_24_is_the_known_precision_edge() {
    // f32 cannot represent odd integers above 2^24; the conversion rounds
    // to nearest there. This is the documented precision caveat behind
    // the explicit RoundMode parameter.
    let src: Vec<i32> = (0..F32s::LANES as i32)
        .map(|i| (1 << 24) + 2 * i + 1)
        .collect();
    let v = unsafe { F32s::cvt_load_i32_unaligned(src.as_ptr(), RoundMode::Nearest) };
    for (i, &s) in src.iter().enumerate() {
        let got = v.extract(i);
        assert_eq!(got, s as f32, "must match round-to-nearest");
        assert!(
            (f64::from(got) - f64::from(s)).abs() <= 1.0,
            "inexact by at most one integer step"
        );
    }
}

#[test]
fn f32_to_i32_store_truncates_toward_zero() {
    let mut lanes = vec![0.0f32; F32s::LANES];
    let pattern = [1.9f32, -1.9, 0.7, -0.7];
    for (i, lane) in lanes.iter_mut().enumerate() {
        *lane = pattern[i % pattern.len()];
    }
    let v = F32s::from_slice(&lanes);
    let mut dst = vec![0i32; F32s::LANES];
    unsafe { <F32s as SimdCvtStore<i32>>::cvt_store_unaligned(v, dst.as_mut_ptr()) };
    for i in 0..F32s::LANES {
        assert_eq!(dst[i], lanes[i] as i32, "trunc-toward-zero at lane {i}");
    }
}

#[test]
fn f64_to_f32_narrowing_roundtrip_is_monotonic() {
    let src: Vec<f64> = (0..64).map(|i| (i as f64 - 32.0) * 0.3333333333333).collect();
    for chunk in src.chunks(F32s::LANES) {
        if chunk.len() < F32s::LANES {
            break;
        }
        let v = unsafe { <F32s as SimdCvtLoad<f64>>::cvt_load_unaligned(chunk.as_ptr()) };
        let mut prev = f32::NEG_INFINITY;
        for (i, &s) in chunk.iter().enumerate() {
            let got = v.extract(i);
            assert_eq!(got, s as f32, "nearest-representable narrowing");
            assert!(got >= prev, "monotonicity violated at lane {i}");
            prev = got;
        }
    }
}

#[test]
fn i64_to_f32_load_converts_per_lane() {
    let src: Vec<i64> = (0..F32s::LANES as i64).map(|i| (i - 3) << 20).collect();
    let v = unsafe { <F32s as SimdCvtLoad<i64>>::cvt_load_unaligned(src.as_ptr()) };
    for (i, &s) in src.iter().enumerate() {
        assert_eq!(v.extract(i), s as f32);
    }
}

#[test]
fn f32_to_i64_store_truncates() {
    let mut lanes = vec![0.0f32; F32s::LANES];
    lanes[0] = 123456.78;
    lanes[1] = -123456.78;
    let v = F32s::from_slice(&lanes);
    let mut dst = vec![0i64; F32s::LANES];
    unsafe { <F32s as SimdCvtStore<i64>>::cvt_store_unaligned(v, dst.as_mut_ptr()) };
    assert_eq!(dst[0], 123456);
    assert_eq!(dst[1], -123456);
}

#[test]
fn f64_batch_conversions() {
    // i32 → f64 is exact
    let ints: Vec<i32> = (0..F64s::LANES as i32).map(|i| i32::MAX - i).collect();
    let v = unsafe { <F64s as SimdCvtLoad<i32>>::cvt_load_unaligned(ints.as_ptr()) };
    for (i, &s) in ints.iter().enumerate() {
        assert_eq!(v.extract(i), f64::from(s), "i32→f64 must be exact");
    }

    // f32 → f64 is exact
    let singles: Vec<f32> = (0..F64s::LANES).map(|i| 0.1f32 * i as f32).collect();
    let v = unsafe { <F64s as SimdCvtLoad<f32>>::cvt_load_unaligned(singles.as_ptr()) };
    for (i, &s) in singles.iter().enumerate() {
        assert_eq!(v.extract(i), f64::from(s), "f32→f64 must be exact");
    }

    // f64 → i32 truncates toward zero
    let lanes: Vec<f64> = (0..F64s::LANES)
        .map(|i| if i % 2 == 0 { 9.99 } else { -9.99 })
        .collect();
    let v = F64s::from_slice(&lanes);
    let mut dst = vec![0i32; F64s::LANES];
    unsafe { <F64s as SimdCvtStore<i32>>::cvt_store_unaligned(v, dst.as_mut_ptr()) };
    for (i, &want) in lanes.iter().enumerate() {
        assert_eq!(dst[i], want as i32);
    }
}

#[test]
fn round_mode_is_explicit_and_modes_agree_in_default_env() {
    // In the default floating-point environment both modes round to
    // nearest; the parameter exists so the choice is caller-visible.
    let src: Vec<i32> = (0..F32s::LANES as i32).map(|i| (1 << 25) + i).collect();
    let near = unsafe { F32s::cvt_load_i32_unaligned(src.as_ptr(), RoundMode::Nearest) };
    let cur = unsafe { F32s::cvt_load_i32_unaligned(src.as_ptr(), RoundMode::Current) };
    for i in 0..F32s::LANES {
        assert_eq!(near.extract(i), cur.extract(i));
    }
}

#[test]
fn aligned_converting_roundtrip() {
    let layout = std::alloc::Layout::from_size_align(
        F32s::LANES * std::mem::size_of::<i32>(),
        F32s::ALIGN,
    )
    .unwrap();
    let ptr = unsafe { std::alloc::alloc(layout) as *mut i32 };
    assert!(!ptr.is_null());

    unsafe {
        for i in 0..F32s::LANES {
            ptr.add(i).write(i as i32 * 7 - 11);
        }
        let v = F32s::cvt_load_i32_aligned(ptr, RoundMode::Nearest);
        let mut back = vec![0i32; F32s::LANES];
        <F32s as SimdCvtStore<i32>>::cvt_store_unaligned(v, back.as_mut_ptr());
        for (i, &b) in back.iter().enumerate() {
            assert_eq!(b, i as i32 * 7 - 11, "exact i32 roundtrip below 2^24");
        }
        std::alloc::dealloc(ptr as *mut u8, layout);
    }
}
