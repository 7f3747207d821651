//! Properties of the fixed-point rounding unit.

use ola_golden::fixed::{fixed_point_round, Datapath, FixedPoint};
use proptest::prelude::*;

/// Reference rule written with exact floor division instead of shifts.
fn reference_round(value: i64, width: u32) -> i64 {
    let t = (value as i128).div_euclid(1i128 << (width - 2));
    let r = if t.rem_euclid(2) == 1 {
        // ceil(t / 2)
        -((-t).div_euclid(2))
    } else {
        t.div_euclid(2)
    };
    r as i64
}

/// Width together with a product of two signed words of that width.
fn width_and_product() -> impl Strategy<Value = (u32, i64)> {
    (2u32..=32).prop_flat_map(|w| {
        let bound = 1i64 << (2 * w - 2);
        (Just(w), -bound..=bound)
    })
}

/// Same as [`width_and_product`] but limited to products exact in `f64`.
fn exact_in_f64() -> impl Strategy<Value = (u32, i64)> {
    (2u32..=26).prop_flat_map(|w| {
        let bound = 1i64 << (2 * w - 2);
        (Just(w), -bound..=bound)
    })
}

proptest! {
    #[test]
    fn matches_floor_division_reference((width, value) in width_and_product()) {
        prop_assert_eq!(fixed_point_round(value, width), reference_round(value, width));
    }

    #[test]
    fn is_pure((width, value) in width_and_product()) {
        prop_assert_eq!(fixed_point_round(value, width), fixed_point_round(value, width));
    }

    #[test]
    fn result_is_within_half_lsb_rounding_of_exact_quotient((width, value) in exact_in_f64()) {
        let exact = value as f64 / (1u64 << (width - 1)) as f64;
        let r = fixed_point_round(value, width) as f64;
        prop_assert!(r - exact <= 0.5 && exact - r < 0.5);
    }

    #[test]
    fn sixteen_bit_datapath_keeps_samples_in_range(x in -32768i64..=32767, c in -32768i64..=32767) {
        let dp = FixedPoint::new(16).unwrap();
        let y = dp.mul_requantize(x, c);
        prop_assert!((-32768..=32768).contains(&y));
    }
}

/// Ties sit exactly on a multiple of 2^(W-2) with an odd quotient and always
/// round toward positive infinity, whatever the sign.
#[test]
fn ties_round_up_for_both_signs() {
    let half = 1i64 << 14;
    assert_eq!(fixed_point_round(half, 16), 1);
    assert_eq!(fixed_point_round(-half, 16), 0);
    assert_eq!(fixed_point_round(3 * half, 16), 2);
    assert_eq!(fixed_point_round(-3 * half, 16), -1);
}
