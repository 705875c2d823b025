//! Property-based tests for the vector kernel and curl estimator.
//!
//! Run with: cargo test -p leap_curl -- proptest

use leap_curl::curl::{finger_curl, junction_angle, CurlCalibration};
use leap_curl::frame::{Bone, Digit};
use leap_curl::vector::{angle_between, length, normalize, Vec3};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A joint position in a LeapMotion-sized box (mm).
fn arb_vec3() -> impl Strategy<Value = Vec3> {
    prop::array::uniform3(-500.0..500.0f32).prop_map(Vec3::from)
}

/// A vector with length well away from zero.
fn arb_nonzero_vec3() -> impl Strategy<Value = Vec3> {
    arb_vec3().prop_filter("needs length", |v| length(*v) > 1e-2)
}

/// Arbitrary bones; joints are not required to connect.
fn arb_digit() -> impl Strategy<Value = Digit> {
    prop::array::uniform4((arb_vec3(), arb_vec3()).prop_map(|(p, n)| Bone::new(p, n)))
        .prop_map(Digit::new)
}

// =============================================================================
// Vector kernel
// =============================================================================

proptest! {
    #[test]
    fn proptest_normalize_is_unit_or_zero(v in arb_vec3()) {
        let n = length(normalize(v));
        if length(v) == 0.0 {
            prop_assert_eq!(n, 0.0);
        } else {
            prop_assert!((n - 1.0).abs() < 1e-4, "length {}", n);
        }
    }

    #[test]
    fn proptest_angle_in_range(a in arb_vec3(), b in arb_vec3()) {
        let angle = angle_between(a, b);
        prop_assert!((0.0..=180.0).contains(&angle), "angle {}", angle);
    }

    #[test]
    fn proptest_angle_self_and_opposite(a in arb_nonzero_vec3()) {
        prop_assert!(angle_between(a, a) < 0.1);
        prop_assert!(angle_between(a, -a) > 179.9);
    }

    #[test]
    fn proptest_angle_symmetric(a in arb_vec3(), b in arb_vec3()) {
        prop_assert!((angle_between(a, b) - angle_between(b, a)).abs() < 1e-3);
    }
}

// =============================================================================
// Curl estimator
// =============================================================================

proptest! {
    #[test]
    fn proptest_curl_bounded(d in arb_digit()) {
        let c = finger_curl(&d);
        prop_assert!((0.0..=100.0).contains(&c), "curl {}", c);
    }

    #[test]
    fn proptest_curl_monotone_in_angle(a in 0.0..180.0f32, b in 0.0..180.0f32) {
        let cal = CurlCalibration::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(cal.curl_from_angle(lo) <= cal.curl_from_angle(hi));
    }

    #[test]
    fn proptest_curl_matches_angle_mapping(d in arb_digit()) {
        let expected = CurlCalibration::default().curl_from_angle(junction_angle(&d));
        prop_assert_eq!(finger_curl(&d), expected);
    }

    #[test]
    fn proptest_metacarpal_is_ignored(d in arb_digit(), m in (arb_vec3(), arb_vec3())) {
        let mut moved = d;
        moved.bones[0] = Bone::new(m.0, m.1);
        prop_assert_eq!(finger_curl(&d), finger_curl(&moved));
    }
}
