//! Finger curl estimation.
//!
//! # Algorithm
//!
//! Two junction vectors are built from a digit's bones:
//!
//! * `v1 = intermediate.next_joint − proximal.prev_joint`
//! * `v2 = distal.next_joint − intermediate.prev_joint`
//!
//! The angle between them is a proxy for total flexion across the two
//! inter-bone joints.  It is mapped linearly from `[open_angle,
//! closed_angle]` onto `[0, 100]` and clamped.  This is an empirical
//! heuristic, not a biomechanical model; the defaults (5° open, 65° fist)
//! were tuned by hand against a LeapMotion controller.

use crate::error::CurlError;
use crate::frame::{Digit, DISTAL, INTERMEDIATE, PROXIMAL};
use crate::vector::{angle_between, subtract, Vec3};

/// Junction angle, in degrees, of a fully open finger.
pub const OPEN_ANGLE_DEG:   f32 = 5.0;
/// Junction angle, in degrees, of a finger closed into a fist.
pub const CLOSED_ANGLE_DEG: f32 = 65.0;

// ════════════════════════════════════════════════════════════════════════════
// CurlCalibration
// ════════════════════════════════════════════════════════════════════════════

/// The two reference angles that anchor the 0 % and 100 % ends of the scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurlCalibration {
    open_angle:   f32,
    closed_angle: f32,
}

impl Default for CurlCalibration {
    fn default() -> Self {
        CurlCalibration { open_angle: OPEN_ANGLE_DEG, closed_angle: CLOSED_ANGLE_DEG }
    }
}

impl CurlCalibration {
    /// Both angles must be finite and `closed_angle > open_angle`.
    pub fn new(open_angle: f32, closed_angle: f32) -> Result<Self, CurlError> {
        if !open_angle.is_finite() || !closed_angle.is_finite() || closed_angle <= open_angle {
            return Err(CurlError::InvalidCalibration { open: open_angle, closed: closed_angle });
        }
        Ok(CurlCalibration { open_angle, closed_angle })
    }

    pub fn open_angle(&self)   -> f32 { self.open_angle }
    pub fn closed_angle(&self) -> f32 { self.closed_angle }

    /// Map a junction angle in degrees onto the clamped `[0, 100]` scale.
    pub fn curl_from_angle(&self, angle: f32) -> f32 {
        let normalized = (angle - self.open_angle) / (self.closed_angle - self.open_angle);
        // `clamp` passes NaN through; NaN only arises from NaN joints.
        let normalized = if normalized.is_nan() { 0.0 } else { normalized.clamp(0.0, 1.0) };
        normalized * 100.0
    }

    /// Curl percentage of one digit.
    pub fn finger_curl(&self, digit: &Digit) -> f32 {
        self.curl_from_angle(junction_angle(digit))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Junction geometry
// ════════════════════════════════════════════════════════════════════════════

/// The `(v1, v2)` junction vectors described in the module docs.
pub fn junction_vectors(digit: &Digit) -> (Vec3, Vec3) {
    let b = &digit.bones;
    let v1 = subtract(b[INTERMEDIATE].next_joint, b[PROXIMAL].prev_joint);
    let v2 = subtract(b[DISTAL].next_joint, b[INTERMEDIATE].prev_joint);
    (v1, v2)
}

/// Angle between the junction vectors, degrees in `[0, 180]`.
pub fn junction_angle(digit: &Digit) -> f32 {
    let (v1, v2) = junction_vectors(digit);
    angle_between(v1, v2)
}

/// Curl percentage using the default 5°/65° calibration.
pub fn finger_curl(digit: &Digit) -> f32 {
    CurlCalibration::default().finger_curl(digit)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
