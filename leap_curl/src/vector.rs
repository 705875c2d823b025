//! Minimal 3D vector kernel used by the curl estimator.
//!
//! Every operation is total: a zero-length vector normalizes to the zero
//! vector, and cosines are clamped to `[-1, 1]` before `acos`, so
//! [`angle_between`] is defined for any pair of finite inputs.

use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Vec3
// ════════════════════════════════════════════════════════════════════════════

/// A point or direction in tracking space (millimetres for LeapMotion).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }

    /// Componentwise scale.
    pub fn scale(self, k: f32) -> Vec3 {
        Vec3::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 { subtract(self, rhs) }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 { Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z) }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 { Vec3::new(-self.x, -self.y, -self.z) }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self { Vec3::new(x, y, z) }
}

// ════════════════════════════════════════════════════════════════════════════
// Free functions
// ════════════════════════════════════════════════════════════════════════════

/// Componentwise `a − b`.
#[inline]
pub fn subtract(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x - b.x, a.y - b.y, a.z - b.z)
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

/// Euclidean norm, never negative.
///
/// `hypot` avoids squaring, so components near the ends of the `f32` range
/// neither overflow to infinity nor underflow to zero.
#[inline]
pub fn length(v: Vec3) -> f32 {
    v.x.hypot(v.y).hypot(v.z)
}

/// Unit vector along `v`, or the zero vector when `v` has zero length.
pub fn normalize(v: Vec3) -> Vec3 {
    // Divide by the largest component first so the norm of the rescaled
    // vector is in [1, √3] even when `length(v)` would overflow.
    let m = v.x.abs().max(v.y.abs()).max(v.z.abs());
    if m == 0.0 {
        return Vec3::ZERO;
    }
    let s = Vec3::new(v.x / m, v.y / m, v.z / m);
    let len = length(s);
    Vec3::new(s.x / len, s.y / len, s.z / len)
}

/// Angle between `a` and `b` in degrees, in `[0, 180]`.
///
/// A zero vector normalizes to zero, giving a dot product of 0 and hence 90°.
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let d = dot(normalize(a), normalize(b)).clamp(-1.0, 1.0);
    d.acos().to_degrees()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
