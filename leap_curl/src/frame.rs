//! Tracking-frame data model.
//!
//! These types mirror what a LeapC tracking event carries for each hand,
//! reduced to the fields the curl pipeline reads or passes through.  They are
//! plain values: sources build them, the session reads them, nothing mutates
//! them afterwards.

use serde::{Deserialize, Serialize};

use crate::vector::Vec3;

// ════════════════════════════════════════════════════════════════════════════
// Handedness and finger naming
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandType { Left, Right }

impl HandType {
    pub fn label(self) -> &'static str {
        match self {
            HandType::Left  => "Left",
            HandType::Right => "Right",
        }
    }
}

/// The five digits of a hand, in LeapC order (thumb = 0).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FingerKind { Thumb, Index, Middle, Ring, Pinky }

impl FingerKind {
    /// Fingers that get a curl reading, in processing order.
    pub const CURLED: [FingerKind; 4] = [
        FingerKind::Index,
        FingerKind::Middle,
        FingerKind::Ring,
        FingerKind::Pinky,
    ];

    pub fn index(self) -> usize { self as usize }

    pub fn name(self) -> &'static str {
        match self {
            FingerKind::Thumb  => "Thumb",
            FingerKind::Index  => "Index",
            FingerKind::Middle => "Middle",
            FingerKind::Ring   => "Ring",
            FingerKind::Pinky  => "Pinky",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Skeleton
// ════════════════════════════════════════════════════════════════════════════

/// One rigid finger segment between two joints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    /// Joint closer to the wrist.
    pub prev_joint: Vec3,
    /// Joint closer to the fingertip.
    pub next_joint: Vec3,
}

impl Bone {
    pub fn new(prev_joint: Vec3, next_joint: Vec3) -> Self {
        Bone { prev_joint, next_joint }
    }
}

/// Index of each bone inside [`Digit::bones`].
pub const METACARPAL:   usize = 0;
pub const PROXIMAL:     usize = 1;
pub const INTERMEDIATE: usize = 2;
pub const DISTAL:       usize = 3;

/// Four bones, wrist to tip: metacarpal, proximal, intermediate, distal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Digit {
    pub bones: [Bone; 4],
}

impl Digit {
    pub fn new(bones: [Bone; 4]) -> Self { Digit { bones } }

    /// Build a digit from its five joint positions, wrist to tip.
    pub fn from_joints(joints: [Vec3; 5]) -> Self {
        Digit { bones: std::array::from_fn(|i| Bone::new(joints[i], joints[i + 1])) }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Palm and hand
// ════════════════════════════════════════════════════════════════════════════

/// Rotation quaternion as delivered by the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self { Quat { x: 0.0, y: 0.0, z: 0.0, w: 1.0 } }
}

/// Palm pose, passed through to reports unmodified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Palm {
    pub position:    Vec3,
    pub orientation: Quat,
    pub direction:   Vec3,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub hand_type: HandType,
    pub palm:      Palm,
    /// Thumb-to-index distance in mm (tracker-computed).
    pub pinch_distance: f32,
    /// 0.0–1.0 (tracker-computed).
    pub pinch_strength: f32,
    /// Thumb, index, middle, ring, pinky.
    pub digits: [Digit; 5],
}

impl Hand {
    pub fn digit(&self, finger: FingerKind) -> &Digit {
        &self.digits[finger.index()]
    }
}

/// Everything the tracker reported for one instant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingFrame {
    /// Tracker-assigned frame id; sources without one count from 0.
    #[serde(default)]
    pub id:    i64,
    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl TrackingFrame {
    pub fn hand_count(&self) -> usize { self.hands.len() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curled_fingers_skip_thumb_in_order() {
        let idx: Vec<usize> = FingerKind::CURLED.iter().map(|f| f.index()).collect();
        assert_eq!(idx, vec![1, 2, 3, 4]);
        assert_eq!(FingerKind::Pinky.name(), "Pinky");
    }

    #[test]
    fn hand_labels() {
        assert_eq!(HandType::Left.label(), "Left");
        assert_eq!(HandType::Right.label(), "Right");
    }

    #[test]
    fn digit_from_joints_chains_bones() {
        let j = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::new(0.0, 4.0, 0.0),
        ];
        let d = Digit::from_joints(j);
        assert_eq!(d.bones[METACARPAL].prev_joint, j[0]);
        assert_eq!(d.bones[DISTAL].next_joint, j[4]);
        for w in d.bones.windows(2) {
            assert_eq!(w[0].next_joint, w[1].prev_joint);
        }
    }

    #[test]
    fn frame_json_defaults_missing_fields() {
        let f: TrackingFrame = serde_json::from_str("{}").unwrap();
        assert_eq!(f.id, 0);
        assert_eq!(f.hand_count(), 0);
    }
}
