//! Per-frame curl reports and their console rendering.

use std::fmt;

use crate::frame::{FingerKind, HandType, Palm};

/// Curl of one finger, 0–100 %.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FingerCurl {
    pub finger:  FingerKind,
    pub percent: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HandReport {
    pub hand_type:      HandType,
    pub palm:           Palm,
    pub pinch_distance: f32,
    pub pinch_strength: f32,
    /// Index, middle, ring, pinky — in that order.
    pub curls:          [FingerCurl; 4],
}

impl HandReport {
    pub fn curl(&self, finger: FingerKind) -> Option<f32> {
        self.curls.iter().find(|c| c.finger == finger).map(|c| c.percent)
    }
}

/// All hands of one processed frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    /// Tracker frame id.
    pub frame_id: i64,
    /// Session-local frame number (1-based) at which the report was made.
    pub sequence: u64,
    pub hands:    Vec<HandReport>,
}

// ════════════════════════════════════════════════════════════════════════════
// Rendering
// ════════════════════════════════════════════════════════════════════════════

impl fmt::Display for HandReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.palm;
        writeln!(f, "Hand {}", self.hand_type.label())?;
        writeln!(f, "  Palm Position:    ({:.2}, {:.2}, {:.2})",
                 p.position.x, p.position.y, p.position.z)?;
        writeln!(f, "  Palm Orientation: ({:.2}, {:.2}, {:.2})",
                 p.orientation.x, p.orientation.y, p.orientation.z)?;
        writeln!(f, "  Palm Direction:   ({:.2}, {:.2}, {:.2})",
                 p.direction.x, p.direction.y, p.direction.z)?;
        writeln!(f, "  Pinch Distance:   {:.2}", self.pinch_distance)?;
        writeln!(f, "  Pinch Strength:   {:.2}", self.pinch_strength)?;
        for c in &self.curls {
            writeln!(f, "  {} Finger Curl:    {:.1}%", c.finger.name(), c.percent)?;
        }
        writeln!(f)
    }
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for hand in &self.hands {
            write!(f, "{}", hand)?;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
