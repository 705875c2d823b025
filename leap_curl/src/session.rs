//! Per-connection processing state.
//!
//! `CurlSession` owns the frame counter that throttles how often reports are
//! surfaced.  The curl math it calls is stateless; only the counter carries
//! over from one frame to the next.

use tracing::trace;

use crate::curl::CurlCalibration;
use crate::frame::{FingerKind, Hand, TrackingFrame};
use crate::report::{FingerCurl, FrameReport, HandReport};

/// Surface one frame in this many when no interval is configured.
pub const DEFAULT_PRINT_INTERVAL: u32 = 30;

pub struct CurlSession {
    frame_counter:  u64,
    print_interval: u32,
    calibration:    CurlCalibration,
}

impl Default for CurlSession {
    fn default() -> Self {
        CurlSession::new(DEFAULT_PRINT_INTERVAL, CurlCalibration::default())
    }
}

impl CurlSession {
    /// An interval of 0 is treated as 1 (report every frame).
    pub fn new(print_interval: u32, calibration: CurlCalibration) -> Self {
        CurlSession {
            frame_counter: 0,
            print_interval: print_interval.max(1),
            calibration,
        }
    }

    pub fn frames_seen(&self)    -> u64             { self.frame_counter }
    pub fn print_interval(&self) -> u32             { self.print_interval }
    pub fn calibration(&self)    -> CurlCalibration { self.calibration }

    /// Count `frame` and, on every `print_interval`-th frame, return its report.
    pub fn on_frame(&mut self, frame: &TrackingFrame) -> Option<FrameReport> {
        self.frame_counter += 1;
        if self.frame_counter % u64::from(self.print_interval) != 0 {
            return None;
        }
        trace!(frame_id = frame.id, sequence = self.frame_counter, "surfacing frame");
        Some(self.analyze(frame))
    }

    /// Compute the report for `frame` regardless of throttling.
    ///
    /// Does not advance the frame counter.
    pub fn analyze(&self, frame: &TrackingFrame) -> FrameReport {
        FrameReport {
            frame_id: frame.id,
            sequence: self.frame_counter,
            hands:    frame.hands.iter().map(|h| self.hand_report(h)).collect(),
        }
    }

    fn hand_report(&self, hand: &Hand) -> HandReport {
        let curls = FingerKind::CURLED.map(|finger| FingerCurl {
            finger,
            percent: self.calibration.finger_curl(hand.digit(finger)),
        });
        HandReport {
            hand_type:      hand.hand_type,
            palm:           hand.palm,
            pinch_distance: hand.pinch_distance,
            pinch_strength: hand.pinch_strength,
            curls,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Digit, HandType, Palm};
    use crate::vector::Vec3;
    use approx::assert_relative_eq;

    /// Straight finger along -z: every junction vector points the same way.
    fn straight() -> Digit {
        Digit::from_joints([
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -40.0),
            Vec3::new(0.0, 0.0, -80.0),
            Vec3::new(0.0, 0.0, -105.0),
            Vec3::new(0.0, 0.0, -125.0),
        ])
    }

    fn hand(hand_type: HandType, digits: [Digit; 5]) -> Hand {
        Hand {
            hand_type,
            palm: Palm::default(),
            pinch_distance: 10.0,
            pinch_strength: 0.5,
            digits,
        }
    }

    fn frame(id: i64, hands: Vec<Hand>) -> TrackingFrame {
        TrackingFrame { id, hands }
    }

    #[test]
    fn reports_every_nth_frame() {
        let mut s = CurlSession::new(3, CurlCalibration::default());
        let f = frame(0, vec![hand(HandType::Left, [straight(); 5])]);
        let surfaced: Vec<u64> = (0..9)
            .filter_map(|_| s.on_frame(&f))
            .map(|r| r.sequence)
            .collect();
        assert_eq!(surfaced, vec![3, 6, 9]);
        assert_eq!(s.frames_seen(), 9);
    }

    #[test]
    fn default_interval_is_thirty() {
        let mut s = CurlSession::default();
        let f = frame(0, vec![]);
        for _ in 0..29 { assert!(s.on_frame(&f).is_none()); }
        assert!(s.on_frame(&f).is_some());
    }

    #[test]
    fn zero_interval_reports_every_frame() {
        let cal = CurlCalibration::new(10.0, 40.0).unwrap();
        let mut s = CurlSession::new(0, cal);
        assert_eq!(s.print_interval(), 1);
        assert_eq!(s.calibration(), cal);
        assert!(s.on_frame(&frame(1, vec![])).is_some());
    }

    #[test]
    fn analyze_does_not_count() {
        let s = CurlSession::default();
        let r = s.analyze(&frame(77, vec![]));
        assert_eq!(r.frame_id, 77);
        assert_eq!(s.frames_seen(), 0);
    }

    #[test]
    fn thumb_is_ignored_and_order_fixed() {
        // Thumb is a degenerate all-zero digit that would read 100 %.
        let digits = [Digit::default(), straight(), straight(), straight(), Digit::default()];
        let s = CurlSession::default();
        let r = s.analyze(&frame(1, vec![hand(HandType::Right, digits)]));
        let h = &r.hands[0];
        let names: Vec<&str> = h.curls.iter().map(|c| c.finger.name()).collect();
        assert_eq!(names, ["Index", "Middle", "Ring", "Pinky"]);
        assert_relative_eq!(h.curls[0].percent, 0.0);
        assert_relative_eq!(h.curls[3].percent, 100.0);
    }

    #[test]
    fn hands_keep_frame_order_and_pass_through() {
        let f = frame(5, vec![
            hand(HandType::Right, [straight(); 5]),
            hand(HandType::Left,  [straight(); 5]),
        ]);
        let r = CurlSession::default().analyze(&f);
        assert_eq!(r.hands.len(), 2);
        assert_eq!(r.hands[0].hand_type, HandType::Right);
        assert_eq!(r.hands[1].hand_type, HandType::Left);
        assert_eq!(r.hands[1].pinch_distance, 10.0);
    }
}
