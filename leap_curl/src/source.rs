//! Frame sources — LeapMotion hardware, replay files, and a synthetic hand.
//!
//! Every source pushes [`TrackingFrame`]s into a caller-supplied handler on
//! the calling thread, one at a time and in arrival order.  The handler's
//! [`ControlFlow`] return value lets the consumer stop the source early.

use std::f32::consts::TAU;
use std::io::BufRead;
use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::CurlError;
use crate::frame::{Digit, Hand, HandType, Palm, Quat, TrackingFrame};
use crate::vector::Vec3;

// ════════════════════════════════════════════════════════════════════════════
// FrameSource trait — unified interface for hw, replay and sim
// ════════════════════════════════════════════════════════════════════════════

/// Callback invoked once per delivered frame.
pub type FrameHandler<'a> = dyn FnMut(&TrackingFrame) -> ControlFlow<()> + 'a;

/// Anything that can deliver [`TrackingFrame`]s.
///
/// `run` returns when the source is exhausted, when the handler breaks, or
/// on the first error.
pub trait FrameSource {
    fn run(&mut self, on_frame: &mut FrameHandler<'_>) -> Result<(), CurlError>;
}

// ════════════════════════════════════════════════════════════════════════════
// SimFrameSource — synthetic two-hand sequence (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Largest per-joint flexion the simulated fingers reach, in degrees.
pub const SIM_MAX_FLEX_DEG: f32 = 70.0;

/// Bone lengths in mm (metacarpal, proximal, intermediate, distal), thumb first.
const BONE_LENGTHS: [[f32; 4]; 5] = [
    [ 0.0, 46.0, 32.0, 26.0],
    [68.0, 40.0, 25.0, 18.0],
    [65.0, 45.0, 28.0, 20.0],
    [60.0, 42.0, 27.0, 19.0],
    [55.0, 32.0, 20.0, 17.0],
];

/// Lateral offset of each metacarpal base from the palm centre, right hand.
const FINGER_SPREAD_MM: [f32; 5] = [-35.0, -22.0, -4.0, 14.0, 30.0];

/// A deterministic pair of hands whose fingers open and close in a wave.
///
/// Each non-thumb finger follows `c = ½ − ½·cos(2π(t/period + φ))` with a
/// small per-finger phase `φ`, and every joint of the finger flexes by
/// `c · SIM_MAX_FLEX_DEG`.
pub struct SimFrameSource {
    pub frames:      u64,
    /// Frames per open→closed→open cycle.
    pub period:      u32,
    /// Pause between frames; `None` runs as fast as the handler allows.
    pub frame_delay: Option<Duration>,
}

impl SimFrameSource {
    pub fn new(frames: u64, period: u32) -> Self {
        SimFrameSource { frames, period: period.max(1), frame_delay: None }
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.frame_delay = (fps > 0).then(|| Duration::from_secs_f64(1.0 / f64::from(fps)));
        self
    }

    /// The frame this source emits at step `t`.
    pub fn frame_at(&self, t: u64) -> TrackingFrame {
        let phase = (t % u64::from(self.period)) as f32 / self.period as f32;
        TrackingFrame {
            id:    t as i64,
            hands: vec![
                sim_hand(HandType::Left,  phase),
                sim_hand(HandType::Right, phase + 0.5),
            ],
        }
    }
}

impl FrameSource for SimFrameSource {
    fn run(&mut self, on_frame: &mut FrameHandler<'_>) -> Result<(), CurlError> {
        info!(frames = self.frames, period = self.period, "simulated hands started");
        for t in 0..self.frames {
            if on_frame(&self.frame_at(t)).is_break() {
                debug!(t, "simulation stopped by consumer");
                break;
            }
            if let Some(delay) = self.frame_delay {
                thread::sleep(delay);
            }
        }
        Ok(())
    }
}

fn sim_hand(hand_type: HandType, phase: f32) -> Hand {
    let side = match hand_type { HandType::Left => -1.0, HandType::Right => 1.0 };
    let palm_pos = Vec3::new(side * 120.0, 200.0, 0.0);

    let mut digits = [Digit::default(); 5];
    let mut index_curl = 0.0;
    for (f, digit) in digits.iter_mut().enumerate() {
        // Thumb is held still; only the four curled fingers move.
        let c = if f == 0 {
            0.0
        } else {
            0.5 - 0.5 * (TAU * (phase + 0.1 * f as f32)).cos()
        };
        if f == 1 { index_curl = c; }
        let base = palm_pos + Vec3::new(side * FINGER_SPREAD_MM[f], 0.0, 40.0);
        *digit = synthetic_digit(base, BONE_LENGTHS[f], c * SIM_MAX_FLEX_DEG);
    }

    Hand {
        hand_type,
        palm: Palm {
            position:    palm_pos,
            orientation: Quat::default(),
            direction:   Vec3::new(0.0, 0.0, -1.0),
        },
        pinch_distance: 10.0 + 60.0 * (1.0 - index_curl),
        pinch_strength: index_curl,
        digits,
    }
}

/// A planar finger starting at `base` and pointing along −z, with each of
/// its three finger joints flexed by `flex_deg` toward −y.
pub fn synthetic_digit(base: Vec3, lengths: [f32; 4], flex_deg: f32) -> Digit {
    let mut joints = [base; 5];
    let mut heading = 0.0_f32;
    for (i, &len) in lengths.iter().enumerate() {
        if i > 0 {
            heading += flex_deg.to_radians();
        }
        let dir = Vec3::new(0.0, -heading.sin(), -heading.cos());
        joints[i + 1] = joints[i] + dir.scale(len);
    }
    Digit::from_joints(joints)
}

// ════════════════════════════════════════════════════════════════════════════
// ReplayFrameSource — JSON lines, one TrackingFrame per line
// ════════════════════════════════════════════════════════════════════════════

pub struct ReplayFrameSource<R> {
    reader: R,
}

impl<R: BufRead> ReplayFrameSource<R> {
    pub fn new(reader: R) -> Self {
        ReplayFrameSource { reader }
    }
}

impl<R: BufRead> FrameSource for ReplayFrameSource<R> {
    fn run(&mut self, on_frame: &mut FrameHandler<'_>) -> Result<(), CurlError> {
        let mut delivered = 0usize;
        for (i, line) in (&mut self.reader).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            let frame: TrackingFrame = serde_json::from_str(&line)
                .map_err(|source| CurlError::Replay { line: i + 1, source })?;
            delivered += 1;
            if on_frame(&frame).is_break() { break; }
        }
        debug!(delivered, "replay finished");
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapFrameSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Frame source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Polls on the calling thread until `stop` is set or the handler breaks.
#[cfg(feature = "leap")]
pub struct LeapFrameSource {
    pub stop:            std::sync::Arc<std::sync::atomic::AtomicBool>,
    pub poll_timeout_ms: u32,
}

#[cfg(feature = "leap")]
impl FrameSource for LeapFrameSource {
    fn run(&mut self, on_frame: &mut FrameHandler<'_>) -> Result<(), CurlError> {
        use std::sync::atomic::Ordering;
        use leaprs::*;

        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| CurlError::Connection(format!("create: {:?}", e)))?;
        connection.open()
            .map_err(|e| CurlError::Connection(format!("open: {:?}", e)))?;

        while !self.stop.load(Ordering::Relaxed) {
            let msg = match connection.poll(self.poll_timeout_ms) {
                Ok(m)  => m,
                Err(e) => {
                    // Timeouts are routine while no hand is in view.
                    tracing::trace!(error = ?e, "poll returned no message");
                    continue;
                }
            };

            match msg.event() {
                EventRef::Connection(_)     => info!("Connected."),
                EventRef::ConnectionLost(_) => tracing::warn!("Connection to tracking service lost."),
                EventRef::Device(_)         => info!("Found device."),
                EventRef::Tracking(frame)   => {
                    let converted = TrackingFrame {
                        id:    frame.tracking_frame_id,
                        hands: frame.hands().iter().map(convert_hand).collect(),
                    };
                    if on_frame(&converted).is_break() { break; }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(feature = "leap")]
fn convert_hand(hand: &leaprs::HandRef) -> Hand {
    use crate::frame::Bone;

    fn v(p: leaprs::LeapVectorRef) -> Vec3 { Vec3::new(p.x, p.y, p.z) }

    let palm = hand.palm();
    let q = palm.orientation();
    let mut digits = [Digit::default(); 5];
    for (slot, digit) in digits.iter_mut().zip(hand.digits().iter()) {
        let bones = [digit.metacarpal(), digit.proximal(), digit.intermediate(), digit.distal()];
        *slot = Digit::new(bones.map(|b| Bone::new(v(b.prev_joint()), v(b.next_joint()))));
    }

    Hand {
        hand_type: match hand.hand_type() {
            leaprs::HandType::Left  => HandType::Left,
            leaprs::HandType::Right => HandType::Right,
        },
        palm: Palm {
            position:    v(palm.position()),
            orientation: Quat { x: q.x, y: q.y, z: q.z, w: q.w },
            direction:   v(palm.direction()),
        },
        pinch_distance: hand.pinch_distance,
        pinch_strength: hand.pinch_strength,
        digits,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curl::finger_curl;
    use crate::frame::FingerKind;
    use approx::assert_relative_eq;
    use std::io::Cursor;

    fn collect(source: &mut dyn FrameSource) -> Result<Vec<TrackingFrame>, CurlError> {
        let mut out = Vec::new();
        source.run(&mut |f: &TrackingFrame| {
            out.push(f.clone());
            ControlFlow::Continue(())
        })?;
        Ok(out)
    }

    #[test]
    fn synthetic_digit_open_reads_zero() {
        let d = synthetic_digit(Vec3::ZERO, BONE_LENGTHS[2], 0.0);
        assert_eq!(finger_curl(&d), 0.0);
        assert_relative_eq!(d.bones[3].next_joint.z, -158.0, epsilon = 1e-3);
    }

    #[test]
    fn synthetic_digit_curl_grows_with_flex() {
        let curls: Vec<f32> = [0.0, 15.0, 30.0, 45.0, SIM_MAX_FLEX_DEG]
            .iter()
            .map(|&flex| finger_curl(&synthetic_digit(Vec3::ZERO, BONE_LENGTHS[1], flex)))
            .collect();
        for w in curls.windows(2) {
            assert!(w[1] > w[0], "curl should increase: {:?}", curls);
        }
        assert_relative_eq!(curls[4], 100.0);
    }

    #[test]
    fn sim_emits_requested_frames_in_order() {
        let frames = collect(&mut SimFrameSource::new(12, 6)).unwrap();
        assert_eq!(frames.len(), 12);
        let ids: Vec<i64> = frames.iter().map(|f| f.id).collect();
        assert_eq!(ids, (0..12).collect::<Vec<_>>());
        assert_eq!(frames[0].hand_count(), 2);
        assert_eq!(frames[0].hands[0].hand_type, HandType::Left);
    }

    #[test]
    fn sim_is_periodic() {
        let sim = SimFrameSource::new(0, 40);
        assert_eq!(sim.frame_at(3).hands, sim.frame_at(43).hands);
    }

    #[test]
    fn sim_stops_on_break() {
        let mut sim = SimFrameSource::new(1_000, 10);
        let mut seen = 0;
        sim.run(&mut |_: &TrackingFrame| {
            seen += 1;
            if seen == 5 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        }).unwrap();
        assert_eq!(seen, 5);
    }

    #[test]
    fn sim_thumb_stays_open() {
        let sim = SimFrameSource::new(0, 10);
        for t in 0..10 {
            let f = sim.frame_at(t);
            assert_eq!(finger_curl(f.hands[1].digit(FingerKind::Thumb)), 0.0);
        }
    }

    #[cfg(feature = "leap")]
    #[test]
    fn leap_source_stops_when_flag_is_set() {
        use std::sync::atomic::AtomicBool;
        use std::sync::Arc;

        let mut source: Box<dyn FrameSource> = Box::new(LeapFrameSource {
            stop:            Arc::new(AtomicBool::new(true)),
            poll_timeout_ms: 0,
        });
        let mut frames = 0;
        let result = source.run(&mut |_: &TrackingFrame| {
            frames += 1;
            ControlFlow::Continue(())
        });
        // Without a tracking service the connection may fail to open.
        assert!(matches!(result, Ok(()) | Err(CurlError::Connection(_))), "{:?}", result);
        assert_eq!(frames, 0);
    }

    #[test]
    fn replay_reads_lines_and_skips_blanks() {
        let a = serde_json::to_string(&TrackingFrame { id: 1, hands: vec![] }).unwrap();
        let sim = SimFrameSource::new(0, 10);
        let b = serde_json::to_string(&sim.frame_at(2)).unwrap();
        let text = format!("{}\n\n{}\n", a, b);
        let frames = collect(&mut ReplayFrameSource::new(Cursor::new(text))).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1], sim.frame_at(2));
    }

    #[test]
    fn replay_reports_bad_line_number() {
        let text = "{\"id\": 1}\n\n{not json\n";
        let err = collect(&mut ReplayFrameSource::new(Cursor::new(text))).unwrap_err();
        assert!(matches!(err, CurlError::Replay { line: 3, .. }), "got {:?}", err);
    }
}
