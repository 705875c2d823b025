//! # leap_curl
//!
//! Per-finger curl percentages from LeapMotion hand-tracking frames.
//!
//! ## Pipeline
//!
//! | Stage | Module | Role |
//! |---|---|---|
//! | Frame source | [`source`] | Push [`frame::TrackingFrame`]s (hardware, replay, or simulation) |
//! | Session | [`session`] | Count frames, surface every Nth one as a report |
//! | Curl estimator | [`curl`] | Map each finger's bone geometry to 0–100 % |
//! | Vector kernel | [`vector`] | Total 3D primitives the estimator is built on |
//! | Report / sink | [`report`], [`sink`] | Render text, hand it to stdout or a reader process |
//!
//! The thumb (digit 0) is never reported; index, middle, ring and pinky are
//! processed in that order for every hand in the frame.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation / replay**: synthetic hands or a JSON-lines file.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ## Example
//!
//! ```
//! use leap_curl::curl::finger_curl;
//! use leap_curl::frame::Digit;
//! use leap_curl::vector::Vec3;
//!
//! // A straight finger along -z reads fully open.
//! let digit = Digit::from_joints([
//!     Vec3::new(0.0, 0.0, 0.0),
//!     Vec3::new(0.0, 0.0, -60.0),
//!     Vec3::new(0.0, 0.0, -100.0),
//!     Vec3::new(0.0, 0.0, -125.0),
//!     Vec3::new(0.0, 0.0, -143.0),
//! ]);
//! assert_eq!(finger_curl(&digit), 0.0);
//! ```

pub mod vector;
pub mod curl;
pub mod frame;
pub mod report;
pub mod session;
pub mod source;
pub mod sink;
pub mod config;
pub mod error;
pub mod app;

pub use curl::{finger_curl, CurlCalibration};
pub use error::CurlError;
pub use session::CurlSession;
