//! Errors raised by the I/O glue around the curl estimator.
//!
//! The geometry itself never fails; everything here comes from devices,
//! files, child processes or command-line input.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurlError {
    /// The tracking service or device could not be opened.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The frame source failed after it was opened.
    #[error("frame source error: {0}")]
    Source(String),

    /// A replay line is not a valid JSON `TrackingFrame`.
    #[error("replay line {line}: {source}")]
    Replay {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The output sink (e.g. a child reader process) failed.
    #[error("sink error: {0}")]
    Sink(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid calibration: open angle {open}° must be below closed angle {closed}°")]
    InvalidCalibration { open: f32, closed: f32 },
}

impl CurlError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        CurlError::InvalidArgument(msg.into())
    }
}
