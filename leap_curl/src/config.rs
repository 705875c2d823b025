//! Application configuration and command-line parsing.

use std::path::PathBuf;

use crate::curl::{CurlCalibration, CLOSED_ANGLE_DEG, OPEN_ANGLE_DEG};
use crate::error::CurlError;
use crate::session::DEFAULT_PRINT_INTERVAL;

/// Where frames come from.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceKind {
    /// Synthetic hands; `fps = 0` runs unthrottled.
    Sim { frames: u64, period: u32, fps: u32 },
    /// JSON-lines file of recorded frames.
    Replay(PathBuf),
    /// Live LeapMotion controller (needs the `leap` feature).
    Leap,
}

impl SourceKind {
    pub fn default_sim() -> Self {
        SourceKind::Sim { frames: 600, period: 120, fps: 60 }
    }
}

impl Default for SourceKind {
    fn default() -> Self {
        if cfg!(feature = "leap") { SourceKind::Leap } else { SourceKind::default_sim() }
    }
}

/// Where rendered reports go.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SinkKind {
    #[default]
    Stdout,
    /// Reader program and its arguments, fed through stdin.
    Process(Vec<String>),
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Surface one frame in this many.
    pub print_interval: u32,
    pub calibration:    CurlCalibration,
    pub source:         SourceKind,
    pub sink:           SinkKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            print_interval: DEFAULT_PRINT_INTERVAL,
            calibration:    CurlCalibration::default(),
            source:         SourceKind::default(),
            sink:           SinkKind::default(),
        }
    }
}

pub const USAGE: &str = "\
usage: leap_curl [OPTIONS]

  --interval N        report every Nth frame (default 30)
  --open DEG          junction angle of an open finger (default 5)
  --closed DEG        junction angle of a closed fist (default 65)
  --sim [FRAMES]      synthetic hands (default source without `leap`)
  --period N          frames per simulated open/close cycle (default 120)
  --fps N             simulated frame rate, 0 = unthrottled (default 60)
  --replay PATH       replay JSON-lines frames from PATH
  --leap              live LeapMotion controller (default with `leap`)
  --pipe PROG [ARGS]  feed reports to PROG's stdin (consumes the rest)
  -h, --help          show this help";

impl AppConfig {
    /// Parse program arguments (without the program name).
    ///
    /// Returns `Ok(None)` when help was requested.
    pub fn from_args<I, S>(args: I) -> Result<Option<Self>, CurlError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut cfg = AppConfig::default();
        let mut open   = OPEN_ANGLE_DEG;
        let mut closed = CLOSED_ANGLE_DEG;
        let mut sim_frames: Option<u64> = None;
        let mut period: Option<u32> = None;
        let mut fps:    Option<u32> = None;
        let mut source_flag: Option<SourceKind> = None;

        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();
            i += 1;
            match arg {
                "-h" | "--help" => return Ok(None),
                "--interval" => {
                    cfg.print_interval = parse_value(arg, args.get(i))?;
                    if cfg.print_interval == 0 {
                        return Err(CurlError::invalid_argument("--interval must be at least 1"));
                    }
                    i += 1;
                }
                "--open"   => { open   = parse_value(arg, args.get(i))?; i += 1; }
                "--closed" => { closed = parse_value(arg, args.get(i))?; i += 1; }
                "--period" => { period = Some(parse_value(arg, args.get(i))?); i += 1; }
                "--fps"    => { fps    = Some(parse_value(arg, args.get(i))?); i += 1; }
                "--sim" => {
                    // Optional frame count.
                    if let Some(n) = args.get(i).and_then(|s| s.parse::<u64>().ok()) {
                        sim_frames = Some(n);
                        i += 1;
                    }
                    source_flag = Some(SourceKind::default_sim());
                }
                "--replay" => {
                    let path = args.get(i)
                        .ok_or_else(|| CurlError::invalid_argument("--replay needs a path"))?;
                    source_flag = Some(SourceKind::Replay(PathBuf::from(path)));
                    i += 1;
                }
                "--leap" => source_flag = Some(SourceKind::Leap),
                "--pipe" => {
                    let rest = args[i..].to_vec();
                    if rest.is_empty() {
                        return Err(CurlError::invalid_argument("--pipe needs a program"));
                    }
                    cfg.sink = SinkKind::Process(rest);
                    break;
                }
                other => {
                    return Err(CurlError::invalid_argument(format!("unknown option `{}`", other)));
                }
            }
        }

        cfg.calibration = CurlCalibration::new(open, closed)?;
        if let Some(source) = source_flag {
            cfg.source = source;
        }
        if let SourceKind::Sim { frames, period: p, fps: f } = &mut cfg.source {
            if let Some(n) = sim_frames { *frames = n; }
            if let Some(n) = period {
                if n == 0 {
                    return Err(CurlError::invalid_argument("--period must be at least 1"));
                }
                *p = n;
            }
            if let Some(n) = fps { *f = n; }
        }
        Ok(Some(cfg))
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, CurlError> {
    let raw = value.ok_or_else(|| CurlError::invalid_argument(format!("{} needs a value", flag)))?;
    raw.parse().map_err(|_| CurlError::invalid_argument(format!("{}: cannot parse `{}`", flag, raw)))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
