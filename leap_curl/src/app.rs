//! Top-level wiring: source → session → sink.
//!
//! [`run`] builds the three pieces from an [`AppConfig`]; [`drive`] is the
//! loop itself and works on any source and sink, which is what the tests use.

use std::fs::File;
use std::io::BufReader;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use crate::config::{AppConfig, SinkKind, SourceKind};
use crate::error::CurlError;
use crate::frame::TrackingFrame;
use crate::session::CurlSession;
use crate::sink::{stdout_sink, ProcessSink, ReportSink};
use crate::source::{FrameSource, ReplayFrameSource, SimFrameSource};

/// What a finished run saw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames:  u64,
    pub reports: u64,
}

// ════════════════════════════════════════════════════════════════════════════
// drive() — the frame loop
// ════════════════════════════════════════════════════════════════════════════

/// Feed every frame from `source` through `session`, writing surfaced reports
/// to `sink`, until the source ends, `stop` is set, or a sink write fails.
///
/// The sink is always finished, even when the loop ends in an error; the
/// first error wins.
pub fn drive(
    source:  &mut dyn FrameSource,
    session: &mut CurlSession,
    sink:    Box<dyn ReportSink>,
    stop:    &AtomicBool,
) -> Result<RunSummary, CurlError> {
    let mut sink = sink;
    let mut reports = 0u64;
    let mut sink_error: Option<CurlError> = None;

    let result = source.run(&mut |frame: &TrackingFrame| {
        if stop.load(Ordering::Relaxed) {
            return ControlFlow::Break(());
        }
        if let Some(report) = session.on_frame(frame) {
            if let Err(e) = sink.write_report(&report) {
                sink_error = Some(e);
                return ControlFlow::Break(());
            }
            reports += 1;
        }
        ControlFlow::Continue(())
    });

    let finished = sink.finish();
    let summary = RunSummary { frames: session.frames_seen(), reports };

    result?;
    if let Some(e) = sink_error {
        return Err(e);
    }
    finished?;
    Ok(summary)
}

// ════════════════════════════════════════════════════════════════════════════
// run() — build everything from config
// ════════════════════════════════════════════════════════════════════════════

/// Run the application described by `cfg` until its source ends or `stop`
/// is set.
pub fn run(cfg: AppConfig, stop: Arc<AtomicBool>) -> Result<RunSummary, CurlError> {
    let mut source = open_source(&cfg.source, &stop)?;
    let sink: Box<dyn ReportSink> = match &cfg.sink {
        SinkKind::Stdout           => Box::new(stdout_sink()),
        SinkKind::Process(command) => Box::new(ProcessSink::spawn(command)?),
    };
    let mut session = CurlSession::new(cfg.print_interval, cfg.calibration);

    info!(
        interval = cfg.print_interval,
        open = cfg.calibration.open_angle(),
        closed = cfg.calibration.closed_angle(),
        "curl session started"
    );

    let summary = drive(source.as_mut(), &mut session, sink, &stop)?;
    info!(frames = summary.frames, reports = summary.reports, "curl session finished");
    Ok(summary)
}

fn open_source(kind: &SourceKind, stop: &Arc<AtomicBool>) -> Result<Box<dyn FrameSource>, CurlError> {
    match kind {
        SourceKind::Sim { frames, period, fps } => {
            Ok(Box::new(SimFrameSource::new(*frames, *period).with_fps(*fps)))
        }
        SourceKind::Replay(path) => {
            let file = File::open(path).map_err(|e| {
                CurlError::Source(format!("cannot open replay {}: {}", path.display(), e))
            })?;
            Ok(Box::new(ReplayFrameSource::new(BufReader::new(file))))
        }
        SourceKind::Leap => open_leap(stop),
    }
}

#[cfg(feature = "leap")]
fn open_leap(stop: &Arc<AtomicBool>) -> Result<Box<dyn FrameSource>, CurlError> {
    Ok(Box::new(crate::source::LeapFrameSource {
        stop:            Arc::clone(stop),
        poll_timeout_ms: 100,
    }))
}

#[cfg(not(feature = "leap"))]
fn open_leap(_stop: &Arc<AtomicBool>) -> Result<Box<dyn FrameSource>, CurlError> {
    tracing::warn!("LeapMotion support not compiled in");
    Err(CurlError::Connection(
        "built without the `leap` feature; rebuild with --features leap".into(),
    ))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
