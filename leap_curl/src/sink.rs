//! Report sinks — where rendered reports go.
//!
//! A sink is a synchronous byte-stream consumer.  The default writes to
//! stdout; [`ProcessSink`] hands the same text to a reader program over its
//! stdin, which is how downstream tools consume the curl stream.

use std::io::{self, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

use tracing::{debug, info};

use crate::error::CurlError;
use crate::report::FrameReport;

pub trait ReportSink {
    fn write_report(&mut self, report: &FrameReport) -> Result<(), CurlError>;

    /// Flush and release the sink.  Called once, after the last report.
    fn finish(self: Box<Self>) -> Result<(), CurlError>;
}

// ════════════════════════════════════════════════════════════════════════════
// WriterSink — any io::Write
// ════════════════════════════════════════════════════════════════════════════

pub struct WriterSink<W: Write> {
    writer:  W,
    written: usize,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self { WriterSink { writer, written: 0 } }

    /// Reports written so far.
    pub fn written(&self) -> usize { self.written }

    pub fn into_inner(self) -> W { self.writer }
}

impl<W: Write> ReportSink for WriterSink<W> {
    fn write_report(&mut self, report: &FrameReport) -> Result<(), CurlError> {
        write!(self.writer, "{}", report)?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<(), CurlError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Reports to the process's stdout.
pub fn stdout_sink() -> WriterSink<io::Stdout> {
    WriterSink::new(io::stdout())
}

// ════════════════════════════════════════════════════════════════════════════
// ProcessSink — a reader program fed through a pipe
// ════════════════════════════════════════════════════════════════════════════

/// Spawns `program args…` with a piped stdin and writes every report into it.
///
/// `finish` closes the pipe (the reader sees EOF) and waits for the child; a
/// non-zero exit status is reported as [`CurlError::Sink`].
pub struct ProcessSink {
    child: Child,
    inner: WriterSink<ChildStdin>,
    label: String,
}

impl ProcessSink {
    pub fn spawn(command: &[String]) -> Result<Self, CurlError> {
        let (program, args) = command.split_first()
            .ok_or_else(|| CurlError::Sink("empty reader command".into()))?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| CurlError::Sink(format!("failed to spawn `{}`: {}", program, e)))?;

        let stdin = child.stdin.take()
            .ok_or_else(|| CurlError::Sink(format!("`{}` has no stdin pipe", program)))?;

        info!(program = %program, pid = child.id(), "reader process started");
        Ok(ProcessSink { child, inner: WriterSink::new(stdin), label: program.clone() })
    }
}

impl ReportSink for ProcessSink {
    fn write_report(&mut self, report: &FrameReport) -> Result<(), CurlError> {
        self.inner.write_report(report)
    }

    fn finish(self: Box<Self>) -> Result<(), CurlError> {
        let ProcessSink { mut child, inner, label } = *self;
        let written = inner.written();
        // Dropping the pipe signals EOF to the reader.
        drop(inner.into_inner());
        let status = child.wait()?;
        debug!(program = %label, written, %status, "reader process exited");
        if status.success() {
            Ok(())
        } else {
            Err(CurlError::Sink(format!("`{}` exited with {}", label, status)))
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
