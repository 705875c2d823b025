//! leap_curl — command-line entry point.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use leap_curl::app::run;
use leap_curl::config::{AppConfig, SourceKind, USAGE};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so stdout carries only curl reports.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cfg = match AppConfig::from_args(std::env::args().skip(1)) {
        Ok(Some(cfg)) => cfg,
        Ok(None) => {
            println!("{}", USAGE);
            return;
        }
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    eprintln!();
    eprintln!("╔══════════════════════════════════════════════════════════════╗");
    eprintln!("║            Leap Curl — per-finger curl from LeapC            ║");
    eprintln!("╚══════════════════════════════════════════════════════════════╝");
    eprintln!();
    match &cfg.source {
        SourceKind::Leap            => eprintln!("  Mode: LeapMotion hardware"),
        SourceKind::Replay(path)    => eprintln!("  Mode: replay {}", path.display()),
        SourceKind::Sim { frames, .. } =>
            eprintln!("  Mode: simulated hands, {} frames  (use --features leap for hardware)", frames),
    }
    eprintln!("  Press Enter to exit program.");
    eprintln!();

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut buf = String::new();
            // EOF or an error on stdin leaves the run going.
            if matches!(io::stdin().read_line(&mut buf), Ok(n) if n > 0) {
                stop.store(true, Ordering::Relaxed);
            }
        });
    }

    if let Err(e) = run(cfg, stop) {
        error!("{}", e);
        std::process::exit(1);
    }
}
