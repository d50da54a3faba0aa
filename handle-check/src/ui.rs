//! Terminal display logic for the handle-check CLI.
//!
//! This module handles the live progress line, the platform table,
//! dry-run previews, and the final summary. Uses only the `console` crate.
//! Everything transient goes to stderr so stdout stays clean for results.

use console::{style, Term};
use handle_check_lib::{PlatformSpec, ProgressSnapshot, ProgressTracker, ScanReport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ── Progress display ─────────────────────────────────────────────────────────

/// Interval between progress line refreshes.
const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// A timer loop that re-renders one overwritable progress line on stderr.
///
/// The loop is purely observational: it reads tracker snapshots on its own
/// schedule and never gates pipeline state. `stop()` performs one final
/// render (the 100% state) terminated with a newline.
pub struct ProgressDisplay {
    running: Arc<AtomicBool>,
    tracker: Arc<ProgressTracker>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl ProgressDisplay {
    /// Start the display loop over a shared tracker.
    pub fn start(tracker: Arc<ProgressTracker>) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let tracker_clone = tracker.clone();

        let handle = tokio::spawn(async move {
            let term = Term::stderr();
            let mut ticker = tokio::time::interval(REFRESH_INTERVAL);
            while running_clone.load(Ordering::Relaxed) {
                ticker.tick().await;
                let _ = term.clear_line();
                let _ = term.write_str(&render_progress_line(&tracker_clone.snapshot()));
            }
        });

        Self {
            running,
            tracker,
            handle: Some(handle),
        }
    }

    /// Stop the loop and render the final state on its own line.
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.await;
        }
        let term = Term::stderr();
        let _ = term.clear_line();
        let _ = term.write_line(&render_progress_line(&self.tracker.snapshot()));
    }
}

/// Format one progress line: percentage, counts, speed, ETA.
///
/// Speed and ETA show `--` until enough time has elapsed to estimate them.
pub fn render_progress_line(snap: &ProgressSnapshot) -> String {
    let speed = match snap.speed() {
        Some(s) => format!("{:.1}/s", s),
        None => "--/s".to_string(),
    };
    let eta = match snap.eta() {
        Some(d) => format_duration(d),
        None => "--".to_string(),
    };

    format!(
        "Progress: {:.2}% ({}/{}) Speed: {} ETA: {}",
        snap.percentage(),
        snap.processed,
        snap.total,
        speed,
        eta,
    )
}

/// Render a duration as a compact human figure: "45s", "1m23s", "2h05m".
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 3600 {
        format!("{}h{:02}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m{:02}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

// ── Platform table ───────────────────────────────────────────────────────────

/// Print the configured probe set in evaluation order.
pub fn print_platforms(platforms: &[PlatformSpec]) {
    println!();
    println!("{}", style("Configured platforms (probe order):").bold());
    println!();

    for (i, spec) in platforms.iter().enumerate() {
        println!(
            "  {} {}  {}  {}",
            style(format!("{}.", i + 1)).dim(),
            style(format!("{:<12}", spec.name)).green().bold(),
            spec.url_template,
            style(format!("(available on {})", spec.available_status)).dim(),
        );
    }

    println!();
    println!("Probes run in this order and stop at the first rejection.");
}

// ── Dry run ──────────────────────────────────────────────────────────────────

/// Preview what a scan would do, without any network traffic.
pub fn print_dry_run(total: u64, start: u64, end: u64, alphabet: &str, length: u32, platforms: &[PlatformSpec]) {
    let order: Vec<&str> = platforms.iter().map(|p| p.name.as_str()).collect();
    println!(
        "Would check {} handles of length {} over alphabet \"{}\"",
        total, length, alphabet
    );
    println!("Index range: [{}, {})", start, end);
    println!("Probe order: {}", order.join(", "));
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final styled summary plus the plain completion line.
pub fn print_summary(report: &ScanReport, output: &str, written: usize) {
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} handle{} in {:.1}s  {}  {}  {}  {}",
        style(report.processed).bold(),
        if report.processed == 1 { "" } else { "s" },
        report.duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available everywhere", report.available.len())).green(),
        style("|").dim(),
        style(format!("{} written", written)).cyan(),
    );
    println!(
        "Processed {} combinations. Results saved to {}",
        report.processed, output
    );
}

// ── Tests ────────────────────────────────────────────────────────────────────
