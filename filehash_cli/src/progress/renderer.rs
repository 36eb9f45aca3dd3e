//! Progress rendering for the CLI
//!
//! Turns the engine's progress reports into an indicatif bar on stderr.
//! The bar is closed with the run's actual outcome, since the last report
//! may be missing or may disagree with the advisory total.

use colored::*;
use filehash_core::{FileHash, ProgressReport};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::sync::mpsc;

const BAR_TEMPLATE: &str =
    "{msg}\n{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% | {bytes}/{total_bytes} | {bytes_per_sec} | ETA: {eta}";

/// How a run ended, as far as the progress bar is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed { bytes_processed: u64 },
    Cancelled,
    Failed,
}

impl RunOutcome {
    pub fn of(result: &filehash_core::Result<FileHash>) -> Self {
        match result {
            Ok(hash) => Self::Completed {
                bytes_processed: hash.bytes_processed(),
            },
            Err(e) if e.is_cancelled() => Self::Cancelled,
            Err(_) => Self::Failed,
        }
    }
}

/// Render progress reports from a channel until every sender is gone
///
/// The renderer is handed back so the caller can close the bar with the
/// run's outcome.
pub async fn render_progress(
    mut rx: mpsc::Receiver<ProgressReport>,
    label: String,
) -> ProgressRenderer {
    let mut renderer = ProgressRenderer::new(label);

    while let Some(report) = rx.recv().await {
        renderer.handle_report(report);
    }

    renderer
}

/// Progress renderer for a single file
pub struct ProgressRenderer {
    label: String,
    bar: Option<ProgressBar>,
    last: Option<ProgressReport>,
    draw_target: fn() -> ProgressDrawTarget,
}

impl ProgressRenderer {
    /// Renderer drawing to stderr
    pub fn new(label: String) -> Self {
        Self {
            label,
            bar: None,
            last: None,
            draw_target: ProgressDrawTarget::stderr,
        }
    }

    /// Renderer that tracks state without drawing anything
    pub fn hidden(label: String) -> Self {
        Self {
            draw_target: ProgressDrawTarget::hidden,
            ..Self::new(label)
        }
    }

    /// Most recent report seen
    pub fn last_report(&self) -> Option<ProgressReport> {
        self.last
    }

    /// The bar, once the first report has arrived
    pub fn bar(&self) -> Option<&ProgressBar> {
        self.bar.as_ref()
    }

    /// Handle a progress report
    pub fn handle_report(&mut self, report: ProgressReport) {
        let bar = self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::with_draw_target(
                Some(report.total_bytes),
                (self.draw_target)(),
            );
            match ProgressStyle::default_bar().template(BAR_TEMPLATE) {
                Ok(style) => bar.set_style(style.progress_chars("#>-")),
                Err(e) => log::debug!("Falling back to default progress style: {e}"),
            }
            bar.set_message(format!(
                "{}: {}",
                "Hashing".bold(),
                self.label.cyan()
            ));
            bar
        });

        // The size is advisory, a growing file stretches the bar
        if report.processed_bytes > report.total_bytes {
            bar.set_length(report.processed_bytes);
        }
        bar.set_position(report.processed_bytes);
        self.last = Some(report);
    }

    /// Close the bar with the run's outcome
    pub fn finish(&self, outcome: RunOutcome) {
        let Some(bar) = &self.bar else {
            return;
        };

        match outcome {
            RunOutcome::Completed { bytes_processed } => {
                // The file may have shrunk or the last report been dropped
                bar.set_length(bytes_processed);
                bar.set_position(bytes_processed);
                bar.finish_with_message("✓ Complete".green().to_string());
            }
            RunOutcome::Cancelled => {
                bar.abandon_with_message("✗ Stopped".yellow().to_string());
            }
            RunOutcome::Failed => {
                bar.abandon_with_message("✗ Failed".red().to_string());
            }
        }
    }
}
