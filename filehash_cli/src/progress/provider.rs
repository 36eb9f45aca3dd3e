//! Progress provider used by the `hash` command
//!
//! Bridges the engine's synchronous callback with the asynchronous
//! renderer and the Ctrl-C handler.

use filehash_core::{ChannelAdapter, ProgressControl, ProgressProvider, ProgressReport};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// Capacity of the report channel between the hashing thread and the renderer
const PROGRESS_CHANNEL_CAPACITY: usize = 100;

/// Forwards reports to the renderer and stops once cancellation is requested
pub struct CliProgress {
    channel: Option<ChannelAdapter>,
    cancel_requested: Arc<AtomicBool>,
}

impl CliProgress {
    pub fn new(channel: Option<ChannelAdapter>, cancel_requested: Arc<AtomicBool>) -> Self {
        Self {
            channel,
            cancel_requested,
        }
    }
}

impl ProgressProvider for CliProgress {
    fn report(&mut self, report: ProgressReport) -> ProgressControl {
        if let Some(channel) = self.channel.as_mut() {
            channel.report(report);
        }

        if self.cancel_requested.load(Ordering::Relaxed) {
            ProgressControl::Stop
        } else {
            ProgressControl::Continue
        }
    }
}

/// Create a progress provider and, when rendering is wanted, its receiver
pub fn create_progress_infrastructure(
    show_progress: bool,
    cancel_requested: Arc<AtomicBool>,
) -> (CliProgress, Option<mpsc::Receiver<ProgressReport>>) {
    if show_progress {
        let (tx, rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
        (
            CliProgress::new(Some(ChannelAdapter::new(tx)), cancel_requested),
            Some(rx),
        )
    } else {
        (CliProgress::new(None, cancel_requested), None)
    }
}
