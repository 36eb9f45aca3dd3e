//! Progress reporting and cooperative cancellation
//!
//! The engine calls a [`ProgressProvider`] once before the first chunk and
//! once after every chunk. The provider's [`ProgressControl`] answer is the
//! only cancellation mechanism: returning [`ProgressControl::Stop`] ends the
//! run at the next chunk boundary without producing a result.

use std::time::Instant;
use tokio::sync::mpsc;

/// Answer returned by a progress callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressControl {
    /// Keep hashing
    #[default]
    Continue,
    /// Abort the run; no result will be produced
    Stop,
}

impl ProgressControl {
    pub fn is_stop(self) -> bool {
        self == Self::Stop
    }
}

/// A single progress observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressReport {
    /// File size observed when the file was opened
    pub total_bytes: u64,
    /// Bytes fed to every accumulator so far
    pub processed_bytes: u64,
}

impl ProgressReport {
    pub fn new(total_bytes: u64, processed_bytes: u64) -> Self {
        Self {
            total_bytes,
            processed_bytes,
        }
    }

    /// Completed fraction in `0.0..=1.0`
    ///
    /// The total is advisory: if the file grew while being read the
    /// fraction is clamped rather than exceeding one.
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        (self.processed_bytes as f64 / self.total_bytes as f64).min(1.0)
    }

    /// Completed percentage in `0.0..=100.0`
    pub fn percentage(&self) -> f64 {
        self.fraction() * 100.0
    }
}

/// Core trait for progress reporting
///
/// Providers are invoked on the thread that called the engine, never
/// concurrently, so they need not be `Send`.
pub trait ProgressProvider {
    /// Observe progress and decide whether the run continues
    fn report(&mut self, report: ProgressReport) -> ProgressControl;
}

impl<F> ProgressProvider for F
where
    F: FnMut(u64, u64) -> ProgressControl,
{
    fn report(&mut self, report: ProgressReport) -> ProgressControl {
        self(report.total_bytes, report.processed_bytes)
    }
}

/// Provider that ignores reports and always continues
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProvider;

impl ProgressProvider for NullProvider {
    fn report(&mut self, _report: ProgressReport) -> ProgressControl {
        ProgressControl::Continue
    }
}

/// Wraps another provider and stops the run once a deadline has passed
///
/// The deadline is checked at chunk granularity, like every other
/// cancellation.
pub struct DeadlineProvider<P> {
    inner: P,
    deadline: Instant,
}

impl<P: ProgressProvider> DeadlineProvider<P> {
    pub fn new(inner: P, deadline: Instant) -> Self {
        Self { inner, deadline }
    }
}

impl DeadlineProvider<NullProvider> {
    /// Deadline with no other progress handling
    pub fn until(deadline: Instant) -> Self {
        Self::new(NullProvider, deadline)
    }
}

impl<P: ProgressProvider> ProgressProvider for DeadlineProvider<P> {
    fn report(&mut self, report: ProgressReport) -> ProgressControl {
        if Instant::now() >= self.deadline {
            log::debug!(
                "Deadline passed after {} of {} bytes, stopping",
                report.processed_bytes,
                report.total_bytes
            );
            return ProgressControl::Stop;
        }
        self.inner.report(report)
    }
}

/// Forwards reports into a tokio channel for an asynchronous consumer
///
/// Sending never blocks the hashing loop: when the channel is full the
/// report is dropped. A closed receiver does not cancel the run.
pub struct ChannelAdapter {
    tx: mpsc::Sender<ProgressReport>,
}

impl ChannelAdapter {
    /// Create a new adapter from an mpsc sender
    pub fn new(tx: mpsc::Sender<ProgressReport>) -> Self {
        Self { tx }
    }
}

impl ProgressProvider for ChannelAdapter {
    fn report(&mut self, report: ProgressReport) -> ProgressControl {
        if let Err(e) = self.tx.try_send(report) {
            log::trace!("Dropped progress report: {e}");
        }
        ProgressControl::Continue
    }
}
