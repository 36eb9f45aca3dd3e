//! Scripted progress providers

use filehash_core::{ProgressControl, ProgressProvider, ProgressReport};
use tokio::sync::mpsc;

/// Records every report and optionally stops after a number of calls
#[derive(Debug, Default, Clone)]
pub struct RecordingProvider {
    reports: Vec<ProgressReport>,
    stop_on_call: Option<usize>,
}

impl RecordingProvider {
    /// Provider that always continues
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that answers `Stop` on call number `call` (1-based)
    pub fn stopping_on_call(call: usize) -> Self {
        Self {
            reports: Vec::new(),
            stop_on_call: Some(call),
        }
    }

    /// Every report received, in order
    pub fn reports(&self) -> &[ProgressReport] {
        &self.reports
    }

    pub fn calls(&self) -> usize {
        self.reports.len()
    }

    /// Last report received
    pub fn last(&self) -> Option<ProgressReport> {
        self.reports.last().copied()
    }

    /// Whether processed bytes never decreased and the total never changed
    pub fn is_monotonic(&self) -> bool {
        self.reports.windows(2).all(|pair| {
            pair[1].processed_bytes >= pair[0].processed_bytes
                && pair[1].total_bytes == pair[0].total_bytes
        })
    }
}

impl ProgressProvider for RecordingProvider {
    fn report(&mut self, report: ProgressReport) -> ProgressControl {
        self.reports.push(report);
        match self.stop_on_call {
            Some(call) if self.reports.len() >= call => ProgressControl::Stop,
            _ => ProgressControl::Continue,
        }
    }
}

/// Panics on call number `call` (1-based)
#[derive(Debug, Clone)]
pub struct PanickingProvider {
    call: usize,
    calls: usize,
}

impl PanickingProvider {
    pub fn on_call(call: usize) -> Self {
        Self { call, calls: 0 }
    }

    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl ProgressProvider for PanickingProvider {
    fn report(&mut self, _report: ProgressReport) -> ProgressControl {
        self.calls += 1;
        if self.calls >= self.call {
            panic!("progress provider panicked on call {}", self.calls);
        }
        ProgressControl::Continue
    }
}

/// Collect every report currently buffered in a channel
pub fn drain_reports(rx: &mut mpsc::Receiver<ProgressReport>) -> Vec<ProgressReport> {
    let mut reports = Vec::new();
    while let Ok(report) = rx.try_recv() {
        reports.push(report);
    }
    reports
}
