//! Mock implementations for testing

mod progress;

pub use progress::{PanickingProvider, RecordingProvider, drain_reports};
