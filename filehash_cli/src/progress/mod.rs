//! Progress reporting for the CLI
//!
//! The engine runs on a blocking thread and pushes reports through a
//! channel; the renderer draws them from the async side.

pub mod provider;
pub mod renderer;
pub mod utils;

pub use provider::{CliProgress, create_progress_infrastructure};
pub use renderer::{RunOutcome, render_progress};
pub use utils::{format_bytes, format_duration, format_throughput};
