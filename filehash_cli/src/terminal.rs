//! Terminal detection and capability utilities

use is_terminal::IsTerminal;
use std::env;
use std::io::{stderr, stdout};

/// Environment variables set by common CI providers
const CI_VARS: [&str; 10] = [
    "CI",
    "CONTINUOUS_INTEGRATION",
    "JENKINS_URL",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "TRAVIS",
    "CIRCLECI",
    "BUILDKITE",
    "TEAMCITY_VERSION",
    "TF_BUILD",
];

/// Check if stdout is connected to an interactive terminal
pub fn is_interactive() -> bool {
    stdout().is_terminal() && !is_ci_environment()
}

/// Check if stderr is connected to a terminal (for progress display)
pub fn stderr_is_terminal() -> bool {
    stderr().is_terminal()
}

/// Check whether escape sequences are understood by the terminal
fn term_supports_ansi() -> bool {
    match env::var("TERM") {
        Ok(term) => term != "dumb" && !term.is_empty(),
        // Windows consoles usually leave TERM unset
        Err(_) => cfg!(windows),
    }
}

/// Detect if running in a CI environment
fn is_ci_environment() -> bool {
    CI_VARS.iter().any(|var| env::var_os(var).is_some())
}

/// Whether digests printed to stdout should be colored
///
/// Honours `NO_COLOR` and the `color_enabled` config switch.
pub fn should_use_color(color_enabled: bool) -> bool {
    color_enabled
        && env::var_os("NO_COLOR").is_none()
        && is_interactive()
        && term_supports_ansi()
}

/// Progress goes to stderr, so only stderr has to be a terminal
pub fn should_show_progress(progress_enabled: bool) -> bool {
    progress_enabled && stderr_is_terminal() && !is_ci_environment() && term_supports_ansi()
}
