//! Human-readable formatting for the run summary

use std::time::Duration;

const BYTE_UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Format a byte count with binary units, e.g. `1.50 KiB`
pub fn format_bytes(bytes: u64) -> String {
    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit + 1 < BYTE_UNITS.len() {
        scaled /= 1024.0;
        unit += 1;
    }

    match unit {
        0 => format!("{bytes} B"),
        _ => format!("{scaled:.2} {}", BYTE_UNITS[unit]),
    }
}

/// Format a throughput given in MB/s
pub fn format_throughput(mbps: f64) -> String {
    if mbps < 1.0 {
        format!("{:.0} KB/s", mbps * 1024.0)
    } else {
        format!("{mbps:.1} MB/s")
    }
}

/// Format an elapsed time, with millisecond precision below one minute
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0 => format!("{}ms", duration.as_millis()),
        1..60 => format!("{:.2}s", duration.as_secs_f64()),
        60..3600 => match secs % 60 {
            0 => format!("{}m", secs / 60),
            rest => format!("{}m {rest}s", secs / 60),
        },
        _ => match (secs % 3600) / 60 {
            0 => format!("{}h", secs / 3600),
            minutes => format!("{}h {minutes}m", secs / 3600),
        },
    }
}
