//! Human-readable durations and sizes for table cells.

/// Format nanoseconds as `ns`, `us` or `ms` with two decimals.
pub fn nanoseconds(ns: f64) -> String {
    if ns > 1_000_000.0 {
        format!("{:.2} ms", ns / 1_000_000.0)
    } else if ns > 1000.0 {
        format!("{:.2} us", ns / 1000.0)
    } else {
        format!("{ns:.2} ns")
    }
}

/// Format a byte count in whole `B`, `KB`, `MB` or `GB` (binary units,
/// truncated).
pub fn bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;

    if bytes > GB {
        format!("{} GB", bytes / GB)
    } else if bytes > MB {
        format!("{} MB", bytes / MB)
    } else if bytes > KB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{bytes} B")
    }
}
