//! Run statistics and size formatting

use serde::Serialize;

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;

/// Counters for a single collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectStats {
    /// Files read and added to the output
    pub collected: u64,
    /// Files that could not be read
    pub skipped: u64,
    /// Size of the written output file in bytes
    pub output_bytes: u64,
}

impl CollectStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total files visited.
    pub fn visited(&self) -> u64 {
        self.collected + self.skipped
    }

    /// Output size in human units.
    pub fn output_size(&self) -> String {
        format_size(self.output_bytes)
    }
}

/// Render a byte count as `B`, `KB` or `MB` using 1024-based thresholds.
///
/// Bytes are printed as an integer; KB and MB carry two decimals.
pub fn format_size(bytes: u64) -> String {
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}
