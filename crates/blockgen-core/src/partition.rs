//! Splits a horizon of range lengths into contiguous block windows.

use serde::Serialize;
use std::time::Duration;

/// Timestamps never start at zero.
pub const DEFAULT_ORIGIN_MS: i64 = 1;

/// Inclusive millisecond window `[min_time, max_time]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub min_time: i64,
    pub max_time: i64,
}

impl TimeRange {
    pub fn new(min_time: i64, max_time: i64) -> Self {
        Self { min_time, max_time }
    }

    pub fn len_ms(&self) -> i64 {
        self.max_time - self.min_time
    }
}

pub fn duration_ms(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

/// Partition `ranges` starting at [`DEFAULT_ORIGIN_MS`].
pub fn partition(ranges: &[Duration]) -> Vec<TimeRange> {
    partition_from(DEFAULT_ORIGIN_MS, ranges)
}

/// Partition `ranges` into adjacent windows. The first window starts at
/// `origin`; each later one starts 1ms after its predecessor ends, and
/// window ends accumulate the range lengths from `origin - 1`. Both bounds
/// saturate at `i64::MAX`.
pub fn partition_from(origin: i64, ranges: &[Duration]) -> Vec<TimeRange> {
    let mut out = Vec::with_capacity(ranges.len());
    let mut end = origin.saturating_sub(1);
    let mut start = origin;
    for r in ranges {
        end = end.saturating_add(duration_ms(*r));
        out.push(TimeRange::new(start, end));
        start = end.saturating_add(1);
    }
    out
}
