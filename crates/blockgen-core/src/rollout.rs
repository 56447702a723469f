//! Rollout scheduling inside one block window.
//!
//! A heavily used Kubernetes cluster redeploys its apps every hour or so, and
//! every rollout replaces the pod-level series. Within a block window we lay
//! out rollout windows backward from the block end:
//!
//! ```text
//!   mint                                                  maxt
//!    |----------|-------------------|-------------------|----|
//!      oldest        rollout - I          rollout        I/2
//!    (clamped)
//! ```
//!
//! The newest rollout happens half an interval before `maxt`. Every earlier
//! window is one interval long except the oldest, which is clamped to `mint`.

use crate::partition::{duration_ms, TimeRange};
use chrono::{DateTime, Timelike, Utc};
use std::time::Duration;

/// One rollout window and the label value describing its rollout instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloutWindow {
    pub range: TimeRange,
    pub rollout_at: i64,
    pub label: String,
}

/// Windows for `block`, newest first.
///
/// An interval that is zero or at least the block length yields a single
/// window spanning the whole block.
pub fn schedule(block: TimeRange, interval: Duration) -> Vec<RolloutWindow> {
    let interval = duration_ms(interval);
    let half = interval / 2;
    let mut rollout = block.max_time - half;

    if interval <= 0 || interval >= block.len_ms() {
        return vec![window(block.min_time, block.max_time, rollout)];
    }

    let mut windows = Vec::new();
    let mut end = block.max_time;
    loop {
        let start = rollout.max(block.min_time);
        windows.push(window(start, end, rollout));
        if start == block.min_time {
            break;
        }
        end = rollout;
        rollout -= interval;
    }
    windows
}

fn window(min_time: i64, max_time: i64, rollout_at: i64) -> RolloutWindow {
    RolloutWindow {
        range: TimeRange::new(min_time, max_time),
        rollout_at,
        label: format_timestamp(rollout_at),
    }
}

/// Renders a millisecond timestamp as `YYYY-MM-DD HH:MM:SS[.fff] +0000 UTC`.
///
/// The fraction is only printed when non-zero, without trailing zeros.
pub fn format_timestamp(ms: i64) -> String {
    let Some(ts) = DateTime::<Utc>::from_timestamp_millis(ms) else {
        return ms.to_string();
    };
    let mut out = ts.format("%Y-%m-%d %H:%M:%S").to_string();
    let millis = ts.nanosecond() / 1_000_000;
    if millis > 0 {
        let frac = format!("{millis:03}");
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    out.push_str(" +0000 UTC");
    out
}
