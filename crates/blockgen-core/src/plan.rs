//! Generation plans: partition, schedule, assemble, emit.
//!
//! A plan is resolved one block at a time. Each block is handed to the sink
//! before the next one is computed, so memory is bounded by the largest
//! block's series list and the sink applies backpressure simply by taking
//! its time.

use crate::block::BlockSpec;
use crate::error::GenerateError;
use crate::labels::Labels;
use crate::partition::{partition, TimeRange};
use crate::rollout::schedule;
use crate::series::{SeriesSpec, SeriesSpecFn};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One window per block, series live for the whole block.
    Continuous,
    /// Series churn every `rollout_interval`, see [`crate::rollout`].
    RealisticK8s { rollout_interval: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub ranges: Vec<Duration>,
    pub strategy: Strategy,
    pub targets: usize,
    /// Carried for reporting; does not change how many series are produced.
    pub metrics_per_target: usize,
}

impl Plan {
    pub fn continuous(ranges: Vec<Duration>, targets: usize, metrics_per_target: usize) -> Self {
        Self {
            ranges,
            strategy: Strategy::Continuous,
            targets,
            metrics_per_target,
        }
    }

    pub fn realistic_k8s(
        ranges: Vec<Duration>,
        rollout_interval: Duration,
        targets: usize,
        metrics_per_target: usize,
    ) -> Self {
        Self {
            ranges,
            strategy: Strategy::RealisticK8s { rollout_interval },
            targets,
            metrics_per_target,
        }
    }

    /// Total horizon covered by all ranges.
    pub fn horizon(&self) -> Duration {
        self.ranges.iter().sum()
    }

    /// Emit one [`BlockSpec`] per range through `sink`.
    ///
    /// Cancellation is observed between blocks only. A sink error stops
    /// generation and is returned as-is inside [`GenerateError::Sink`].
    pub fn generate<F, S>(
        &self,
        series_fn: &F,
        cancel: &CancellationToken,
        external_labels: &Labels,
        mut sink: S,
    ) -> Result<(), GenerateError>
    where
        F: SeriesSpecFn + ?Sized,
        S: FnMut(BlockSpec) -> anyhow::Result<()>,
    {
        debug!(
            ranges = self.ranges.len(),
            targets = self.targets,
            metrics_per_target = self.metrics_per_target,
            strategy = ?self.strategy,
            "starting generation"
        );
        for (i, range) in partition(&self.ranges).into_iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(block = i, "generation cancelled");
                return Err(GenerateError::Cancelled);
            }
            let series = self.series_for_range(range, series_fn);
            let block = BlockSpec::assemble(range, external_labels, series);
            info!(
                block = i,
                min_time = range.min_time,
                max_time = range.max_time,
                series = block.series.len(),
                "block spec assembled"
            );
            sink(block).map_err(GenerateError::Sink)?;
        }
        Ok(())
    }

    /// All series for one block: windows newest first, targets in order.
    pub fn series_for_range<F>(&self, range: TimeRange, series_fn: &F) -> Vec<SeriesSpec>
    where
        F: SeriesSpecFn + ?Sized,
    {
        match self.strategy {
            Strategy::Continuous => self.series_for_window(range, "", series_fn),
            Strategy::RealisticK8s { rollout_interval } => {
                let windows = schedule(range, rollout_interval);
                let mut out = Vec::with_capacity(windows.len() * self.targets);
                for w in &windows {
                    debug!(
                        min_time = w.range.min_time,
                        max_time = w.range.max_time,
                        rollout = %w.label,
                        "rollout window"
                    );
                    out.extend(self.series_for_window(w.range, &w.label, series_fn));
                }
                out
            }
        }
    }

    fn series_for_window<F>(&self, window: TimeRange, label: &str, series_fn: &F) -> Vec<SeriesSpec>
    where
        F: SeriesSpecFn + ?Sized,
    {
        (0..self.targets)
            .map(|index| {
                let mut s = series_fn.generate(self.targets, index, label);
                s.min_time = window.min_time;
                s.max_time = window.max_time;
                s
            })
            .collect()
    }
}

/// Single-call entry point: build a plan and run it.
///
/// A zero `rollout_interval` selects the continuous strategy.
#[allow(clippy::too_many_arguments)]
pub fn generate<F, S>(
    ranges: Vec<Duration>,
    rollout_interval: Duration,
    targets: usize,
    metrics_per_target: usize,
    series_fn: &F,
    cancel: &CancellationToken,
    external_labels: &Labels,
    sink: S,
) -> Result<(), GenerateError>
where
    F: SeriesSpecFn + ?Sized,
    S: FnMut(BlockSpec) -> anyhow::Result<()>,
{
    let plan = if rollout_interval.is_zero() {
        Plan::continuous(ranges, targets, metrics_per_target)
    } else {
        Plan::realistic_k8s(ranges, rollout_interval, targets, metrics_per_target)
    };
    plan.generate(series_fn, cancel, external_labels, sink)
}
