//! Named plans that need no profile document.

use crate::plan::Plan;
use crate::series::{ContinuousAppMetric, K8sAppMetric, SeriesSpec, SeriesSpecFn};
use std::time::Duration;

const HOUR: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinSeries {
    Continuous,
    K8s,
}

impl SeriesSpecFn for BuiltinSeries {
    fn generate(&self, targets: usize, index: usize, next_rollout_time: &str) -> SeriesSpec {
        match self {
            BuiltinSeries::Continuous => {
                ContinuousAppMetric.generate(targets, index, next_rollout_time)
            }
            BuiltinSeries::K8s => K8sAppMetric.generate(targets, index, next_rollout_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub plan: Plan,
    pub series: BuiltinSeries,
}

struct Entry {
    name: &'static str,
    description: &'static str,
    ranges_h: &'static [u64],
    rollout_h: u64,
    targets: usize,
    metrics_per_target: usize,
}

// Ranges are oldest first; the 2h tail mimics freshly cut head blocks.
const ENTRIES: &[Entry] = &[
    Entry {
        name: "continuous-1w-small",
        description: "one week of long-lived series, 2 targets",
        ranges_h: &[48, 48, 48, 8, 8, 2, 2, 2, 2],
        rollout_h: 0,
        targets: 2,
        metrics_per_target: 10,
    },
    Entry {
        name: "continuous-30d-tiny",
        description: "30 days of long-lived series, 1 target",
        ranges_h: &[336, 336, 48],
        rollout_h: 0,
        targets: 1,
        metrics_per_target: 1,
    },
    Entry {
        name: "realistic-k8s-1w-small",
        description: "one week, hourly rollouts, 1 app",
        ranges_h: &[48, 48, 48, 8, 8, 2, 2, 2, 2],
        rollout_h: 1,
        targets: 1,
        metrics_per_target: 10,
    },
    Entry {
        name: "realistic-k8s-30d-tiny",
        description: "30 days, daily rollouts, 1 app",
        ranges_h: &[336, 336, 48],
        rollout_h: 24,
        targets: 1,
        metrics_per_target: 1,
    },
    Entry {
        name: "key-k8s-rollout-2d",
        description: "two days of 2h blocks, rollout every 2h, 10 apps",
        ranges_h: &[2; 24],
        rollout_h: 2,
        targets: 10,
        metrics_per_target: 5,
    },
];

impl Entry {
    fn build(&self) -> BuiltinProfile {
        let ranges = self.ranges_h.iter().map(|&h| HOUR * h as u32).collect();
        let (plan, series) = if self.rollout_h == 0 {
            (
                Plan::continuous(ranges, self.targets, self.metrics_per_target),
                BuiltinSeries::Continuous,
            )
        } else {
            (
                Plan::realistic_k8s(
                    ranges,
                    HOUR * self.rollout_h as u32,
                    self.targets,
                    self.metrics_per_target,
                ),
                BuiltinSeries::K8s,
            )
        };
        BuiltinProfile {
            name: self.name,
            description: self.description,
            plan,
            series,
        }
    }
}

pub fn names() -> impl Iterator<Item = &'static str> {
    ENTRIES.iter().map(|e| e.name)
}

pub fn all() -> Vec<BuiltinProfile> {
    ENTRIES.iter().map(Entry::build).collect()
}

pub fn lookup(name: &str) -> Option<BuiltinProfile> {
    ENTRIES.iter().find(|e| e.name == name).map(Entry::build)
}
