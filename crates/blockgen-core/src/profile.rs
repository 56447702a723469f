//! Declarative generation profiles.
//!
//! ```yaml
//! ranges: [2, 2, 8]
//! rolloutInterval: 1
//! targets: 100
//! metricsPerTarget: 50
//! specification:
//!   type: GAUGE
//!   characteristics:
//!     max: 200000000
//!     min: 10000000
//!     jitter: 30000000
//!     scrapeInterval: 15s
//!     changeInterval: 1h
//!   labels:
//!     __name__: app_metric
//!     pod: "app-{{ .index }}"
//! ```

use crate::error::ProfileError;
use crate::labels::Labels;
use crate::partition::DEFAULT_ORIGIN_MS;
use crate::plan::Plan;
use crate::render::render_labels;
use crate::series::{Characteristics, GenType, SeriesSpec, SeriesSpecFn};
use crate::template::{Template, Vars};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSpecification {
    #[serde(rename = "type")]
    pub gen_type: GenType,
    #[serde(default)]
    pub characteristics: Characteristics,
    #[serde(default)]
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Block lengths in hours, oldest first.
    #[serde(default)]
    pub ranges: Vec<u64>,
    /// Hours between rollouts; 0 disables rollouts.
    #[serde(default)]
    pub rollout_interval: u64,
    pub targets: usize,
    #[serde(default = "default_metrics_per_target")]
    pub metrics_per_target: usize,
    pub specification: ProfileSpecification,
}

fn default_metrics_per_target() -> usize {
    1
}

const HOUR_MS: i64 = 3_600_000;

fn hours(h: u64) -> Duration {
    Duration::from_secs(h.saturating_mul(3600))
}

fn hours_ms(h: u64) -> Option<i64> {
    i64::try_from(h).ok()?.checked_mul(HOUR_MS)
}

impl Profile {
    /// Load and validate a profile from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ProfileError> {
        let profile: Profile = serde_yaml::from_str(yaml)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ProfileError> {
        let profile: Profile = serde_yaml::from_reader(reader)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Structural checks. Label templates that will not parse are logged,
    /// not rejected: they render as literal text.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if let Some(pos) = self.ranges.iter().position(|&r| r == 0) {
            return Err(ProfileError::Invalid(format!(
                "ranges[{pos}] must be a positive number of hours"
            )));
        }
        // Block ends accumulate from the origin and the block after the last
        // one starts 1ms later; all of it has to stay within i64 milliseconds.
        let mut end = DEFAULT_ORIGIN_MS - 1;
        for (pos, &r) in self.ranges.iter().enumerate() {
            end = hours_ms(r)
                .and_then(|ms| end.checked_add(ms))
                .filter(|&e| e < i64::MAX)
                .ok_or_else(|| {
                    ProfileError::Invalid(format!(
                        "ranges[{pos}] pushes the horizon past the millisecond timestamp range"
                    ))
                })?;
        }
        if hours_ms(self.rollout_interval).is_none() {
            return Err(ProfileError::Invalid(
                "rolloutInterval exceeds the millisecond timestamp range".into(),
            ));
        }
        if self.targets == 0 {
            return Err(ProfileError::Invalid("targets must be positive".into()));
        }
        if self.metrics_per_target == 0 {
            return Err(ProfileError::Invalid(
                "metricsPerTarget must be positive".into(),
            ));
        }
        for label in &self.specification.labels {
            if label.name.is_empty() {
                return Err(ProfileError::Invalid("label names must not be empty".into()));
            }
            if let Err(e) = Template::parse(&label.value) {
                warn!(label = %label.name, error = %e, "label template will be used literally");
            }
        }
        Ok(())
    }

    pub fn time_ranges(&self) -> Vec<Duration> {
        self.ranges.iter().map(|&h| hours(h)).collect()
    }

    pub fn churn_interval(&self) -> Duration {
        hours(self.rollout_interval)
    }

    pub fn series_spec(&self) -> ProfileSeries {
        ProfileSeries {
            targets: self.targets,
            specification: self.specification.clone(),
        }
    }

    /// Rollouts on when `rolloutInterval` is positive.
    pub fn plan(&self) -> Plan {
        if self.rollout_interval == 0 {
            Plan::continuous(self.time_ranges(), self.targets, self.metrics_per_target)
        } else {
            Plan::realistic_k8s(
                self.time_ranges(),
                self.churn_interval(),
                self.targets,
                self.metrics_per_target,
            )
        }
    }
}

/// Series factory derived from a [`Profile`].
///
/// Carries the profile's target count, type and characteristics verbatim and
/// renders its label templates with `index` and `rollout` in scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSeries {
    targets: usize,
    specification: ProfileSpecification,
}

impl SeriesSpecFn for ProfileSeries {
    fn generate(&self, _targets: usize, index: usize, next_rollout_time: &str) -> SeriesSpec {
        let vars = Vars::new()
            .with("index", index)
            .with("rollout", next_rollout_time);
        SeriesSpec::new(
            self.targets,
            self.specification.gen_type,
            self.specification.characteristics.clone(),
            render_labels(&self.specification.labels, &vars),
        )
    }
}
