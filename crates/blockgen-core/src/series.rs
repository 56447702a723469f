//! Series specifications and the factories that produce them.

use crate::labels::{Label, Labels};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Kind of sample generator that will fill the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GenType {
    Counter,
    Gauge,
}

/// Parameters for the sample-value generator. Not interpreted here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Characteristics {
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub jitter: f64,
    #[serde(default, with = "duration_serde")]
    pub scrape_interval: Duration,
    #[serde(default, with = "duration_serde")]
    pub change_interval: Duration,
}

/// Generation contract for one series.
///
/// `min_time`/`max_time` belong to the scheduler; factories leave them at 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSpec {
    pub targets: usize,
    #[serde(rename = "type")]
    pub gen_type: GenType,
    pub characteristics: Characteristics,
    pub labels: Labels,
    pub min_time: i64,
    pub max_time: i64,
}

impl SeriesSpec {
    pub fn new(
        targets: usize,
        gen_type: GenType,
        characteristics: Characteristics,
        labels: Labels,
    ) -> Self {
        Self {
            targets,
            gen_type,
            characteristics,
            labels,
            min_time: 0,
            max_time: 0,
        }
    }
}

/// "What does a series look like" for a given target index.
pub trait SeriesSpecFn {
    fn generate(&self, targets: usize, index: usize, next_rollout_time: &str) -> SeriesSpec;
}

impl<F> SeriesSpecFn for F
where
    F: Fn(usize, usize, &str) -> SeriesSpec,
{
    fn generate(&self, targets: usize, index: usize, next_rollout_time: &str) -> SeriesSpec {
        self(targets, index, next_rollout_time)
    }
}

/// Shape shared by the built-in app metrics: a slowly changing gauge
/// between 10M and 200M, scraped every 15s.
pub fn app_metric_characteristics() -> Characteristics {
    Characteristics {
        max: 200_000_000.0,
        min: 10_000_000.0,
        jitter: 30_000_000.0,
        scrape_interval: Duration::from_secs(15),
        change_interval: Duration::from_secs(3600),
    }
}

/// Long-lived series with no churn: `continuous_app_metric{index}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuousAppMetric;

impl SeriesSpecFn for ContinuousAppMetric {
    fn generate(&self, targets: usize, index: usize, _next_rollout_time: &str) -> SeriesSpec {
        SeriesSpec::new(
            targets,
            GenType::Gauge,
            app_metric_characteristics(),
            Labels::from_pairs([("__name__", format!("continuous_app_metric{index}"))]),
        )
    }
}

/// Series that churn on every rollout: `k8s_app_metric{index}` carrying a
/// `next_rollout_time` label.
#[derive(Debug, Clone, Copy, Default)]
pub struct K8sAppMetric;

impl SeriesSpecFn for K8sAppMetric {
    fn generate(&self, targets: usize, index: usize, next_rollout_time: &str) -> SeriesSpec {
        let mut labels = Labels::new();
        labels.push(Label::new("__name__", format!("k8s_app_metric{index}")));
        labels.push(Label::new("next_rollout_time", next_rollout_time));
        SeriesSpec::new(
            targets,
            GenType::Gauge,
            app_metric_characteristics(),
            labels,
        )
    }
}

/// Durations are written as humantime strings (`"15s"`, `"1h 30m"`) and read
/// from either that form or a plain number of seconds.
mod duration_serde {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*d))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        deserializer.deserialize_any(DurationVisitor)
    }

    struct DurationVisitor;

    impl<'de> Visitor<'de> for DurationVisitor {
        type Value = Duration;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a duration such as \"15s\" or a number of seconds")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
            u64::try_from(v)
                .map(Duration::from_secs)
                .map_err(|_| E::custom(format!("negative duration: {v}")))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Duration, E> {
            Duration::try_from_secs_f64(v).map_err(E::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
            humantime::parse_duration(v).map_err(E::custom)
        }
    }
}
