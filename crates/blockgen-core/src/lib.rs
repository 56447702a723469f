//! Deterministic planning of synthetic TSDB blocks for benchmarks.
//!
//! A [`Plan`] partitions a horizon into block windows, optionally splits each
//! window into rollout windows, asks a [`SeriesSpecFn`] what each series looks
//! like and streams one [`BlockSpec`] per window to a sink. Sample values are
//! not produced here; [`Characteristics`] are passed through to whichever
//! generator writes the block.

pub mod block;
pub mod builtin;
pub mod error;
pub mod labels;
pub mod partition;
pub mod plan;
pub mod profile;
pub mod render;
pub mod rollout;
pub mod series;
pub mod template;

pub use block::{BlockMeta, BlockSpec, Meta, ThanosMeta};
pub use error::{GenerateError, ProfileError};
pub use labels::{Label, Labels};
pub use partition::{partition, partition_from, TimeRange};
pub use plan::{generate, Plan, Strategy};
pub use profile::{Profile, ProfileSeries, ProfileSpecification};
pub use render::render_labels;
pub use rollout::{format_timestamp, schedule, RolloutWindow};
pub use series::{
    Characteristics, ContinuousAppMetric, GenType, K8sAppMetric, SeriesSpec, SeriesSpecFn,
};
pub use template::{Template, TemplateError, Vars};

pub use tokio_util::sync::CancellationToken;
