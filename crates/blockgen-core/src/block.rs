//! Block-level metadata and assembly.
//!
//! `Meta` serializes to the same camelCase layout as a Thanos `meta.json`
//! (minus ULID and stats, which belong to the block writer).

use crate::labels::Labels;
use crate::partition::TimeRange;
use crate::series::SeriesSpec;
use serde::Serialize;
use std::collections::BTreeMap;

/// Origin tag written to every generated block.
pub const SOURCE: &str = "blockgen";
pub const COMPACTION_LEVEL: u32 = 1;
pub const META_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(flatten)]
    pub block: BlockMeta,
    pub thanos: ThanosMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMeta {
    pub min_time: i64,
    pub max_time: i64,
    pub compaction: Compaction,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compaction {
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThanosMeta {
    pub labels: BTreeMap<String, String>,
    pub downsample: Downsample,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Downsample {
    pub resolution: i64,
}

impl Meta {
    pub fn for_range(range: TimeRange, external_labels: &Labels) -> Self {
        Self {
            block: BlockMeta {
                min_time: range.min_time,
                max_time: range.max_time,
                compaction: Compaction {
                    level: COMPACTION_LEVEL,
                },
                version: META_VERSION,
            },
            thanos: ThanosMeta {
                labels: external_labels.to_map(),
                downsample: Downsample { resolution: 0 },
                source: SOURCE.to_string(),
            },
        }
    }
}

/// One block: its metadata and the series it owns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockSpec {
    pub meta: Meta,
    pub series: Vec<SeriesSpec>,
}

impl BlockSpec {
    pub fn assemble(range: TimeRange, external_labels: &Labels, series: Vec<SeriesSpec>) -> Self {
        Self {
            meta: Meta::for_range(range, external_labels),
            series,
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.meta.block.min_time, self.meta.block.max_time)
    }
}
