//! Block spec sink used by `blockgen generate`.
//!
//! Directory layout, one entry per block:
//!
//! ```text
//! <output>/0000-1-7200000/meta.json
//! <output>/0000-1-7200000/series.json
//! ```

use anyhow::{Context, Result};
use blockgen_core::BlockSpec;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum Output {
    Dir(PathBuf),
    Stdout,
}

#[derive(Debug)]
pub struct BlockWriter {
    output: Output,
    written: usize,
    series: usize,
}

impl BlockWriter {
    pub fn new(output: Output) -> Result<Self> {
        if let Output::Dir(root) = &output {
            fs::create_dir_all(root)
                .with_context(|| format!("failed to create output dir {}", root.display()))?;
        }
        Ok(Self {
            output,
            written: 0,
            series: 0,
        })
    }

    pub fn write(&mut self, block: &BlockSpec) -> Result<()> {
        match &self.output {
            Output::Dir(root) => write_dir(root, self.written, block)?,
            Output::Stdout => {
                let mut out = std::io::stdout().lock();
                serde_json::to_writer(&mut out, block)?;
                writeln!(out)?;
            }
        }
        self.written += 1;
        self.series += block.series.len();
        Ok(())
    }

    pub fn blocks_written(&self) -> usize {
        self.written
    }

    pub fn series_written(&self) -> usize {
        self.series
    }
}

pub fn block_dir_name(seq: usize, block: &BlockSpec) -> String {
    let r = block.range();
    format!("{seq:04}-{}-{}", r.min_time, r.max_time)
}

fn write_dir(root: &Path, seq: usize, block: &BlockSpec) -> Result<()> {
    let dir = root.join(block_dir_name(seq, block));
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let meta = serde_json::to_vec_pretty(&block.meta)?;
    fs::write(dir.join("meta.json"), meta)
        .with_context(|| format!("failed to write {}/meta.json", dir.display()))?;

    let series = serde_json::to_vec_pretty(&block.series)?;
    fs::write(dir.join("series.json"), series)
        .with_context(|| format!("failed to write {}/series.json", dir.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockgen_core::{ContinuousAppMetric, Labels, SeriesSpecFn, TimeRange};

    fn block() -> BlockSpec {
        BlockSpec::assemble(
            TimeRange::new(1, 7_200_000),
            &Labels::from_pairs([("cluster", "bench")]),
            vec![ContinuousAppMetric.generate(1, 0, "")],
        )
    }

    #[test]
    fn writes_meta_and_series() {
        let tmp = tempfile::tempdir().unwrap();
        let mut w = BlockWriter::new(Output::Dir(tmp.path().join("out"))).unwrap();
        w.write(&block()).unwrap();
        assert_eq!(w.blocks_written(), 1);
        assert_eq!(w.series_written(), 1);

        let dir = tmp.path().join("out").join("0000-1-7200000");
        let meta: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.join("meta.json")).unwrap()).unwrap();
        assert_eq!(meta["maxTime"], 7_200_000);
        assert_eq!(meta["thanos"]["labels"]["cluster"], "bench");

        let series: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.join("series.json")).unwrap()).unwrap();
        assert_eq!(series[0]["labels"]["__name__"], "continuous_app_metric0");
    }
}
