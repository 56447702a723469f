use crate::cli::args::GenerateArgs;
use crate::exit_codes::{CANCELLED, CONFIG_ERROR, GENERATION_FAILED, SUCCESS};
use crate::writer::{BlockWriter, Output};
use anyhow::{Context, Result};
use blockgen_core::builtin::{self, BuiltinProfile};
use blockgen_core::{BlockSpec, CancellationToken, GenerateError, Label, Labels, Plan, Profile};
use tracing::{info, warn};

/// Where the plan and the series factory come from.
pub enum Source {
    Profile(Profile),
    Builtin(BuiltinProfile),
}

impl Source {
    pub fn load(args: &GenerateArgs) -> Result<Self> {
        if let Some(name) = &args.builtin {
            let profile = builtin::lookup(name).with_context(|| {
                let known: Vec<&str> = builtin::names().collect();
                format!("unknown builtin profile {name:?} (known: {})", known.join(", "))
            })?;
            return Ok(Source::Builtin(profile));
        }
        let path = args
            .profile
            .as_ref()
            .context("either --profile or --builtin is required")?;
        let profile = Profile::from_file(path)
            .with_context(|| format!("failed to load profile {}", path.display()))?;
        Ok(Source::Profile(profile))
    }

    pub fn plan(&self) -> Plan {
        match self {
            Source::Profile(p) => p.plan(),
            Source::Builtin(b) => b.plan.clone(),
        }
    }

    pub fn generate<S>(
        &self,
        cancel: &CancellationToken,
        external_labels: &Labels,
        sink: S,
    ) -> Result<(), GenerateError>
    where
        S: FnMut(BlockSpec) -> Result<()>,
    {
        match self {
            Source::Profile(p) => p
                .plan()
                .generate(&p.series_spec(), cancel, external_labels, sink),
            Source::Builtin(b) => b.plan.generate(&b.series, cancel, external_labels, sink),
        }
    }
}

pub fn parse_labels(raw: &[String]) -> Result<Labels> {
    raw.iter()
        .map(|s| {
            let (name, value) = s
                .split_once('=')
                .with_context(|| format!("invalid label {s:?}: expected NAME=VALUE"))?;
            let name = name.trim();
            if name.is_empty() {
                anyhow::bail!("invalid label {s:?}: empty name");
            }
            Ok(Label::new(name, value))
        })
        .collect()
}

pub async fn run(args: GenerateArgs) -> Result<i32> {
    let external = match parse_labels(&args.labels) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Config error: {e}");
            return Ok(CONFIG_ERROR);
        }
    };
    let source = match Source::load(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {e:#}");
            return Ok(CONFIG_ERROR);
        }
    };
    let output = if args.stdout {
        Output::Stdout
    } else {
        Output::Dir(args.output.clone())
    };
    let mut writer = match BlockWriter::new(output) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("generation failed before the first block: {e:#}");
            return Ok(GENERATION_FAILED);
        }
    };

    let plan = source.plan();
    info!(
        blocks = plan.ranges.len(),
        horizon = %humantime::format_duration(plan.horizon()),
        targets = plan.targets,
        metrics_per_target = plan.metrics_per_target,
        "generating block specs"
    );

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, stopping after the current block");
                cancel.cancel();
            }
        })
    };

    // Generation and the writer block on file I/O; keep them off the runtime.
    let result = tokio::task::spawn_blocking(move || {
        let res = source.generate(&cancel, &external, |b| writer.write(&b));
        (res, writer)
    })
    .await
    .context("generation task panicked")?;
    interrupt.abort();

    let (res, writer) = result;
    match res {
        Ok(()) => {
            info!(
                blocks = writer.blocks_written(),
                series = writer.series_written(),
                "done"
            );
            Ok(SUCCESS)
        }
        Err(GenerateError::Cancelled) => {
            eprintln!(
                "cancelled after {} block(s)",
                writer.blocks_written()
            );
            Ok(CANCELLED)
        }
        Err(GenerateError::Sink(e)) => {
            eprintln!(
                "generation failed after {} block(s): {e:#}",
                writer.blocks_written()
            );
            Ok(GENERATION_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_external_labels() {
        let labels = parse_labels(&["cluster=a".into(), "expr=x=y".into()]).unwrap();
        assert_eq!(labels, Labels::from_pairs([("cluster", "a"), ("expr", "x=y")]));
    }

    #[test]
    fn rejects_malformed_labels() {
        assert!(parse_labels(&["novalue".into()]).is_err());
        assert!(parse_labels(&["=v".into()]).is_err());
    }
}
