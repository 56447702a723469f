use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "blockgen",
    version,
    about = "Plan synthetic TSDB blocks for benchmarks: block windows, rollouts and series labels"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate block specs from a profile document or a builtin profile
    Generate(GenerateArgs),
    /// List builtin profiles
    Profiles,
    /// Check a profile document and print what it would generate
    Validate(ValidateArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Profile document (YAML)
    #[arg(long, conflicts_with = "builtin", required_unless_present = "builtin")]
    pub profile: Option<PathBuf>,

    /// Name of a builtin profile (see `blockgen profiles`)
    #[arg(long)]
    pub builtin: Option<String>,

    /// Directory receiving one sub-directory per block
    #[arg(long, short, default_value = "blocks")]
    pub output: PathBuf,

    /// Print one JSON block spec per line instead of writing files
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// External label attached to every block (repeatable)
    #[arg(long = "label", value_name = "NAME=VALUE")]
    pub labels: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    pub profile: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_requires_a_source() {
        assert!(Cli::try_parse_from(["blockgen", "generate"]).is_err());
        assert!(Cli::try_parse_from([
            "blockgen",
            "generate",
            "--profile",
            "p.yaml",
            "--builtin",
            "continuous-1w-small"
        ])
        .is_err());
    }

    #[test]
    fn generate_collects_labels() {
        let cli = Cli::try_parse_from([
            "blockgen",
            "generate",
            "--builtin",
            "continuous-1w-small",
            "--label",
            "cluster=a",
            "--label",
            "region=eu",
            "--stdout",
        ])
        .unwrap();
        let Command::Generate(args) = cli.cmd else {
            panic!("expected generate");
        };
        assert_eq!(args.labels, vec!["cluster=a", "region=eu"]);
        assert!(args.stdout);
        assert_eq!(args.output, PathBuf::from("blocks"));
    }
}
