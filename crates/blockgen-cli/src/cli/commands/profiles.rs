use crate::exit_codes::SUCCESS;
use anyhow::Result;
use blockgen_core::builtin;
use blockgen_core::Strategy;

pub fn run() -> Result<i32> {
    println!(
        "{:<26} {:<10} {:<8} {:<10} DESCRIPTION",
        "NAME", "HORIZON", "BLOCKS", "ROLLOUT"
    );
    for p in builtin::all() {
        let rollout = match p.plan.strategy {
            Strategy::Continuous => "-".to_string(),
            Strategy::RealisticK8s { rollout_interval } => {
                humantime::format_duration(rollout_interval).to_string()
            }
        };
        println!(
            "{:<26} {:<10} {:<8} {:<10} {}",
            p.name,
            humantime::format_duration(p.plan.horizon()).to_string(),
            p.plan.ranges.len(),
            rollout,
            p.description
        );
    }
    Ok(SUCCESS)
}
