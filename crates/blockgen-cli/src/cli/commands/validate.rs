use crate::cli::args::ValidateArgs;
use crate::exit_codes::{CONFIG_ERROR, SUCCESS};
use anyhow::Result;
use blockgen_core::{partition, schedule, Profile, Strategy};

pub fn run(args: ValidateArgs) -> Result<i32> {
    let profile = match Profile::from_file(&args.profile) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Config error: {e}");
            return Ok(CONFIG_ERROR);
        }
    };

    let plan = profile.plan();
    let mut total_series = 0usize;
    println!("{:<6} {:<14} {:<14} {:<8} SERIES", "BLOCK", "MIN_TIME", "MAX_TIME", "WINDOWS");
    for (i, range) in partition(&plan.ranges).into_iter().enumerate() {
        let windows = match plan.strategy {
            Strategy::Continuous => 1,
            Strategy::RealisticK8s { rollout_interval } => schedule(range, rollout_interval).len(),
        };
        let series = windows * plan.targets;
        total_series += series;
        println!(
            "{:<6} {:<14} {:<14} {:<8} {}",
            i, range.min_time, range.max_time, windows, series
        );
    }
    println!();
    println!(
        "OK: {} block(s), {} series spec(s), horizon {}",
        plan.ranges.len(),
        total_series,
        humantime::format_duration(plan.horizon())
    );
    Ok(SUCCESS)
}
