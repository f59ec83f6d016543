use std::{fs, time::Duration};

use anyhow::{Context, Result};
use log::{error, info, warn};
use portfolio::{
    engine::{ProcessEngine, ProcessEngineOptions},
    tables, SchedulerOptions,
};
use sas_parser::has_conditional_effects;

use super::exit_code;
use crate::Run;

/// Runs the portfolio and returns the process exit code for its outcome.
pub fn run(args: Run) -> Result<u8> {
    let list = tables::select(has_conditional_effects(&args.task)?);

    fs::create_dir_all(&args.work_dir)
        .with_context(|| format!("could not create work dir {:?}", args.work_dir))?;

    let mut engine_options = ProcessEngineOptions::new(args.planner, &args.task);
    engine_options.planner_args = args.planner_args;
    engine_options.working_dir = args.work_dir;
    engine_options.plan_file = args.plan_file;
    engine_options.inherit_output = !args.quiet_planner;
    engine_options.plans_are_optimal = !args.uncertified;

    let options = SchedulerOptions {
        total_budget: Duration::from_secs(args.time_limit),
        optimal: !args.accept_suboptimal,
    };

    let report = portfolio::run(list, &options, ProcessEngine::new(engine_options))?;

    if let Some(path) = &args.report {
        let writer = fs::File::create(path)
            .with_context(|| format!("could not create report file {path:?}"))?;
        serde_json::to_writer_pretty(&writer, &report)?;
        info!("Wrote run report to: {path:?}");
    }

    match report.solution() {
        Some(solution) => {
            info!(
                "configuration #{} solved the task with {} actions (cost {:?}) after {:?}",
                solution.configuration_index,
                solution.actions.len(),
                solution.cost,
                report.elapsed
            );

            if let Some(output) = &args.output {
                fs::write(output, solution.plan().to_string())
                    .with_context(|| format!("could not write plan to {output:?}"))?;
                info!("Wrote plan to: {output:?}");
            }

            Ok(exit_code::PLAN_FOUND)
        }
        None if report.all_attempts_failed() => {
            error!("every configuration failed with a solver error");
            Ok(exit_code::SOLVER_ERROR)
        }
        None => {
            warn!(
                "no optimal plan found within the budget of {}s",
                args.time_limit
            );
            Ok(exit_code::NO_OPTIMAL_PLAN)
        }
    }
}
