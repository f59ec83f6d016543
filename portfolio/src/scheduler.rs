use std::time::{Duration, Instant};

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    configuration::{ConfigurationError, ConfigurationList, WeightedConfiguration},
    engine::{SearchEngine, SearchStatus},
    outcome::{AttemptOutcome, AttemptRecord, RunReport, RunResult, Solution},
    slices::compute_slices,
};

/// Budget of the optimal track the portfolio was tuned for.
pub const DEFAULT_TOTAL_BUDGET: Duration = Duration::from_secs(1800);

#[derive(Debug, Clone)]
pub struct SchedulerOptions {
    /// Wall-clock budget for the whole run.
    pub total_budget: Duration,
    /// Only accept plans the planner certifies as optimal.
    pub optimal: bool,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            total_budget: DEFAULT_TOTAL_BUDGET,
            optimal: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid configuration list")]
    InvalidConfiguration(#[from] ConfigurationError),
}

/// Monotonic time source used for budget accounting.
pub trait Clock {
    /// Time since an arbitrary, fixed origin.
    fn now(&self) -> Duration;
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

pub fn run<E: SearchEngine>(
    list: &ConfigurationList,
    options: &SchedulerOptions,
    engine: E,
) -> Result<RunReport, SchedulerError> {
    run_with_clock(list, options, engine, &SystemClock::new())
}

/// Tries the configurations of `list` in order until one of them yields an
/// accepted plan or the list (or the budget) is used up.
///
/// Each configuration gets its proportional slice of the budget and never
/// more. Time a configuration leaves unused is not passed on. Engine failures
/// are charged their whole limit and the run continues with the next entry.
///
/// The engine enforces the limit: a planner stopped at its deadline comes
/// back as [`SearchStatus::TimedOut`], and any plan the engine does return
/// is accepted even if bookkeeping overhead pushed `elapsed` past the limit.
pub fn run_with_clock<E: SearchEngine, C: Clock>(
    list: &ConfigurationList,
    options: &SchedulerOptions,
    mut engine: E,
    clock: &C,
) -> Result<RunReport, SchedulerError> {
    list.validate()?;

    let slices = compute_slices(&list.weights(), options.total_budget);
    info!(
        "running portfolio {:?} ({}) with {} configurations and a budget of {:?}",
        list.name,
        list.version,
        list.len(),
        options.total_budget
    );
    debug!("time slices: {slices:?}");

    let start = clock.now();
    let mut charged_total = Duration::ZERO;
    let mut attempts = Vec::with_capacity(list.len());

    for (index, (entry, slice)) in list.iter().zip(slices).enumerate() {
        let spent = clock.now().saturating_sub(start).max(charged_total);
        let remaining = options.total_budget.saturating_sub(spent);
        if remaining.is_zero() {
            info!("budget used up before configuration #{index}, stopping");
            break;
        }

        let limit = slice.min(remaining);
        if limit.is_zero() {
            debug!("configuration #{index} got an empty time slice, skipping");
            continue;
        }

        info!(
            "configuration #{index} (weight {}) for {limit:?}: {}",
            entry.weight,
            entry.configuration.search_directive().unwrap_or_default()
        );

        let attempt_start = clock.now();
        let result = engine.search(&entry.configuration, limit);
        let elapsed = clock.now().saturating_sub(attempt_start);

        let outcome = match result {
            Ok(SearchStatus::OptimalPlan(plan)) => AttemptOutcome::SolvedOptimal(plan),
            Ok(SearchStatus::Plan(plan)) => AttemptOutcome::SolvedSuboptimal(plan),
            Ok(SearchStatus::Unsolvable) => {
                info!("configuration #{index} found no plan");
                AttemptOutcome::UnsolvedExhausted
            }
            Ok(SearchStatus::OutOfResources) => {
                info!("configuration #{index} ran out of time or memory");
                AttemptOutcome::UnsolvedExhausted
            }
            Ok(SearchStatus::TimedOut) => {
                info!("configuration #{index} was stopped at its deadline");
                AttemptOutcome::UnsolvedExhausted
            }
            Ok(SearchStatus::Crashed { reason }) => {
                warn!("configuration #{index} crashed: {reason}");
                AttemptOutcome::UnsolvedError(reason)
            }
            Err(err) => {
                let reason = error_chain(&err);
                warn!("configuration #{index} failed: {reason}");
                AttemptOutcome::UnsolvedError(reason)
            }
        };

        let charged = match outcome {
            AttemptOutcome::UnsolvedError(_) => limit.max(elapsed),
            _ => elapsed,
        };
        charged_total += charged;

        attempts.push(AttemptRecord {
            index,
            weight: entry.weight,
            slice,
            limit,
            elapsed,
            charged,
            outcome: outcome.kind(),
            error: match &outcome {
                AttemptOutcome::UnsolvedError(reason) => Some(reason.clone()),
                _ => None,
            },
        });

        match outcome {
            AttemptOutcome::SolvedOptimal(plan) => {
                info!("configuration #{index} found an optimal plan of length {}", plan.len());
                let result = RunResult::Solved(solution(index, entry, plan));
                let elapsed = clock.now().saturating_sub(start);
                return Ok(report(list, options, result, attempts, elapsed));
            }
            AttemptOutcome::SolvedSuboptimal(plan) if !options.optimal => {
                info!("configuration #{index} found a plan of length {}", plan.len());
                let result = RunResult::Solved(solution(index, entry, plan));
                let elapsed = clock.now().saturating_sub(start);
                return Ok(report(list, options, result, attempts, elapsed));
            }
            AttemptOutcome::SolvedSuboptimal(_) => {
                info!("configuration #{index} found a plan without optimality certificate, continuing");
            }
            AttemptOutcome::UnsolvedExhausted | AttemptOutcome::UnsolvedError(_) => {}
        }
    }

    info!(
        "no {}plan found within {:?}",
        if options.optimal { "optimal " } else { "" },
        options.total_budget
    );

    Ok(report(
        list,
        options,
        RunResult::Exhausted,
        attempts,
        clock.now().saturating_sub(start),
    ))
}

fn solution(
    index: usize,
    entry: &WeightedConfiguration,
    plan: sas_parser::structs::Plan,
) -> Solution {
    Solution {
        configuration_index: index,
        args: entry.configuration.args,
        actions: plan.actions,
        cost: plan.cost,
    }
}

fn report(
    list: &ConfigurationList,
    options: &SchedulerOptions,
    result: RunResult,
    attempts: Vec<AttemptRecord>,
    elapsed: Duration,
) -> RunReport {
    RunReport {
        list: list.name,
        version: list.version,
        total_budget: options.total_budget,
        result,
        attempts,
        elapsed,
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
