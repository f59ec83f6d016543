use std::time::Duration;

use sas_parser::structs::Plan;
use serde::Serialize;

/// Result of running one configuration once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    SolvedOptimal(Plan),
    SolvedSuboptimal(Plan),
    UnsolvedExhausted,
    UnsolvedError(String),
}

impl AttemptOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            AttemptOutcome::SolvedOptimal(_) => OutcomeKind::SolvedOptimal,
            AttemptOutcome::SolvedSuboptimal(_) => OutcomeKind::SolvedSuboptimal,
            AttemptOutcome::UnsolvedExhausted => OutcomeKind::UnsolvedExhausted,
            AttemptOutcome::UnsolvedError(_) => OutcomeKind::UnsolvedError,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    SolvedOptimal,
    SolvedSuboptimal,
    UnsolvedExhausted,
    UnsolvedError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    /// Position of the configuration in its list.
    pub index: usize,
    pub weight: u32,
    /// Proportional share of the total budget.
    pub slice: Duration,
    /// Time limit actually handed to the engine.
    pub limit: Duration,
    pub elapsed: Duration,
    /// Time booked against the total budget.
    pub charged: Duration,
    pub outcome: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub configuration_index: usize,
    pub args: &'static [&'static str],
    pub actions: Vec<String>,
    pub cost: Option<u64>,
}

impl Solution {
    pub fn plan(&self) -> Plan {
        Plan {
            actions: self.actions.clone(),
            cost: self.cost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunResult {
    Solved(Solution),
    /// No accepted plan before the list or the budget ran out.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub list: &'static str,
    pub version: &'static str,
    pub total_budget: Duration,
    pub result: RunResult,
    pub attempts: Vec<AttemptRecord>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn solution(&self) -> Option<&Solution> {
        match &self.result {
            RunResult::Solved(solution) => Some(solution),
            RunResult::Exhausted => None,
        }
    }

    /// True when nothing was solved and every attempt that ran failed to
    /// produce an answer because of an engine error.
    pub fn all_attempts_failed(&self) -> bool {
        self.solution().is_none()
            && !self.attempts.is_empty()
            && self
                .attempts
                .iter()
                .all(|attempt| attempt.outcome == OutcomeKind::UnsolvedError)
    }
}
