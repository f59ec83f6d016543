use std::{io, path::PathBuf, time::Duration};

use sas_parser::{structs::Plan, SasParseError};
use thiserror::Error;

use crate::configuration::Configuration;

pub mod process;

pub use process::{ProcessEngine, ProcessEngineOptions};

/// What the planner reported for one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// A plan certified optimal by the planner.
    OptimalPlan(Plan),
    /// A plan without an optimality certificate.
    Plan(Plan),
    /// The search space was exhausted without finding a plan.
    Unsolvable,
    /// The planner gave up: time or memory ran out, or an incomplete search
    /// finished without a plan.
    OutOfResources,
    /// The engine killed the planner when its time limit passed.
    TimedOut,
    Crashed { reason: String },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not launch planner {program:?}")]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not open task file {path:?}")]
    Task {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not read plan file {path:?}")]
    PlanFile {
        path: PathBuf,
        #[source]
        source: SasParseError,
    },
    #[error("I/O error while running the planner")]
    Io(#[from] io::Error),
}

pub trait SearchEngine {
    /// Runs `configuration` on a fresh planner instance for at most `time_limit`.
    fn search(
        &mut self,
        configuration: &Configuration,
        time_limit: Duration,
    ) -> Result<SearchStatus, EngineError>;
}

impl<E: SearchEngine + ?Sized> SearchEngine for &mut E {
    fn search(
        &mut self,
        configuration: &Configuration,
        time_limit: Duration,
    ) -> Result<SearchStatus, EngineError> {
        (**self).search(configuration, time_limit)
    }
}
