pub mod configuration;
pub mod engine;
pub mod outcome;
pub mod scheduler;
pub mod slices;
pub mod tables;

pub use configuration::{Configuration, ConfigurationList, WeightedConfiguration};
pub use engine::{SearchEngine, SearchStatus};
pub use outcome::{AttemptOutcome, OutcomeKind, RunReport, RunResult, Solution};
pub use scheduler::{run, run_with_clock, SchedulerOptions};
