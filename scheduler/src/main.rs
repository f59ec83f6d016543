#![forbid(unsafe_code)]
use std::{ffi::OsString, path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use log::{debug, error};
use sas_parser::SasParseError;

mod commands;

use commands::exit_code;

#[derive(Debug, Parser)]
/// Sequential optimal planning portfolio
struct App {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report whether a translated task uses conditional effects
    Classify {
        #[arg(required = true)]
        task: PathBuf,
    },
    /// Show the configurations selected for a task and their time slices
    Slices {
        #[arg(required = true)]
        task: PathBuf,
        /// Total time budget in seconds
        #[arg(short, long, env = "PORTFOLIO_TIME_LIMIT", default_value_t = 1800)]
        time_limit: u64,
    },
    /// Run the portfolio on a translated task
    Run(Run),
}

#[derive(Args, Debug)]
pub struct Run {
    /// Translated task (usually output.sas)
    #[arg(required = true)]
    pub task: PathBuf,

    /// Search binary invoked once per configuration
    #[arg(long, env = "PORTFOLIO_PLANNER", default_value = "downward")]
    pub planner: PathBuf,

    /// Argument passed to the planner before the configuration, may be repeated
    #[arg(long = "planner-arg", allow_hyphen_values = true)]
    pub planner_args: Vec<OsString>,

    /// Total time budget in seconds
    #[arg(short, long, env = "PORTFOLIO_TIME_LIMIT", default_value_t = 1800)]
    pub time_limit: u64,

    /// Directory the planner runs in
    #[arg(long, env = "PORTFOLIO_WORK_DIR", default_value = ".")]
    pub work_dir: PathBuf,

    /// Plan file written by the planner, relative to the work dir
    #[arg(long, default_value = "sas_plan")]
    pub plan_file: PathBuf,

    /// Write the winning plan to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a JSON report of all attempts to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Discard the planner's stdout and stderr
    #[arg(long)]
    pub quiet_planner: bool,

    /// Do not treat plans found by the planner as certified optimal
    #[arg(long)]
    pub uncertified: bool,

    /// Stop at the first plan even without optimality certificate
    #[arg(long)]
    pub accept_suboptimal: bool,
}

fn main() -> ExitCode {
    let args: App = App::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    debug!("{args:?}");

    ExitCode::from(status(execute(args.command)))
}

fn execute(command: Commands) -> anyhow::Result<u8> {
    match command {
        Commands::Classify { task } => commands::classify(task).map(|_| exit_code::SUCCESS),
        Commands::Slices { task, time_limit } => {
            commands::slices(task, time_limit).map(|_| exit_code::SUCCESS)
        }
        Commands::Run(run) => commands::run(run),
    }
}

/// Maps the outcome of a command to the process exit code.
fn status(result: anyhow::Result<u8>) -> u8 {
    match result {
        Ok(code) => code,
        Err(err) => {
            error!("An error occurred: {err:#}");
            if err.downcast_ref::<SasParseError>().is_some() {
                exit_code::INPUT_ERROR
            } else {
                exit_code::CRITICAL_ERROR
            }
        }
    }
}
