use std::{
    ffi::OsString,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
    time::Duration,
};

use log::{debug, info, warn};
use sas_parser::{parse_plan, SasParseError};
use wait_timeout::ChildExt;

use super::{EngineError, SearchEngine, SearchStatus};
use crate::configuration::Configuration;

/// Exit codes of the search component.
pub mod exit_code {
    pub const PLAN_FOUND: i32 = 0;
    pub const CRITICAL_ERROR: i32 = 1;
    pub const INPUT_ERROR: i32 = 2;
    pub const UNSUPPORTED: i32 = 3;
    pub const UNSOLVABLE: i32 = 4;
    pub const UNSOLVED_INCOMPLETE: i32 = 5;
    pub const OUT_OF_MEMORY: i32 = 6;
    pub const TIMEOUT: i32 = 7;
    pub const TIMEOUT_AND_MEMORY: i32 = 8;
}

pub const DEFAULT_PLAN_FILE: &str = "sas_plan";

#[derive(Debug, Clone)]
pub struct ProcessEngineOptions {
    /// Search binary.
    pub planner: PathBuf,
    /// Arguments placed before the configuration's own arguments.
    pub planner_args: Vec<OsString>,
    /// Translated task, fed to the planner on stdin.
    pub task: PathBuf,
    /// Directory the planner runs in and writes its plan file to.
    pub working_dir: PathBuf,
    pub plan_file: PathBuf,
    /// Whether a plan-found exit certifies optimality. True for portfolios
    /// made of admissible A* configurations only.
    pub plans_are_optimal: bool,
    pub inherit_output: bool,
}

impl ProcessEngineOptions {
    pub fn new(planner: impl Into<PathBuf>, task: impl Into<PathBuf>) -> Self {
        Self {
            planner: planner.into(),
            planner_args: vec![],
            task: task.into(),
            working_dir: PathBuf::from("."),
            plan_file: PathBuf::from(DEFAULT_PLAN_FILE),
            plans_are_optimal: true,
            inherit_output: true,
        }
    }
}

/// Runs every configuration as a separate planner process.
#[derive(Debug)]
pub struct ProcessEngine {
    options: ProcessEngineOptions,
}

impl ProcessEngine {
    pub fn new(options: ProcessEngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProcessEngineOptions {
        &self.options
    }

    pub fn plan_path(&self) -> PathBuf {
        self.options.working_dir.join(&self.options.plan_file)
    }

    fn remove_stale_plan(&self, path: &Path) -> Result<(), EngineError> {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!("removed stale plan file {path:?}");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(EngineError::Io(err)),
        }
    }

    /// Waits for the child, killing its process group once `time_limit` has
    /// passed. Returns `None` if the planner had to be killed.
    fn wait_with_limit(
        &self,
        child: &mut Child,
        time_limit: Duration,
    ) -> io::Result<Option<ExitStatus>> {
        match child.wait_timeout(time_limit)? {
            Some(status) => {
                // Helpers the planner left behind must not outlive the attempt.
                if let Err(err) = terminate(child) {
                    warn!("could not kill leftover planner processes: {err}");
                }
                Ok(Some(status))
            }
            None => {
                terminate(child)?;
                child.wait()?;
                Ok(None)
            }
        }
    }

    fn interpret(&self, status: ExitStatus, plan_path: PathBuf) -> Result<SearchStatus, EngineError> {
        match status.code() {
            Some(exit_code::PLAN_FOUND) => {
                let content = match fs::read_to_string(&plan_path) {
                    Ok(content) => content,
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {
                        return Ok(SearchStatus::Crashed {
                            reason: format!("planner reported a plan but wrote no {plan_path:?}"),
                        })
                    }
                    Err(err) => {
                        return Err(EngineError::PlanFile {
                            path: plan_path,
                            source: SasParseError::Read(err),
                        })
                    }
                };

                let plan = parse_plan(&content).map_err(|source| EngineError::PlanFile {
                    path: plan_path,
                    source,
                })?;
                info!("planner found a plan with {} actions", plan.len());

                if self.options.plans_are_optimal {
                    Ok(SearchStatus::OptimalPlan(plan))
                } else {
                    Ok(SearchStatus::Plan(plan))
                }
            }
            Some(exit_code::UNSOLVABLE) => Ok(SearchStatus::Unsolvable),
            Some(
                exit_code::UNSOLVED_INCOMPLETE
                | exit_code::OUT_OF_MEMORY
                | exit_code::TIMEOUT
                | exit_code::TIMEOUT_AND_MEMORY,
            ) => Ok(SearchStatus::OutOfResources),
            Some(code) => Ok(SearchStatus::Crashed {
                reason: format!("planner exited with code {code}"),
            }),
            None => Ok(SearchStatus::Crashed {
                reason: format!("planner terminated abnormally ({status})"),
            }),
        }
    }
}

impl SearchEngine for ProcessEngine {
    fn search(
        &mut self,
        configuration: &Configuration,
        time_limit: Duration,
    ) -> Result<SearchStatus, EngineError> {
        let plan_path = self.plan_path();
        self.remove_stale_plan(&plan_path)?;

        let task = File::open(&self.options.task).map_err(|source| EngineError::Task {
            path: self.options.task.clone(),
            source,
        })?;

        let mut command = Command::new(&self.options.planner);
        command
            .args(&self.options.planner_args)
            .args(configuration.args)
            .current_dir(&self.options.working_dir)
            .stdin(Stdio::from(task));
        if !self.options.inherit_output {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        debug!("launching {command:?}");
        let mut child = command.spawn().map_err(|source| EngineError::Launch {
            program: self.options.planner.clone(),
            source,
        })?;

        let status = match self.wait_with_limit(&mut child, time_limit) {
            Ok(status) => status,
            Err(err) => {
                if let Err(kill_err) = terminate(&mut child) {
                    warn!("could not kill planner after wait failure: {kill_err}");
                }
                return Err(EngineError::Io(err));
            }
        };

        match status {
            Some(status) => {
                debug!("planner finished: {status}");
                self.interpret(status, plan_path)
            }
            None => {
                info!("planner killed after reaching its time limit of {time_limit:?}");
                Ok(SearchStatus::TimedOut)
            }
        }
    }
}

/// Kills the planner together with every process it started.
#[cfg(unix)]
fn terminate(child: &mut Child) -> io::Result<()> {
    use nix::{
        errno::Errno,
        sys::signal::{killpg, Signal},
        unistd::Pid,
    };

    // The planner leads its own group, so the group id is its pid.
    let group = Pid::from_raw(child.id() as i32);
    match killpg(group, Signal::SIGKILL) {
        // Nobody left in the group.
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(io::Error::from(errno)),
    }
}

#[cfg(not(unix))]
fn terminate(child: &mut Child) -> io::Result<()> {
    match child.kill() {
        Ok(()) => Ok(()),
        // Already exited.
        Err(err) if err.kind() == io::ErrorKind::InvalidInput => Ok(()),
        Err(err) => Err(err),
    }
}
