use std::{cell::Cell, collections::VecDeque, fs, path::Path, rc::Rc, time::Duration};

use portfolio::{
    engine::{EngineError, ProcessEngine, ProcessEngineOptions},
    run, run_with_clock,
    scheduler::Clock,
    tables::{self, ADL_CONFIGS, STRIPS_CONFIGS},
    Configuration, ConfigurationList, RunResult, SchedulerOptions, SearchEngine, SearchStatus,
    WeightedConfiguration,
};
use sas_parser::{has_conditional_effects, structs::Plan};

const STRIPS_TASK: &str = "begin_version\n3\nend_version\nbegin_metric\n0\nend_metric\n\
1\nbegin_variable\nvar0\n-1\n2\nAtom at(a)\nAtom at(b)\nend_variable\n0\n\
begin_state\n0\nend_state\nbegin_goal\n1\n0 1\nend_goal\n\
1\nbegin_operator\nmove a b\n0\n1\n0 0 0 1\n1\nend_operator\n0\n";

const ADL_TASK: &str = "begin_version\n3\nend_version\nbegin_metric\n0\nend_metric\n\
2\nbegin_variable\nvar0\n-1\n2\nAtom at(a)\nAtom at(b)\nend_variable\n\
begin_variable\nvar1\n-1\n2\nAtom lit()\nNegatedAtom lit()\nend_variable\n0\n\
begin_state\n0\n0\nend_state\nbegin_goal\n1\n0 1\nend_goal\n\
1\nbegin_operator\nmove-if-lit a b\n0\n1\n1 1 0 0 0 1\n1\nend_operator\n0\n";

#[derive(Clone, Default)]
struct ManualClock(Rc<Cell<Duration>>);

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.0.get()
    }
}

enum Step {
    /// Uses the whole limit without finding anything.
    Timeout,
    Optimal(Duration, Plan),
}

struct ScriptedEngine {
    clock: ManualClock,
    steps: VecDeque<Step>,
    calls: Vec<(&'static [&'static str], Duration)>,
}

impl ScriptedEngine {
    fn new(clock: &ManualClock, steps: Vec<Step>) -> Self {
        Self {
            clock: clock.clone(),
            steps: steps.into(),
            calls: vec![],
        }
    }
}

impl SearchEngine for ScriptedEngine {
    fn search(
        &mut self,
        configuration: &Configuration,
        time_limit: Duration,
    ) -> Result<SearchStatus, EngineError> {
        self.calls.push((configuration.args, time_limit));
        let now = self.clock.0.get();

        match self.steps.pop_front().expect("unexpected attempt") {
            Step::Timeout => {
                self.clock.0.set(now + time_limit);
                Ok(SearchStatus::TimedOut)
            }
            Step::Optimal(takes, plan) => {
                self.clock.0.set(now + takes);
                Ok(SearchStatus::OptimalPlan(plan))
            }
        }
    }
}

fn write_task(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("output.sas");
    fs::write(&path, content).unwrap();
    path
}

fn plan(actions: &[&str]) -> Plan {
    Plan {
        actions: actions.iter().map(|action| action.to_string()).collect(),
        cost: Some(actions.len() as u64),
    }
}

fn options(secs: u64) -> SchedulerOptions {
    SchedulerOptions {
        total_budget: Duration::from_secs(secs),
        optimal: true,
    }
}

#[test]
fn conditional_effects_select_adl_and_first_configuration_wins() {
    let dir = tempfile::tempdir().unwrap();
    let task = write_task(dir.path(), ADL_TASK);

    let list = tables::select(has_conditional_effects(&task).unwrap());
    assert_eq!(list.name, ADL_CONFIGS.name);

    let clock = ManualClock::default();
    let mut engine = ScriptedEngine::new(
        &clock,
        vec![Step::Optimal(Duration::from_secs(1), plan(&["move-if-lit a b"]))],
    );

    let report = run_with_clock(list, &options(1800), &mut engine, &clock).unwrap();

    let solution = report.solution().unwrap();
    assert_eq!(solution.configuration_index, 0);
    assert_eq!(solution.actions, vec!["move-if-lit a b"]);
    assert_eq!(engine.calls.len(), 1);
    assert_eq!(engine.calls[0].0, ADL_CONFIGS.entries[0].configuration.args);
    assert!(engine.calls[0].1 < Duration::from_secs(4));
}

#[test]
fn strips_task_third_configuration_wins() {
    let dir = tempfile::tempdir().unwrap();
    let task = write_task(dir.path(), STRIPS_TASK);

    let list = tables::select(has_conditional_effects(&task).unwrap());
    assert_eq!(list.name, STRIPS_CONFIGS.name);

    let clock = ManualClock::default();
    let mut engine = ScriptedEngine::new(
        &clock,
        vec![
            Step::Timeout,
            Step::Timeout,
            Step::Optimal(Duration::from_secs(30), plan(&["move a b"])),
        ],
    );

    let report = run_with_clock(list, &options(1800), &mut engine, &clock).unwrap();

    let solution = report.solution().unwrap();
    assert_eq!(solution.configuration_index, 2);
    assert_eq!(solution.args, STRIPS_CONFIGS.entries[2].configuration.args);
    assert_eq!(engine.calls.len(), 3);
    for (call, entry) in engine.calls.iter().zip(STRIPS_CONFIGS.iter()) {
        assert_eq!(call.0, entry.configuration.args);
    }
}

#[test]
fn exhausting_every_slice_uses_the_whole_budget() {
    let clock = ManualClock::default();
    let steps = STRIPS_CONFIGS.iter().map(|_| Step::Timeout).collect();
    let mut engine = ScriptedEngine::new(&clock, steps);

    let report = run_with_clock(&STRIPS_CONFIGS, &options(1800), &mut engine, &clock).unwrap();

    assert_eq!(report.result, RunResult::Exhausted);
    assert_eq!(engine.calls.len(), STRIPS_CONFIGS.len());
    assert_eq!(report.elapsed, Duration::from_secs(1800));
    assert_eq!(
        engine.calls.iter().map(|call| call.1).sum::<Duration>(),
        Duration::from_secs(1800)
    );
    assert!(!report.all_attempts_failed());
}

#[cfg(unix)]
#[test]
fn planner_process_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let task = write_task(dir.path(), STRIPS_TASK);
    let list = tables::select(has_conditional_effects(&task).unwrap());

    // Only configurations with landmark declarations "solve" the task.
    let script = "cat > /dev/null
case \" $* \" in
    *\" --landmarks \"*) printf '(move a b)\\n; cost = 1 (unit cost)\\n' > sas_plan; exit 0;;
    *) exit 7;;
esac";
    let mut engine_options = ProcessEngineOptions::new("sh", &task);
    engine_options.planner_args = vec!["-c".into(), script.into(), "planner".into()];
    engine_options.working_dir = dir.path().to_path_buf();
    engine_options.inherit_output = false;

    let report = run(list, &options(20), ProcessEngine::new(engine_options)).unwrap();

    let solution = report.solution().unwrap();
    assert_eq!(solution.configuration_index, 1);
    assert_eq!(solution.actions, vec!["move a b"]);
    assert_eq!(solution.cost, Some(1));
}

#[cfg(unix)]
#[test]
fn plan_found_just_before_the_deadline_is_kept() {
    static SINGLE: ConfigurationList = ConfigurationList {
        name: "single",
        version: "test",
        entries: &[WeightedConfiguration::new(1, &["--search", "astar(blind())"])],
    };

    let dir = tempfile::tempdir().unwrap();
    let task = write_task(dir.path(), STRIPS_TASK);

    let mut engine_options = ProcessEngineOptions::new("sh", &task);
    engine_options.planner_args = vec![
        "-c".into(),
        "sleep 0.8; printf '(a)\\n' > sas_plan".into(),
        "planner".into(),
    ];
    engine_options.working_dir = dir.path().to_path_buf();
    engine_options.inherit_output = false;

    let report = run(&SINGLE, &options(1), ProcessEngine::new(engine_options)).unwrap();

    assert_eq!(report.solution().unwrap().actions, vec!["a"]);
}

#[test]
fn missing_planner_fails_every_attempt() {
    let dir = tempfile::tempdir().unwrap();
    let task = write_task(dir.path(), ADL_TASK);

    let mut engine_options = ProcessEngineOptions::new(dir.path().join("no-such-planner"), &task);
    engine_options.working_dir = dir.path().to_path_buf();

    let report = run(&ADL_CONFIGS, &options(10), ProcessEngine::new(engine_options)).unwrap();

    assert_eq!(report.result, RunResult::Exhausted);
    assert_eq!(report.attempts.len(), ADL_CONFIGS.len());
    assert!(report.all_attempts_failed());
}
