//! End-to-end auto-configuration scenarios.
//!
//! Drives the orchestrator against a real temp filesystem (workload
//! markers, sapconf config and template) with a scripted command runner,
//! covering the three decision paths: saptune takeover, sapconf
//! preservation, and a failing tuning step.

use saptune_core::{CmdOutput, CommandRunner, SystemPaths, TuningOrchestrator};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;

/// Scripted command runner; unscripted commands succeed with no output.
/// The call log is shared so tests can inspect it after handing the
/// runner to the orchestrator.
struct ScriptedRunner {
    responses: HashMap<String, CmdOutput>,
    calls: Rc<RefCell<Vec<String>>>,
}

impl ScriptedRunner {
    fn new() -> (Self, Rc<RefCell<Vec<String>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                responses: HashMap::new(),
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }

    fn script(mut self, command: &str, status: i32, output: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            CmdOutput {
                output: output.to_string(),
                status,
            },
        );
        self
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[&str]) -> CmdOutput {
        let command = format!("{} {}", program, args.join(" "));
        self.calls.borrow_mut().push(command.clone());
        self.responses.get(&command).cloned().unwrap_or(CmdOutput {
            output: String::new(),
            status: 0,
        })
    }
}

fn install_netweaver(paths: &SystemPaths) {
    for marker in ["log", "data", "work", "exe"] {
        fs::create_dir_all(paths.sap_root.join("NW1").join(marker)).unwrap();
    }
}

fn install_hana(paths: &SystemPaths) {
    fs::create_dir_all(paths.sap_root.join("HA1/HDB00")).unwrap();
    fs::write(paths.sap_root.join("HA1/HDB00/HDB"), "").unwrap();
}

fn write_sapconf(paths: &SystemPaths, current: &str, template: &str) {
    fs::create_dir_all(paths.sapconf_config.parent().unwrap()).unwrap();
    fs::write(&paths.sapconf_config, current).unwrap();
    fs::create_dir_all(paths.sapconf_template.parent().unwrap()).unwrap();
    fs::write(&paths.sapconf_template, template).unwrap();
}

#[test]
fn netweaver_host_with_pristine_sapconf_switches_to_saptune() {
    let tmp = TempDir::new().unwrap();
    let paths = SystemPaths::under(tmp.path());
    install_netweaver(&paths);
    write_sapconf(&paths, "A=\"1\"\n", "A=\"1\"\n");

    let (runner, calls) = ScriptedRunner::new();
    let orchestrator = TuningOrchestrator::new(runner, paths);
    let outcome = orchestrator.auto_configure();

    assert!(outcome.netweaver);
    assert!(!outcome.hana);
    assert!(outcome.success);
    assert!(outcome.diagnostic.is_empty());

    // sapconf is torn down, then the solution applied, then saptune
    // started with the old-generation vocabulary (no working notes dir).
    assert_eq!(
        calls.borrow().clone(),
        vec![
            "systemctl stop sapconf.service",
            "systemctl disable sapconf.service",
            "saptune revert all",
            "saptune solution apply NETWEAVER",
            "saptune daemon start",
        ]
    );
}

#[test]
fn customized_sapconf_with_no_workload_resumes_last_profile() {
    let tmp = TempDir::new().unwrap();
    let paths = SystemPaths::under(tmp.path());
    write_sapconf(&paths, "A=\"edited\"\n", "A=\"shipped\"\n");

    let (runner, calls) = ScriptedRunner::new();
    let orchestrator = TuningOrchestrator::new(runner, paths);
    let outcome = orchestrator.auto_configure();

    assert!(!outcome.netweaver);
    assert!(!outcome.hana);
    assert!(outcome.success);
    assert!(outcome.diagnostic.is_empty());
    assert_eq!(calls.borrow().clone(), vec!["sapconf start"]);
}

#[test]
fn failing_solution_apply_aborts_before_activation() {
    let tmp = TempDir::new().unwrap();
    let paths = SystemPaths::under(tmp.path());
    install_netweaver(&paths);

    let (runner, calls) = ScriptedRunner::new();
    let runner = runner.script(
        "saptune solution apply NETWEAVER",
        5,
        "solution NETWEAVER cannot be applied",
    );
    let orchestrator = TuningOrchestrator::new(runner, paths);
    let outcome = orchestrator.auto_configure();

    assert!(outcome.netweaver);
    assert!(!outcome.success);
    assert_eq!(outcome.diagnostic, "solution NETWEAVER cannot be applied");
    // The start command must never run after a failed apply.
    assert!(!calls
        .borrow()
        .iter()
        .any(|c| c == "saptune daemon start" || c == "saptune service takeover"));
}

#[test]
fn customized_sapconf_failure_short_circuits() {
    let tmp = TempDir::new().unwrap();
    let paths = SystemPaths::under(tmp.path());
    install_netweaver(&paths);
    install_hana(&paths);
    write_sapconf(&paths, "A=\"edited\"\n", "A=\"shipped\"\n");

    let (runner, calls) = ScriptedRunner::new();
    let runner = runner.script("sapconf netweaver", 1, "netweaver setup failed");
    let orchestrator = TuningOrchestrator::new(runner, paths);
    let outcome = orchestrator.auto_configure();

    assert!(outcome.netweaver);
    assert!(outcome.hana);
    assert!(!outcome.success);
    assert_eq!(outcome.diagnostic, "netweaver setup failed");
    assert!(!calls.borrow().iter().any(|c| c == "sapconf hana"));
}

#[test]
fn new_generation_takeover_with_combined_solution() {
    let tmp = TempDir::new().unwrap();
    let paths = SystemPaths::under(tmp.path());
    install_netweaver(&paths);
    install_hana(&paths);
    fs::create_dir_all(&paths.saptune_working_notes).unwrap();
    fs::create_dir_all(&paths.saptune_solutions).unwrap();

    let (runner, calls) = ScriptedRunner::new();
    let orchestrator = TuningOrchestrator::new(runner, paths);
    let outcome = orchestrator.auto_configure();

    assert!(outcome.success);
    assert_eq!(
        calls.borrow().clone(),
        vec![
            "systemctl stop sapconf.service",
            "systemctl disable sapconf.service",
            "saptune revert all",
            "saptune solution apply NETWEAVER+HANA",
            "saptune service takeover",
        ]
    );
}
