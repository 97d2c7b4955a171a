//! The tuning decision state machine.
//!
//! Decides whether saptune or sapconf should tune this host and drives
//! that decision through their command line tools. Sequencing rules:
//! nothing is retried, and the first failing command of a sequence aborts
//! the remaining steps with its captured output as the diagnostic.
//!
//! saptune grew a new command surface over time: the old generation is
//! driven with `daemon status|start|stop`, the new one with
//! `service status|takeover|disablestop`. The generation is a filesystem
//! probe, resolved once per public operation.

use crate::command::{CmdOutput, CommandRunner};
use crate::detect::{self, WorkloadPresence};
use crate::drift;
use crate::paths::SystemPaths;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// saptune's own view of its activation, mapped from the status
/// subcommand's exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationState {
    /// Running and tuning is applied (exit 0).
    Active,
    /// The saptune service is stopped (exit 1).
    Stopped,
    /// Running but not configured as the tuning provider (exit 2).
    NotConfigured,
    /// Running with no notes or solutions applied (exit 3).
    NotTuned,
    /// Any other exit code, including a missing saptune binary.
    Unknown,
}

impl ActivationState {
    pub fn from_exit_code(code: i32) -> Self {
        match code {
            0 => Self::Active,
            1 => Self::Stopped,
            2 => Self::NotConfigured,
            3 => Self::NotTuned,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Stopped => "stopped",
            Self::NotConfigured => "not configured",
            Self::NotTuned => "not tuned",
            Self::Unknown => "unknown",
        }
    }
}

/// Result of [`TuningOrchestrator::auto_configure`]: which workloads were
/// targeted, whether every step succeeded, and the failing step's output
/// when one did not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoConfigureOutcome {
    pub netweaver: bool,
    pub hana: bool,
    pub success: bool,
    pub diagnostic: String,
}

impl AutoConfigureOutcome {
    fn failed(workloads: WorkloadPresence, diagnostic: String) -> Self {
        Self {
            netweaver: workloads.netweaver,
            hana: workloads.hana,
            success: false,
            diagnostic,
        }
    }

    fn succeeded(workloads: WorkloadPresence) -> Self {
        Self {
            netweaver: workloads.netweaver,
            hana: workloads.hana,
            success: true,
            diagnostic: String::new(),
        }
    }
}

/// Old vs new saptune command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Generation {
    /// `daemon ...` verbs, tuned.service underneath.
    Daemon,
    /// `service ...` verbs, saptune.service underneath.
    Service,
}

impl Generation {
    fn probe(paths: &SystemPaths) -> Self {
        if paths.saptune_working_notes.exists() {
            Self::Service
        } else {
            Self::Daemon
        }
    }

    fn status_args(self) -> &'static [&'static str] {
        match self {
            Self::Service => &["service", "status"],
            Self::Daemon => &["daemon", "status"],
        }
    }

    fn start_args(self) -> &'static [&'static str] {
        match self {
            Self::Service => &["service", "takeover"],
            Self::Daemon => &["daemon", "start"],
        }
    }

    fn stop_args(self) -> &'static [&'static str] {
        match self {
            Self::Service => &["service", "disablestop"],
            Self::Daemon => &["daemon", "stop"],
        }
    }

    fn tuning_service(self) -> &'static str {
        match self {
            Self::Service => "saptune.service",
            Self::Daemon => "tuned.service",
        }
    }
}

/// One orchestrator per process, constructed with the command runner and
/// the path set it should operate on, then passed by reference to
/// whichever caller (CLI, unattended import) drives it.
pub struct TuningOrchestrator<R: CommandRunner> {
    runner: R,
    paths: SystemPaths,
}

impl<R: CommandRunner> TuningOrchestrator<R> {
    pub fn new(runner: R, paths: SystemPaths) -> Self {
        Self { runner, paths }
    }

    /// Current saptune activation state.
    pub fn state(&self) -> ActivationState {
        let generation = Generation::probe(&self.paths);
        let out = self.saptune(generation.status_args());
        ActivationState::from_exit_code(out.status)
    }

    /// Whether the generation-appropriate tuning service is enabled at
    /// boot, via `systemctl is-enabled`.
    pub fn is_service_enabled(&self) -> bool {
        let generation = Generation::probe(&self.paths);
        self.systemctl(&["is-enabled", generation.tuning_service()])
            .success()
    }

    /// Enable+start or disable+stop saptune. Enabling tears down sapconf
    /// first - the two subsystems must never run together. Activation can
    /// take tens of seconds; the call blocks throughout.
    pub fn set_enabled(&self, enable: bool) -> (bool, String) {
        let generation = Generation::probe(&self.paths);
        if enable {
            self.disable_sapconf();
        }
        let args = if enable {
            generation.start_args()
        } else {
            generation.stop_args()
        };
        let out = self.saptune(args);
        if out.success() {
            (true, String::new())
        } else {
            (false, out.output)
        }
    }

    /// Unattended entry point: a caller-owned desired-state flag collapses
    /// to either a full auto-configuration or a plain disable.
    pub fn apply(&self, enable: bool) -> (bool, String) {
        if enable {
            let outcome = self.auto_configure();
            (outcome.success, outcome.diagnostic)
        } else {
            self.set_enabled(false)
        }
    }

    /// The composite decision procedure.
    ///
    /// When sapconf's configuration is unmodified it is disposable no
    /// matter whether it currently runs: sapconf is torn down, prior
    /// saptune tuning reverted, the solution matching the detected
    /// workloads applied and saptune started. With no workload detected
    /// no solution is applied but saptune is still started - baseline
    /// tuning without a solution is intentional.
    ///
    /// When sapconf was customized it must be preserved, so its own
    /// workload setup verbs run instead (`start` resumes the last active
    /// profile when no workload is present).
    pub fn auto_configure(&self) -> AutoConfigureOutcome {
        let workloads = detect::detect(&self.paths);
        let generation = Generation::probe(&self.paths);

        if drift::can_replace_sapconf(&self.paths) {
            info!("tuning system with saptune");
            self.disable_sapconf();

            // Earlier tuning must not stack with the new solution. A
            // failed revert is not fatal on a host that was never tuned.
            let revert = self.saptune(&["revert", "all"]);
            if !revert.success() {
                warn!("saptune revert all: {}", revert.output.trim_end());
            }

            for solution in self.solutions_for(workloads) {
                let out = self.saptune(&["solution", "apply", solution]);
                if !out.success() {
                    return AutoConfigureOutcome::failed(workloads, out.output);
                }
            }

            let out = self.saptune(generation.start_args());
            if !out.success() {
                return AutoConfigureOutcome::failed(workloads, out.output);
            }
            return AutoConfigureOutcome::succeeded(workloads);
        }

        info!("sapconf configuration was customized, tuning system with sapconf");
        let verbs: Vec<&str> = if workloads.none() {
            vec!["start"]
        } else {
            let mut v = Vec::new();
            if workloads.netweaver {
                v.push("netweaver");
            }
            if workloads.hana {
                v.push("hana");
            }
            v
        };
        for verb in verbs {
            let out = self.sapconf(&[verb]);
            if !out.success() {
                return AutoConfigureOutcome::failed(workloads, out.output);
            }
        }
        AutoConfigureOutcome::succeeded(workloads)
    }

    /// Solution names to apply for the detected workload combination.
    /// Newer saptune ships combined solutions, the old one needs two
    /// separate applies for NetWeaver+HANA.
    fn solutions_for(&self, workloads: WorkloadPresence) -> Vec<&'static str> {
        match (workloads.netweaver, workloads.hana) {
            (true, true) if self.paths.saptune_solutions.exists() => vec!["NETWEAVER+HANA"],
            (true, true) => vec!["NETWEAVER", "HANA"],
            (true, false) => vec!["NETWEAVER"],
            (false, true) => vec!["HANA"],
            (false, false) => Vec::new(),
        }
    }

    /// Stop and disable sapconf's service. Failures are logged and
    /// tolerated - sapconf may simply not be installed.
    fn disable_sapconf(&self) {
        for action in ["stop", "disable"] {
            let out = self.systemctl(&[action, "sapconf.service"]);
            if !out.success() {
                info!(
                    "failed to {} sapconf.service: {}",
                    action,
                    out.output.trim_end()
                );
            }
        }
    }

    fn saptune(&self, args: &[&str]) -> CmdOutput {
        self.runner.run("saptune", args)
    }

    fn sapconf(&self, args: &[&str]) -> CmdOutput {
        self.runner.run("sapconf", args)
    }

    fn systemctl(&self, args: &[&str]) -> CmdOutput {
        self.runner.run("systemctl", args)
    }
}
