//! saptune_core - arbitration between saptune and sapconf on SAP hosts.
//!
//! Two mutually exclusive tuning subsystems can manage an SAP host:
//! saptune (the replacement) and sapconf (the legacy tool). This crate
//! provides:
//! - A sysconfig-style text editor that understands indexed array keys
//!   (`KEY_0="..."`) next to plain scalar keys.
//! - Filesystem probes that detect installed NetWeaver / HANA workloads.
//! - A drift check that decides whether sapconf's configuration still
//!   matches its shipped fillup template.
//! - The orchestrator that picks a subsystem, applies the matching
//!   tuning solution and starts the winner via external commands.
//!
//! Everything is synchronous and blocking; external commands are the only
//! side effects and the first failing step of a sequence aborts it. The
//! core never writes configuration files to disk - callers own file I/O.

pub mod command;
pub mod detect;
pub mod drift;
pub mod orchestrator;
pub mod paths;
pub mod sysconfig;

pub use command::{CmdOutput, CommandRunner, SystemRunner, STATUS_TOOL_MISSING};
pub use detect::WorkloadPresence;
pub use orchestrator::{ActivationState, AutoConfigureOutcome, TuningOrchestrator};
pub use paths::SystemPaths;
pub use sysconfig::{ScanVerdict, SysconfigEditor};
