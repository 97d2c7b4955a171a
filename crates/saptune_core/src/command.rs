//! External command execution.
//!
//! Runs a named program, captures stdout and stderr as one merged text
//! blob and reports the exit status. "Tool not installed" is an ordinary
//! outcome here, reported through the reserved status 127 instead of an
//! error - the tuning tools are optional packages and callers must keep
//! working when one of them is absent.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::process::Command;
use tracing::{error, info, warn};

/// Reserved status reported when the executable cannot be located.
pub const STATUS_TOOL_MISSING: i32 = 127;

/// Captured result of one command invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmdOutput {
    /// Merged stdout + stderr, exactly as the program printed it.
    pub output: String,
    /// Exit code; 127 means the tool is not installed, -1 means the
    /// process died without a code (signal) or could not be spawned.
    pub status: i32,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }

    pub fn tool_missing(&self) -> bool {
        self.status == STATUS_TOOL_MISSING
    }
}

/// Seam for orchestrator tests: production code spawns real processes,
/// tests substitute a scripted runner.
pub trait CommandRunner {
    /// Run `program` with `args`, blocking until it exits.
    fn run(&self, program: &str, args: &[&str]) -> CmdOutput;
}

/// The real thing: spawns the program via `std::process::Command`.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> CmdOutput {
        match Command::new(program).args(args).output() {
            Ok(out) => {
                let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&out.stderr));
                let status = out.status.code().unwrap_or(-1);
                info!(
                    "{} {}: exit={} {}",
                    program,
                    args.join(" "),
                    status,
                    text.trim_end()
                );
                CmdOutput { output: text, status }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                error!("{} is not installed", program);
                CmdOutput {
                    output: String::new(),
                    status: STATUS_TOOL_MISSING,
                }
            }
            Err(e) => {
                warn!("failed to spawn {}: {}", program, e);
                CmdOutput {
                    output: format!("failed to spawn {program}: {e}"),
                    status: -1,
                }
            }
        }
    }
}
