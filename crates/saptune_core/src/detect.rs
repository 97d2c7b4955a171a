//! Installed SAP workload detection.
//!
//! Pure read-only filesystem probes under the SAP instance root. Absence
//! of evidence is reported as `false`, never as an error, and nothing is
//! cached - an administrator can install or remove an SAP system between
//! two calls.

use crate::paths::SystemPaths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Directory names that every NetWeaver installation carries somewhere
/// under an instance directory.
const NETWEAVER_MARKERS: [&str; 4] = ["log", "data", "work", "exe"];

/// Which SAP workloads are installed on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadPresence {
    pub netweaver: bool,
    pub hana: bool,
}

impl WorkloadPresence {
    pub fn none(&self) -> bool {
        !self.netweaver && !self.hana
    }
}

/// Probe the filesystem for installed workloads.
///
/// NetWeaver: each of the four marker names must exist under some
/// instance directory (`<root>/<SID>/log` etc.); the markers may be
/// satisfied by different instances.
/// HANA: any path of the shape `<root>/<SID>/HDB<n>/HDB` exists.
pub fn detect(paths: &SystemPaths) -> WorkloadPresence {
    let netweaver = NETWEAVER_MARKERS
        .iter()
        .all(|marker| any_instance_has(&paths.sap_root, marker));
    let hana = has_hana_binary(&paths.sap_root);
    info!(
        "SAP workload probe: netweaver={} hana={}",
        netweaver, hana
    );
    WorkloadPresence { netweaver, hana }
}

/// Immediate subdirectories of the SAP root; an unreadable or missing
/// root reads as "no instances".
fn instance_dirs(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };
    entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect()
}

fn any_instance_has(root: &Path, marker: &str) -> bool {
    instance_dirs(root)
        .iter()
        .any(|instance| instance.join(marker).exists())
}

fn has_hana_binary(root: &Path) -> bool {
    instance_dirs(root).iter().any(|instance| {
        let Ok(entries) = fs::read_dir(instance) else {
            return false;
        };
        entries.flatten().any(|entry| {
            entry.file_name().to_string_lossy().starts_with("HDB")
                && entry.path().join("HDB").exists()
        })
    })
}
