//! Well-known filesystem locations, injectable for tests.

use std::path::PathBuf;

/// Every path the probes and the drift check look at. Defaults to the
/// real system locations; tests point the fields at temp directories.
#[derive(Debug, Clone)]
pub struct SystemPaths {
    /// Root under which SAP instances live (`/usr/sap`).
    pub sap_root: PathBuf,
    /// Present only on the newer saptune generation with the
    /// `service ...` command surface.
    pub saptune_working_notes: PathBuf,
    /// Present only when saptune supports combined solution names
    /// such as `NETWEAVER+HANA`.
    pub saptune_solutions: PathBuf,
    /// Live sapconf configuration.
    pub sapconf_config: PathBuf,
    /// Shipped sapconf fillup template, primary location.
    pub sapconf_template: PathBuf,
    /// Fallback template location used when the primary is absent.
    pub sapconf_template_fallback: PathBuf,
}

impl Default for SystemPaths {
    fn default() -> Self {
        Self {
            sap_root: PathBuf::from("/usr/sap"),
            saptune_working_notes: PathBuf::from("/var/lib/saptune/working/notes"),
            saptune_solutions: PathBuf::from("/usr/share/saptune/solutions"),
            sapconf_config: PathBuf::from("/etc/sysconfig/sapconf"),
            sapconf_template: PathBuf::from("/var/adm/fillup-templates/sysconfig.sapconf"),
            sapconf_template_fallback: PathBuf::from(
                "/usr/share/fillup-templates/sysconfig.sapconf",
            ),
        }
    }
}

impl SystemPaths {
    /// All paths rooted under an alternate filesystem root. Tests use
    /// this with a temp directory so nothing on the host system can
    /// satisfy a probe by accident.
    pub fn under(root: &std::path::Path) -> Self {
        Self {
            sap_root: root.join("usr/sap"),
            saptune_working_notes: root.join("var/lib/saptune/working/notes"),
            saptune_solutions: root.join("usr/share/saptune/solutions"),
            sapconf_config: root.join("etc/sysconfig/sapconf"),
            sapconf_template: root.join("var/adm/fillup-templates/sysconfig.sapconf"),
            sapconf_template_fallback: root.join("usr/share/fillup-templates/sysconfig.sapconf"),
        }
    }
}
