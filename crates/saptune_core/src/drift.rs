//! Configuration drift check for sapconf.
//!
//! sapconf is only replaced by saptune when its configuration has never
//! deviated from the shipped fillup template. The comparison is semantic:
//! the live file and the template are parsed through the sysconfig editor
//! and their `(index, key) -> value` maps compared, so reordered lines or
//! different comments do not count as drift. A missing file on either
//! side means there is nothing worth preserving, so the answer defaults
//! to "replaceable".

use crate::paths::SystemPaths;
use crate::sysconfig::SysconfigEditor;
use std::collections::HashMap;
use std::fs;
use tracing::info;

/// True when sapconf's configuration matches its template (or either
/// file is absent) and saptune may take over.
pub fn can_replace_sapconf(paths: &SystemPaths) -> bool {
    let template = if paths.sapconf_template.exists() {
        &paths.sapconf_template
    } else {
        &paths.sapconf_template_fallback
    };

    let (Ok(current), Ok(shipped)) = (
        fs::read_to_string(&paths.sapconf_config),
        fs::read_to_string(template),
    ) else {
        info!("sapconf configuration or template absent, sapconf is replaceable");
        return true;
    };

    let unmodified = entry_map(&current) == entry_map(&shipped);
    info!(
        "sapconf configuration {} its template",
        if unmodified { "matches" } else { "deviates from" }
    );
    unmodified
}

fn entry_map(text: &str) -> HashMap<(Option<usize>, String), String> {
    SysconfigEditor::from_text(text)
        .entries()
        .into_iter()
        .map(|(key, index, value)| ((index, key), value))
        .collect()
}
