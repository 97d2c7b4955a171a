//! Subcommand implementations.

use crate::ConfigOp;
use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use saptune_core::{
    ActivationState, SysconfigEditor, SystemPaths, SystemRunner, TuningOrchestrator,
};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

/// File-level failures of the `config` subcommands. Everything else in
/// the core reports through return values, never errors.
#[derive(Debug, Error)]
enum ConfigFileError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn orchestrator() -> TuningOrchestrator<SystemRunner> {
    TuningOrchestrator::new(SystemRunner, SystemPaths::default())
}

pub fn status(json: bool) -> Result<()> {
    let orch = orchestrator();
    let state = orch.state();
    let enabled = orch.is_service_enabled();

    if json {
        println!(
            "{}",
            serde_json::json!({ "state": state, "service_enabled": enabled })
        );
        return Ok(());
    }

    let rendered = match state {
        ActivationState::Active => state.as_str().green().to_string(),
        ActivationState::Stopped => state.as_str().yellow().to_string(),
        _ => state.as_str().red().to_string(),
    };
    println!("saptune: {rendered}");
    println!(
        "service: {}",
        if enabled {
            "enabled".green().to_string()
        } else {
            "disabled".yellow().to_string()
        }
    );
    Ok(())
}

pub fn set_enabled(enable: bool) -> Result<()> {
    let (ok, diagnostic) = orchestrator().set_enabled(enable);
    let verb = if enable { "enable" } else { "disable" };
    if !ok {
        if !diagnostic.is_empty() {
            eprintln!("{}", diagnostic.trim_end());
        }
        bail!("could not {verb} saptune");
    }
    println!("saptune {verb}d");
    Ok(())
}

pub fn auto_configure(json: bool) -> Result<()> {
    let outcome = orchestrator().auto_configure();

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        if !outcome.success {
            bail!("auto-configuration failed");
        }
        return Ok(());
    }

    println!(
        "NetWeaver: {}",
        if outcome.netweaver { "tuned" } else { "not present" }
    );
    println!(
        "HANA:      {}",
        if outcome.hana { "tuned" } else { "not present" }
    );
    if !outcome.success {
        if !outcome.diagnostic.is_empty() {
            eprintln!("{}", outcome.diagnostic.trim_end());
        }
        bail!("auto-configuration failed");
    }
    println!("{}", "tuning activated".green());
    Ok(())
}

pub fn apply(enable: bool) -> Result<()> {
    let (ok, diagnostic) = orchestrator().apply(enable);
    if !ok {
        if !diagnostic.is_empty() {
            eprintln!("{}", diagnostic.trim_end());
        }
        bail!("apply failed");
    }
    println!(
        "tuning {}",
        if enable { "configured and enabled" } else { "disabled" }
    );
    Ok(())
}

pub fn config(op: ConfigOp) -> Result<()> {
    match op {
        ConfigOp::Keys { file } => {
            for key in load(&file)?.keys() {
                println!("{key}");
            }
        }
        ConfigOp::Get { file, key } => println!("{}", load(&file)?.get(&key)),
        ConfigOp::Set { file, key, value } => {
            let mut doc = load_or_empty(&file)?;
            doc.set(&key, &value);
            save(&file, &doc)?;
        }
        ConfigOp::ArrayLen { file, key } => println!("{}", load(&file)?.array_len(&key)),
        ConfigOp::ArrayGet { file, key, index } => {
            println!("{}", load(&file)?.array_get(&key, index))
        }
        ConfigOp::ArraySet {
            file,
            key,
            index,
            value,
        } => {
            let mut doc = load_or_empty(&file)?;
            doc.array_set(&key, index, &value);
            save(&file, &doc)?;
        }
        ConfigOp::ArrayResize { file, key, len } => {
            let mut doc = load_or_empty(&file)?;
            doc.array_resize(&key, len);
            save(&file, &doc)?;
        }
    }
    Ok(())
}

fn load(path: &Path) -> Result<SysconfigEditor> {
    let text = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(SysconfigEditor::from_text(&text))
}

/// Mutating subcommands start from an empty document when the file does
/// not exist yet.
fn load_or_empty(path: &Path) -> Result<SysconfigEditor> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(SysconfigEditor::from_text(&text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(SysconfigEditor::from_text("")),
        Err(source) => Err(ConfigFileError::Read {
            path: path.display().to_string(),
            source,
        }
        .into()),
    }
}

fn save(path: &Path, doc: &SysconfigEditor) -> Result<()> {
    fs::write(path, doc.to_text()).map_err(|source| ConfigFileError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}
