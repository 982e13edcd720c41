//! File I/O for the terminal host

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use spanlink_core::{Annotator, AnnotatorConfig, SessionExport};

/// Read a plain-text document
pub fn load_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Read a session previously written by [`export_session`]
pub fn load_session(path: &Path) -> Result<SessionExport> {
    let json = load_file(path)?;
    spanlink_core::from_json(&json)
        .with_context(|| format!("Failed to parse session: {}", path.display()))
}

/// Read annotator settings from a JSON file
pub fn load_config(path: &Path) -> Result<AnnotatorConfig> {
    let json = load_file(path)?;
    AnnotatorConfig::from_json(&json)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}

/// Get the ~/.spanlink directory path, creating it if needed
pub fn spanlink_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    let dir = home.join(".spanlink");

    if !dir.exists() {
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    Ok(dir)
}

/// Export the session to `~/.spanlink/<stem>.json`
pub fn export_session(annotator: &Annotator, stem: &str) -> Result<PathBuf> {
    let export_path = spanlink_dir()?.join(format!("{}.json", stem));

    let json = spanlink_core::to_json(annotator).context("Failed to serialize session")?;

    fs::write(&export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    Ok(export_path)
}

/// Route `log` output to `~/.spanlink/spanlink.log` so it never draws over
/// the terminal UI. `RUST_LOG` overrides the default `info` level.
pub fn init_logging() -> Result<PathBuf> {
    let log_path = spanlink_dir()?.join("spanlink.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open {}", log_path.display()))?;

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    Ok(log_path)
}
