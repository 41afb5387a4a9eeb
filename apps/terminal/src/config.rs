//! Settings resolution: settings file, then command-line overrides.

use crate::cli::Cli;
use anyhow::{Context, Result};
use drill_core::DrillSettings;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "code-drill";
const SETTINGS_FILE: &str = "settings.json";

/// Platform location of the settings file.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
}

/// Read settings from an explicit file, or from the default location when
/// it exists. Falls back to defaults.
pub fn load_settings(explicit: Option<&Path>) -> Result<DrillSettings> {
    if let Some(path) = explicit {
        return read_settings(path);
    }

    match default_settings_path() {
        Some(path) if path.is_file() => read_settings(&path),
        _ => {
            tracing::debug!("no settings file found, using defaults");
            Ok(DrillSettings::default())
        }
    }
}

fn read_settings(path: &Path) -> Result<DrillSettings> {
    tracing::info!(path = %path.display(), "reading settings");
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid settings file {}", path.display()))
}

/// Effective settings for this run.
pub fn resolve(cli: &Cli) -> Result<DrillSettings> {
    let base = load_settings(cli.config.as_deref())?;
    let settings = base.merge(&cli.overrides(&base));
    settings.validate()?;
    tracing::debug!(?settings, "resolved settings");
    Ok(settings)
}
