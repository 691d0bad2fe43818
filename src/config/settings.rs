//! Wizard runtime settings.
//!
//! Tunables for the session sweep: how long a session may sit idle before it
//! is evicted and how often the sweep runs. Loaded from `race_manager.toml`
//! when present, with environment variable overrides, so a deployment can
//! adjust them without a rebuild.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default idle lifetime of a wizard session, in minutes.
pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 60;

/// Default interval between eviction sweeps, in minutes.
pub const DEFAULT_SWEEP_INTERVAL_MINUTES: u64 = 10;

/// Session lifecycle tunables.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct WizardSettings {
    /// Sessions idle for longer than this are evicted
    #[serde(default = "default_idle")]
    pub session_idle_minutes: u64,
    /// How often the eviction sweep runs
    #[serde(default = "default_sweep")]
    pub sweep_interval_minutes: u64,
}

const fn default_idle() -> u64 {
    DEFAULT_SESSION_IDLE_MINUTES
}

const fn default_sweep() -> u64 {
    DEFAULT_SWEEP_INTERVAL_MINUTES
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            session_idle_minutes: DEFAULT_SESSION_IDLE_MINUTES,
            sweep_interval_minutes: DEFAULT_SWEEP_INTERVAL_MINUTES,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    wizard: Option<WizardSettings>,
}

/// Loads wizard settings from a TOML file.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<WizardSettings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read settings file: {e}"),
    })?;

    let file: SettingsFile = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings file: {e}"),
    })?;

    Ok(file.wizard.unwrap_or_default())
}

/// Loads wizard settings from the default location (`./race_manager.toml`),
/// applying environment overrides (`SESSION_IDLE_MINUTES`,
/// `SWEEP_INTERVAL_MINUTES`). A missing file just yields the defaults.
#[must_use]
pub fn load_default_settings() -> WizardSettings {
    let mut settings = load_settings("race_manager.toml").unwrap_or_default();

    if let Some(minutes) = env_u64("SESSION_IDLE_MINUTES") {
        settings.session_idle_minutes = minutes;
    }
    if let Some(minutes) = env_u64("SWEEP_INTERVAL_MINUTES") {
        settings.sweep_interval_minutes = minutes;
    }

    settings
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_wizard_settings() {
        let toml_str = r"
            [wizard]
            session_idle_minutes = 30
            sweep_interval_minutes = 5
        ";

        let file: SettingsFile = toml::from_str(toml_str).unwrap();
        let settings = file.wizard.unwrap();
        assert_eq!(settings.session_idle_minutes, 30);
        assert_eq!(settings.sweep_interval_minutes, 5);
    }

    #[test]
    fn test_partial_settings_fall_back_to_defaults() {
        let toml_str = r"
            [wizard]
            session_idle_minutes = 90
        ";

        let file: SettingsFile = toml::from_str(toml_str).unwrap();
        let settings = file.wizard.unwrap();
        assert_eq!(settings.session_idle_minutes, 90);
        assert_eq!(
            settings.sweep_interval_minutes,
            DEFAULT_SWEEP_INTERVAL_MINUTES
        );
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let result = load_settings("definitely_missing.toml");
        assert!(result.is_err());

        let settings = WizardSettings::default();
        assert_eq!(settings.session_idle_minutes, DEFAULT_SESSION_IDLE_MINUTES);
    }
}
