//! User settings
//!
//! Handles loading the handful of user-level settings the engine consumes:
//! height (for BMI), goal weight (for the goal-journey percent), whether
//! the user tracks alcohol (gates the alcohol trigger factor), and the
//! protein-per-kg target. Supports TOML config files and environment
//! variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// User settings consumed by the engine
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Height in centimetres; BMI is only computed when present
    #[serde(default)]
    pub height_cm: Option<f64>,

    /// Goal weight in kilograms; goal progress is only computed when present
    #[serde(default)]
    pub goal_weight_kg: Option<f64>,

    /// Whether the user tracks alcohol at all
    #[serde(default = "default_drinks_alcohol")]
    pub drinks_alcohol: bool,

    /// Daily protein target in grams per kilogram of body weight
    #[serde(default)]
    pub protein_per_kg: Option<f64>,
}

fn default_drinks_alcohol() -> bool {
    false
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            height_cm: None,
            goal_weight_kg: None,
            drinks_alcohol: default_drinks_alcohol(),
            protein_per_kg: None,
        }
    }
}

/// Errors that can occur loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(settings)
    }

    /// Load settings from a file, then apply environment overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = Self::load(path)?;
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Load from the default location or fall back to environment-only
    ///
    /// The default path is `<config dir>/pulselog/settings.toml`.
    pub fn load_default() -> Self {
        let default_path = dirs::config_dir().map(|p| p.join("pulselog").join("settings.toml"));

        if let Some(path) = default_path {
            if path.exists() {
                match Self::load_with_env(&path) {
                    Ok(settings) => {
                        tracing::info!("Loaded settings from {:?}", path);
                        return settings;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load settings from {:?}: {}", path, e);
                    }
                }
            }
        }

        let mut settings = Settings::default();
        settings.apply_env_overrides();
        settings
    }

    /// Apply `PULSELOG_*` environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(height) = std::env::var("PULSELOG_HEIGHT_CM") {
            if let Ok(h) = height.parse() {
                self.height_cm = Some(h);
            }
        }
        if let Ok(goal) = std::env::var("PULSELOG_GOAL_WEIGHT_KG") {
            if let Ok(g) = goal.parse() {
                self.goal_weight_kg = Some(g);
            }
        }
        if let Ok(drinks) = std::env::var("PULSELOG_DRINKS_ALCOHOL") {
            if let Ok(d) = drinks.parse() {
                self.drinks_alcohol = d;
            }
        }
        if let Ok(protein) = std::env::var("PULSELOG_PROTEIN_PER_KG") {
            if let Ok(p) = protein.parse() {
                self.protein_per_kg = Some(p);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.height_cm, None);
        assert_eq!(settings.goal_weight_kg, None);
        assert!(!settings.drinks_alcohol);
        assert_eq!(settings.protein_per_kg, None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "height_cm = 178.0\ngoal_weight_kg = 82.5\ndrinks_alcohol = true\nprotein_per_kg = 1.6"
        )
        .unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.height_cm, Some(178.0));
        assert_eq!(settings.goal_weight_kg, Some(82.5));
        assert!(settings.drinks_alcohol);
        assert_eq!(settings.protein_per_kg, Some(1.6));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "height_cm = 165.0").unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.height_cm, Some(165.0));
        assert!(!settings.drinks_alcohol);
        assert_eq!(settings.goal_weight_kg, None);
    }

    #[test]
    fn test_load_errors() {
        let missing = Settings::load(Path::new("/nonexistent/settings.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "height_cm = \"not a number\"").unwrap();
        let bad = Settings::load(file.path());
        assert!(matches!(bad, Err(ConfigError::Parse { .. })));
    }
}
