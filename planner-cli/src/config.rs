//! Planner configuration at ~/.config/planner/config.toml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

static DEFAULT_EVENTS_FILE: &str = "~/planner/events.json";
const DEFAULT_SPAN_DAYS: i64 = 7;

fn default_events_file() -> PathBuf {
    PathBuf::from(DEFAULT_EVENTS_FILE)
}

fn default_span_days() -> i64 {
    DEFAULT_SPAN_DAYS
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlannerConfig {
    /// JSON file holding the stored event definitions
    #[serde(default = "default_events_file")]
    pub events_file: PathBuf,

    /// Days shown by `expand` when no --to is given
    #[serde(default = "default_span_days")]
    pub default_span_days: i64,

    /// Sort expanded occurrences across events by start time
    #[serde(default)]
    pub sort: bool,
}

impl PlannerConfig {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("planner");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user config, creating a commented default file on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path`, with PLANNER_* environment variables taking precedence.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config: PlannerConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("PLANNER").try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read config file at {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        tracing::debug!(path = %path.display(), ?config, "Loaded config");
        Ok(config)
    }

    /// Events file path with `~` expanded.
    pub fn events_path(&self) -> PathBuf {
        let full_path_str =
            shellexpand::tilde(&self.events_file.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn create_default_config(path: &Path) -> Result<()> {
        let contents = format!(
            "\
# planner configuration

# Where your events are stored:
# events_file = \"{}\"

# Days shown by `planner expand` when --to is not given:
# default_span_days = {}

# Sort occurrences of all events by start time:
# sort = false
",
            DEFAULT_EVENTS_FILE, DEFAULT_SPAN_DAYS
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Could not create config directory at {}", parent.display())
            })?;
        }

        std::fs::write(path, contents)
            .with_context(|| format!("Could not write config file at {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner").join("config.toml");

        PlannerConfig::create_default_config(&path).unwrap();
        let config = PlannerConfig::load_from(&path).unwrap();

        assert_eq!(config.events_file, PathBuf::from(DEFAULT_EVENTS_FILE));
        assert_eq!(config.default_span_days, DEFAULT_SPAN_DAYS);
    }

    #[test]
    fn reads_values_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "events_file = \"/tmp/my-events.json\"\ndefault_span_days = 31\n",
        )
        .unwrap();

        let config = PlannerConfig::load_from(&path).unwrap();

        assert_eq!(config.events_path(), PathBuf::from("/tmp/my-events.json"));
        assert_eq!(config.default_span_days, 31);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlannerConfig::load_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.default_span_days, DEFAULT_SPAN_DAYS);
    }

    #[test]
    fn events_path_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlannerConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(config.events_path().ends_with("planner/events.json"));
    }
}
