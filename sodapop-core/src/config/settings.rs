//! Application settings: defaults, then ~/.config/sodapop/config.toml, then
//! environment variables.

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use log::warn;
use serde::{Deserialize, Deserializer};

use crate::error::{SodapopError, SodapopResult};

static DEFAULT_DATA_DIR: &str = "~/.local/share/sodapop";

/// Which event backend serves the local (non-Firebase) mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataSource {
    #[default]
    Mock,
    Scraper,
}

impl DataSource {
    /// Unknown names fall back to `Mock`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "MOCK" | "" => DataSource::Mock,
            "SCRAPER" => DataSource::Scraper,
            other => {
                warn!("Unknown data source {other}, using MOCK");
                DataSource::Mock
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Mock => f.write_str("MOCK"),
            DataSource::Scraper => f.write_str("SCRAPER"),
        }
    }
}

impl<'de> Deserialize<'de> for DataSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(DataSource::from_name(&name))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("sodapop"))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn default_mock_latency_ms() -> u64 {
    500
}

fn default_profile_poll_ms() -> u64 {
    2000
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Keep events and the profile in Firebase instead of local files
    #[serde(default)]
    pub use_firebase: bool,

    #[serde(default)]
    pub data_source: DataSource,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_mock_latency_ms")]
    pub mock_latency_ms: u64,

    #[serde(default = "default_profile_poll_ms")]
    pub profile_poll_ms: u64,
}

impl Settings {
    pub fn config_path() -> SodapopResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SodapopError::Config("Could not determine config directory".into()))?
            .join("sodapop");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the user config file and the process environment.
    pub fn load() -> SodapopResult<Self> {
        let config_path = Self::config_path()?;
        Self::build(&config_path, Environment::default())
    }

    /// Load from `config_path` with `env` standing in for the process
    /// environment.
    pub fn load_from(
        config_path: &Path,
        env: impl IntoIterator<Item = (String, String)>,
    ) -> SodapopResult<Self> {
        let vars: config::Map<String, String> = env.into_iter().collect();
        Self::build(config_path, Environment::default().source(Some(vars)))
    }

    fn build(config_path: &Path, env: Environment) -> SodapopResult<Self> {
        Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(env)
            .build()
            .map_err(|e| SodapopError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SodapopError::Config(e.to_string()))
    }

    /// Directory for local-mode storage, with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("config.toml"), env(&[])).unwrap();

        assert!(!settings.use_firebase);
        assert_eq!(settings.data_source, DataSource::Mock);
        assert_eq!(settings.mock_latency_ms, 500);
        assert_eq!(settings.profile_poll_ms, 2000);
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "data_source = \"SCRAPER\"\nmock_latency_ms = 100\n").unwrap();

        let settings = Settings::load_from(
            &path,
            env(&[("USE_FIREBASE", "true"), ("MOCK_LATENCY_MS", "0")]),
        )
        .unwrap();

        assert!(settings.use_firebase);
        assert_eq!(settings.data_source, DataSource::Scraper);
        assert_eq!(settings.mock_latency_ms, 0);
    }

    #[test]
    fn unknown_data_source_falls_back_to_mock() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(
            &dir.path().join("config.toml"),
            env(&[("DATA_SOURCE", "carrier-pigeon")]),
        )
        .unwrap();

        assert_eq!(settings.data_source, DataSource::Mock);
    }

    #[test]
    fn data_path_expands_tilde() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(
            &dir.path().join("config.toml"),
            env(&[("DATA_DIR", "~/sodapop-data")]),
        )
        .unwrap();

        assert_eq!(settings.data_dir, PathBuf::from("~/sodapop-data"));
        assert!(!settings.data_path().starts_with("~"));
        assert!(settings.data_path().ends_with("sodapop-data"));
    }

    #[test]
    fn data_source_names_are_case_insensitive() {
        assert_eq!(DataSource::from_name("scraper"), DataSource::Scraper);
        assert_eq!(DataSource::from_name("MOCK"), DataSource::Mock);
        assert_eq!(DataSource::Scraper.to_string(), "SCRAPER");
    }
}
