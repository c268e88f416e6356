//! Configuration stored in `.prospect-tracker/prospect-tracker.toml`.
//!
//! Every section and key is optional; missing values take the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_DIR: &str = ".prospect-tracker";
pub const CONFIG_FILE: &str = "prospect-tracker.toml";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub ai: AiConfig,
    pub tracker: TrackerConfig,
    pub gamification: GamificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: DEFAULT_PORT }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file, relative to the project root unless absolute.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: Path::new(CONFIG_DIR).join("prospects.db"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the OpenRouter key.
    pub api_key_env: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: ai::openrouter::DEFAULT_BASE_URL.to_string(),
            model: ai::DEFAULT_MODEL.to_string(),
            timeout_secs: ai::DEFAULT_GENERATION_TIMEOUT.as_secs(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl AiConfig {
    /// Key from the configured environment variable, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    pub upcoming_window_days: u32,
    pub accountability_window_days: u32,
    pub backfill_on_startup: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            upcoming_window_days: tracker::DEFAULT_UPCOMING_WINDOW_DAYS,
            accountability_window_days: prospect_core::DEFAULT_ACCOUNTABILITY_WINDOW_DAYS,
            backfill_on_startup: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GamificationConfig {
    pub stats_path: PathBuf,
}

impl Default for GamificationConfig {
    fn default() -> Self {
        Self {
            stats_path: Path::new(CONFIG_DIR).join("gamification.json"),
        }
    }
}

impl AppConfig {
    pub fn config_path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Reads the project's config file, or defaults when it does not exist.
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let path = Self::config_path(project_root);
        if !path.exists() {
            debug!(path = %path.display(), "Config file does not exist, using defaults");
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn database_path(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.database.path)
    }

    pub fn database_url(&self, project_root: &Path) -> String {
        format!("sqlite:{}", self.database_path(project_root).display())
    }

    pub fn stats_path(&self, project_root: &Path) -> PathBuf {
        resolve(project_root, &self.gamification.stats_path)
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [ai]
            model = "anthropic/claude-3.5-haiku"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ai.model, "anthropic/claude-3.5-haiku");
        assert_eq!(config.ai.api_key_env, DEFAULT_API_KEY_ENV);
        assert_eq!(config.ai.timeout_secs, 10);
        assert_eq!(config.tracker.upcoming_window_days, 7);
        assert_eq!(config.tracker.accountability_window_days, 14);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(AppConfig::load(dir.path()).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_written_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.tracker.backfill_on_startup = true;

        let path = AppConfig::config_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, config.to_toml().unwrap()).unwrap();

        assert_eq!(AppConfig::load(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = AppConfig::config_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[server]\nport = \"not a number\"").unwrap();

        let err = AppConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_relative_paths_resolve_against_root() {
        let config = AppConfig::default();
        let root = Path::new("/srv/sales");
        assert_eq!(
            config.database_path(root),
            PathBuf::from("/srv/sales/.prospect-tracker/prospects.db")
        );
        assert_eq!(
            config.database_url(root),
            "sqlite:/srv/sales/.prospect-tracker/prospects.db"
        );
    }
}
