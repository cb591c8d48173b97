use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds, DurationSeconds};

const ENV_PREFIX: &str = "faculty_finder";

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    pub base_url: String,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "debounce_ms")]
    pub debounce: Duration,
    /// No timeout at all when unset; a hung request stays in flight.
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    #[serde(rename = "request_timeout_secs", default)]
    pub request_timeout: Option<Duration>,
    pub log_level: String,
    #[serde(default)]
    pub sentry_dsn: Option<String>,
}

impl AppConfig {
    pub fn new_from_file_and_env(path: &str) -> Result<Self, ConfigError> {
        Self::builder_with_defaults()?
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .and_then(|cfg| cfg.try_deserialize::<Self>())
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder_with_defaults()?
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .and_then(|cfg| cfg.try_deserialize::<Self>())
    }

    /// Loads from `path` when given, otherwise from defaults and the environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::new_from_file_and_env(path),
            None => Self::from_env(),
        }
    }

    fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("base_url", "http://127.0.0.1:8000")?
            .set_default("debounce_ms", 250)?
            .set_default("log_level", "warn")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            debounce: Duration::from_millis(250),
            request_timeout: None,
            log_level: "warn".to_string(),
            sentry_dsn: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_without_file() {
        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.debounce, Duration::from_millis(250));
        assert!(cfg.request_timeout.is_none());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "base_url = \"http://directory.example:9000/\"").unwrap();
        writeln!(file, "debounce_ms = 40").unwrap();
        writeln!(file, "request_timeout_secs = 5").unwrap();

        let cfg = AppConfig::new_from_file_and_env(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.debounce, Duration::from_millis(40));
        assert_eq!(cfg.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(cfg.base_url, "http://directory.example:9000/");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AppConfig::new_from_file_and_env("/nonexistent/faculty-finder").is_err());
    }
}
