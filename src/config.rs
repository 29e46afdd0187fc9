//! Configuration module

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default artifact file, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "modelo_rendimiento_academico.json";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Interface to bind
    pub bind_address: String,

    /// Primary model artifact location
    pub model_path: PathBuf,

    /// Fallback URL for the model artifact (None disables the remote attempt)
    pub model_url: Option<String>,

    /// Timeout for the remote artifact fetch, in seconds
    pub model_fetch_timeout_secs: u64,

    /// Expected SHA-256 of the artifact bytes (lowercase hex)
    pub model_sha256: Option<String>,

    /// Environment (development, production)
    pub environment: String,

    /// Log output format ("text" or "json")
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "0.0.0.0".to_string(),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model_url: None,
            model_fetch_timeout_secs: 10,
            model_sha256: None,
            environment: "development".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or(defaults.bind_address),

            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            model_url: non_empty(env::var("MODEL_URL").ok()),

            model_fetch_timeout_secs: env::var("MODEL_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.model_fetch_timeout_secs),

            model_sha256: non_empty(env::var("MODEL_SHA256").ok())
                .map(|h| h.to_ascii_lowercase()),

            environment: env::var("ENVIRONMENT")
                .unwrap_or(defaults.environment),

            log_format: env::var("LOG_FORMAT")
                .unwrap_or(defaults.log_format),
        }
    }

    /// Whether logs should be emitted as JSON lines
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    pub fn model_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.model_fetch_timeout_secs)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert!(config.model_url.is_none());
        assert_eq!(config.model_fetch_timeout(), Duration::from_secs(10));
        assert!(!config.json_logs());
    }

    #[test]
    fn test_blank_values_are_unset() {
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(
            non_empty(Some(" https://example.org/m.json ".to_string())),
            Some("https://example.org/m.json".to_string())
        );
    }
}
