//! Runtime configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `HEARTYSIS_MODEL_PATH` | `models/ensemble_model.json` |
//! | `HEARTYSIS_MODEL_SHA256` | unset |
//! | `HEARTYSIS_LOCALE` | `ru` |
//! | `GEMINI_API_KEY` | unset |
//! | `HEARTYSIS_GEMINI_MODEL` | `gemini-1.5-flash` |
//! | `HEARTYSIS_GEMINI_ENDPOINT` | `https://generativelanguage.googleapis.com` |
//! | `HEARTYSIS_LOG_MODE` | `auto` |
//! | `HEARTYSIS_LOG_FILE` | `heartysis.log` |

use std::path::PathBuf;
use std::str::FromStr;

use crate::adapters::{gemini, model};
use crate::domain::Locale;
use crate::HeartysisError;

pub const DEFAULT_LOG_FILE: &str = "heartysis.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise.
    #[default]
    Auto,
    File,
    Stdout,
}

impl FromStr for LogMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(Self::Auto),
            "file" => Ok(Self::File),
            "stdout" => Ok(Self::Stdout),
            other => Err(format!("unknown log mode '{other}' (expected auto, file or stdout)")),
        }
    }
}

impl LogMode {
    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub mode: LogMode,
    pub file: PathBuf,
}

#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub model_sha256: Option<String>,
    pub locale: Locale,
    pub gemini: GeminiConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Read the process environment.
    ///
    /// # Errors
    /// Returns error if a variable is set to a value that cannot be parsed.
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    /// Returns error if `HEARTYSIS_LOCALE` or `HEARTYSIS_LOG_MODE` is invalid.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let locale = match get("HEARTYSIS_LOCALE") {
            Some(v) => Locale::from_str(&v)
                .map_err(|e| HeartysisError::Config(format!("HEARTYSIS_LOCALE: {e}")))?,
            None => Locale::default(),
        };

        let mode = match get("HEARTYSIS_LOG_MODE") {
            Some(v) => LogMode::from_str(&v)
                .map_err(|e| HeartysisError::Config(format!("HEARTYSIS_LOG_MODE: {e}")))?,
            None => LogMode::default(),
        };

        Ok(Self {
            model_path: get("HEARTYSIS_MODEL_PATH")
                .unwrap_or_else(|| model::DEFAULT_MODEL_PATH.to_string())
                .into(),
            model_sha256: get("HEARTYSIS_MODEL_SHA256").map(|s| s.to_ascii_lowercase()),
            locale,
            gemini: GeminiConfig {
                api_key: get(gemini::API_KEY_ENV),
                model: get("HEARTYSIS_GEMINI_MODEL")
                    .unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string()),
                endpoint: get("HEARTYSIS_GEMINI_ENDPOINT")
                    .unwrap_or_else(|| gemini::DEFAULT_ENDPOINT.to_string()),
            },
            log: LogConfig {
                mode,
                file: get("HEARTYSIS_LOG_FILE")
                    .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string())
                    .into(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> crate::Result<AppConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).expect("defaults");
        assert_eq!(cfg.model_path, PathBuf::from("models/ensemble_model.json"));
        assert_eq!(cfg.model_sha256, None);
        assert_eq!(cfg.locale, Locale::Ru);
        assert_eq!(cfg.gemini.api_key, None);
        assert_eq!(cfg.gemini.model, "gemini-1.5-flash");
        assert_eq!(cfg.gemini.endpoint, "https://generativelanguage.googleapis.com");
        assert_eq!(cfg.log.mode, LogMode::Auto);
        assert_eq!(cfg.log.file, PathBuf::from("heartysis.log"));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("HEARTYSIS_MODEL_PATH", "/srv/model.json"),
            ("HEARTYSIS_MODEL_SHA256", "ABCDEF"),
            ("HEARTYSIS_LOCALE", "en"),
            ("GEMINI_API_KEY", "key-123"),
            ("HEARTYSIS_LOG_MODE", "stdout"),
        ])
        .expect("config");
        assert_eq!(cfg.model_path, PathBuf::from("/srv/model.json"));
        assert_eq!(cfg.model_sha256.as_deref(), Some("abcdef"));
        assert_eq!(cfg.locale, Locale::En);
        assert_eq!(cfg.gemini.api_key.as_deref(), Some("key-123"));
        assert!(!cfg.log.mode.use_file(true));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let cfg = config(&[("GEMINI_API_KEY", "   "), ("HEARTYSIS_LOCALE", "")]).expect("config");
        assert_eq!(cfg.gemini.api_key, None);
        assert_eq!(cfg.locale, Locale::Ru);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            config(&[("HEARTYSIS_LOCALE", "de")]),
            Err(HeartysisError::Config(_))
        ));
        assert!(matches!(
            config(&[("HEARTYSIS_LOG_MODE", "syslog")]),
            Err(HeartysisError::Config(_))
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let cfg = config(&[("GEMINI_API_KEY", "AIzaTopSecret")]).expect("config");
        assert!(!format!("{cfg:?}").contains("AIzaTopSecret"));
    }

    #[test]
    fn test_auto_log_mode_follows_terminal() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
    }
}
