//! Stored settings plus environment overrides.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

use crate::domain::input::DEFAULT_ORIGIN;
use crate::domain::profit::Platform;
use crate::domain::resolver::DiagnosisSettings;

const APP_QUALIFIER: &str = "jp";
const APP_ORG: &str = "OkuruNavi";
const APP_NAME: &str = "OkuruNavi";

pub const DEFAULT_AI_ENDPOINT: &str = "https://api.openai.com/v1/";
pub const DEFAULT_AI_MODEL: &str = "gpt-4o";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 15;

const ENV_API_KEY: &str = "OPENAI_API_KEY";
const ENV_ENDPOINT: &str = "OKURU_AI_ENDPOINT";
const ENV_MODEL: &str = "OKURU_AI_MODEL";
const ENV_TIMEOUT: &str = "OKURU_AI_TIMEOUT_SECS";
const ENV_ORIGIN: &str = "OKURU_ORIGIN_PREFECTURE";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiSettings {
    /// Never written to disk; supply it through `OPENAI_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_AI_ENDPOINT.to_string(),
            model: DEFAULT_AI_MODEL.to_string(),
            timeout_secs: DEFAULT_AI_TIMEOUT_SECS,
            max_tokens: 1200,
            temperature: 0.7,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub origin_prefecture: String,
    pub platform: Platform,
    pub ai: AiSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin_prefecture: DEFAULT_ORIGIN.to_string(),
            platform: Platform::default(),
            ai: AiSettings::default(),
        }
    }
}

impl AppConfig {
    /// Applies environment overrides on top of the stored values.
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_overrides(|key| env::var(key).ok());
        self
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = lookup(ENV_API_KEY) {
            self.ai.api_key = Some(key);
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.ai.endpoint = endpoint;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.ai.model = model;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            match timeout.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.ai.timeout_secs = secs,
                _ => tracing::warn!(value = %timeout, "ignoring invalid {ENV_TIMEOUT}"),
            }
        }
        if let Some(origin) = lookup(ENV_ORIGIN) {
            self.origin_prefecture = origin;
        }
    }
}

impl From<&AppConfig> for DiagnosisSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            platform: config.platform,
            origin: config.origin_prefecture.clone(),
        }
    }
}

fn config_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join("settings.json"))
}

/// Stored settings with environment overrides. Missing or unreadable files yield defaults.
pub fn load_config() -> AppConfig {
    config_file()
        .and_then(|path| load_stored_config(&path))
        .unwrap_or_default()
        .with_env_overrides()
}

fn load_stored_config(path: &Path) -> Option<AppConfig> {
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "ignoring malformed settings file");
            None
        }
    }
}

pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    let path = config_file().ok_or(ConfigError::StorageUnavailable)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).cloned());
        config
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.origin_prefecture, "東京都");
        assert_eq!(config.ai.model, "gpt-4o");
        assert_eq!(config.ai.timeout_secs, 15);
        assert_eq!(config.ai.api_key, None);
    }

    #[test]
    fn environment_wins_over_defaults() {
        let config = overrides(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OKURU_AI_MODEL", "gpt-4o-mini"),
            ("OKURU_AI_TIMEOUT_SECS", "5"),
            ("OKURU_ORIGIN_PREFECTURE", "大阪府"),
        ]);
        assert_eq!(config.ai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.ai.model, "gpt-4o-mini");
        assert_eq!(config.ai.timeout_secs, 5);
        assert_eq!(config.origin_prefecture, "大阪府");
    }

    #[test]
    fn invalid_or_blank_values_are_ignored() {
        let config = overrides(&[("OKURU_AI_TIMEOUT_SECS", "soon"), ("OKURU_AI_MODEL", " ")]);
        assert_eq!(config.ai.timeout_secs, DEFAULT_AI_TIMEOUT_SECS);
        assert_eq!(config.ai.model, DEFAULT_AI_MODEL);
    }

    #[test]
    fn api_key_is_not_serialized() {
        let mut config = AppConfig::default();
        config.ai.api_key = Some("sk-secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn stored_file_is_read_and_malformed_files_are_ignored() {
        let path = env::temp_dir().join(format!("okuru-navi-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, r#"{"originPrefecture":"北海道","platform":"yahooAuction"}"#).unwrap();
        let stored = load_stored_config(&path).unwrap();
        assert_eq!(stored.origin_prefecture, "北海道");
        assert_eq!(stored.platform, Platform::YahooAuction);

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_stored_config(&path), None);

        fs::remove_file(&path).unwrap();
        assert_eq!(load_stored_config(&path), None);
    }

    #[test]
    fn configured_origin_and_platform_reach_the_diagnosis() {
        let config = overrides(&[("OKURU_ORIGIN_PREFECTURE", "北海道")]);
        let settings = DiagnosisSettings::from(&config);
        assert_eq!(settings.origin, "北海道");
        assert_eq!(settings.platform, Platform::Mercari);
    }

    #[test]
    fn partial_settings_file_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"platform":"yahooAuction"}"#).unwrap();
        assert_eq!(config.platform, Platform::YahooAuction);
        assert_eq!(config.ai, AiSettings::default());
    }
}
