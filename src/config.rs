use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::FitPlanError;
use crate::logging::LogConfig;

/// Environment variable overriding the configured service URL
pub const API_URL_ENV: &str = "FITPLAN_API_URL";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Recommendation service settings
    #[serde(default)]
    pub api: ApiSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LogConfig,
}

/// Recommendation service connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the recommendation service
    pub base_url: String,

    /// HTTP client timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("fitplan/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiSettings {
    /// Pick the effective base URL.
    ///
    /// Precedence: explicit override (CLI flag), then `FITPLAN_API_URL`,
    /// then the configured value. The result is validated and has any
    /// trailing slash removed.
    pub fn resolve_base_url(&self, cli_override: Option<&str>) -> Result<String, FitPlanError> {
        let env_value = std::env::var(API_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());

        let chosen = cli_override
            .map(str::to_string)
            .or(env_value)
            .unwrap_or_else(|| self.base_url.clone());

        normalize_base_url(&chosen)
    }

    /// Settings with the base URL replaced by the resolved one
    pub fn resolved(&self, cli_override: Option<&str>) -> Result<ApiSettings, FitPlanError> {
        Ok(ApiSettings {
            base_url: self.resolve_base_url(cli_override)?,
            ..self.clone()
        })
    }
}

/// Validate an http(s) URL and strip the trailing slash
pub fn normalize_base_url(raw: &str) -> Result<String, FitPlanError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| {
        FitPlanError::Configuration(format!("invalid service URL '{}': {}", trimmed, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(FitPlanError::Configuration(format!(
            "service URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".fitplan")
            .join("config.toml")
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// A file that exists but cannot be parsed is an error rather than
    /// being silently replaced.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from_file(&config_path)
    }

    /// Keys accepted by `get_value` and `set_value`
    pub const KEYS: [&'static str; 5] = [
        "api.base_url",
        "api.timeout_secs",
        "api.user_agent",
        "logging.level",
        "logging.format",
    ];

    /// Read a single setting as text
    pub fn get_value(&self, key: &str) -> Option<String> {
        match key {
            "api.base_url" => Some(self.api.base_url.clone()),
            "api.timeout_secs" => Some(self.api.timeout_secs.to_string()),
            "api.user_agent" => Some(self.api.user_agent.clone()),
            "logging.level" => Some(self.logging.level.to_filter()),
            "logging.format" => Some(self.logging.format.as_str().to_string()),
            _ => None,
        }
    }

    /// Update a single setting from text
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                self.api.base_url = normalize_base_url(value)?;
            }
            "api.timeout_secs" => {
                self.api.timeout_secs = value
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid timeout: {}", value))?;
            }
            "api.user_agent" => self.api.user_agent = value.trim().to_string(),
            "logging.level" => self.logging.level = value.parse().map_err(|e| anyhow!("{}", e))?,
            "logging.format" => {
                self.logging.format = value.parse().map_err(|e| anyhow!("{}", e))?
            }
            other => {
                return Err(anyhow!(
                    "Unknown configuration key: {} (expected one of {})",
                    other,
                    Self::KEYS.join(", ")
                ))
            }
        }
        Ok(())
    }

    /// All settings as key/value pairs
    pub fn list(&self) -> Vec<(&'static str, String)> {
        Self::KEYS
            .iter()
            .filter_map(|key| self.get_value(key).map(|value| (*key, value)))
            .collect()
    }
}
