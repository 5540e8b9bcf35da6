use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::AnalysisError;

/// Environment variable holding the LLM API key
pub const LLM_API_KEY_VAR: &str = "GROQ_API_KEY";

/// Environment variable holding the optional GitHub token
pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubConfig {
    #[serde(default = "default_github_api_url")]
    pub api_url: String,
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_ui_timeout")]
    pub request_timeout_secs: u64,
}

/// Secrets read once from the process environment.
///
/// Never serialized; kept apart from [`Config`] so a config file can be shared
/// without leaking keys.
#[derive(Clone)]
pub struct Credentials {
    pub llm_api_key: String,
    pub github_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("llm_api_key", &"<redacted>")
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    /// Load credentials from the environment, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from {:?}", path);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build credentials from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let llm_api_key = lookup(LLM_API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AnalysisError::Configuration(format!(
                    "{} environment variable not set",
                    LLM_API_KEY_VAR
                ))
            })?;

        let github_token = lookup(GITHUB_TOKEN_VAR).filter(|token| !token.trim().is_empty());
        if github_token.is_none() {
            warn!(
                "{} not set. Unauthenticated GitHub rate limits apply.",
                GITHUB_TOKEN_VAR
            );
        }

        Ok(Credentials {
            llm_api_key,
            github_token,
        })
    }
}

impl Config {
    /// Load configuration from a specified path or the default location.
    ///
    /// An explicit path must exist. The default path is optional and falls
    /// back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::default_config_path()?;
                if !default_path.exists() {
                    info!("No config file at {:?}, using defaults", default_path);
                    return Ok(Config::default());
                }
                default_path
            }
        };

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {:?}", config_path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", config_path))?;

        info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home
            .join(".config")
            .join("gh-issue-assistant")
            .join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            github: GitHubConfig::default(),
            llm: LlmConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: default_bind(),
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            api_url: default_github_api_url(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            api_url: default_llm_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            backend_url: default_backend_url(),
            request_timeout_secs: default_ui_timeout(),
        }
    }
}

// Default value functions
fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_llm_api_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_upstream_timeout() -> u64 {
    30
}

fn default_backend_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_ui_timeout() -> u64 {
    120
}
