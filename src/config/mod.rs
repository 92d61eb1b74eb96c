//! Configuration management.
//!
//! Settings are layered, later sources winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config`, `./queryosity.toml`, or
//!    `<config dir>/queryosity/config.toml`)
//! 3. `QUERYOSITY__<SECTION>__<KEY>` environment variables
//! 4. The `GEMINI_PROJECT_ID`, `GEMINI_LOCATION`, `GEMINI_MODEL` and
//!    `GOOGLE_ACCESS_TOKEN` environment variables
//!
//! # Configuration File Format
//!
//! ```toml
//! [gemini]
//! project_id = "my-gcp-proj-123"
//! location = "us-central1"
//! model = "gemini-2.5-pro"
//! temperature = 0.7
//! timeout_secs = 120
//!
//! [output]
//! disclaimer = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::llm::{DEFAULT_LOCATION, DEFAULT_MODEL};
use crate::utils::DEFAULT_TIMEOUT;

/// Prefix for structured environment overrides
pub const ENV_PREFIX: &str = "QUERYOSITY";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model service settings
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Settings for the Gemini model on Vertex AI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Google Cloud project hosting the model
    #[serde(default)]
    pub project_id: Option<String>,

    /// Vertex AI region
    #[serde(default = "default_location")]
    pub location: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// OAuth access token; `gcloud auth print-access-token` is used when unset
    #[serde(default)]
    pub access_token: Option<String>,

    /// Base URL override for the Vertex AI endpoint
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            location: default_location(),
            model: default_model(),
            temperature: default_temperature(),
            access_token: None,
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print a note under Markdown stdout output that results are model-inferred
    #[serde(default = "default_true")]
    pub disclaimer: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { disclaimer: true }
    }
}

fn default_true() -> bool {
    true
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("GEMINI_PROJECT_ID is not set (add it to .env or the [gemini] config section)")]
    MissingProjectId,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    /// Apply the plain `GEMINI_*` / `GOOGLE_ACCESS_TOKEN` variables.
    ///
    /// `lookup` returns the value of a variable; empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(project_id) = get("GEMINI_PROJECT_ID") {
            self.gemini.project_id = Some(project_id);
        }
        if let Some(location) = get("GEMINI_LOCATION") {
            self.gemini.location = location;
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(token) = get("GOOGLE_ACCESS_TOKEN") {
            self.gemini.access_token = Some(token);
        }
    }

    /// Check that the configuration can be used to call the model
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.gemini.project_id.as_deref() {
            Some(id) if !id.trim().is_empty() => {}
            _ => return Err(ConfigError::MissingProjectId),
        }

        if self.gemini.location.trim().is_empty() {
            return Err(ConfigError::Invalid("gemini.location is empty".to_string()));
        }
        if self.gemini.model.trim().is_empty() {
            return Err(ConfigError::Invalid("gemini.model is empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.gemini.temperature) {
            return Err(ConfigError::Invalid(format!(
                "gemini.temperature must be between 0 and 2, got {}",
                self.gemini.temperature
            )));
        }
        if self.gemini.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "gemini.timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut config: Config = settings.try_deserialize()?;
    config.apply_env_overrides(|key| std::env::var(key).ok());
    Ok(config)
}

/// Find a configuration file in the default locations
///
/// Checks `./queryosity.toml`, then `<config dir>/queryosity/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from("queryosity.toml")];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("queryosity").join("config.toml"));
    }

    candidates.into_iter().find(|p| p.is_file())
}
