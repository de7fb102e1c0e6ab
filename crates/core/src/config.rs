//! Client configuration with file and environment overrides.
//!
//! Priority: explicit path > user config (~/.config/meili/config.toml) > defaults,
//! then `MEILI_HOST` / `MEILI_API_KEY` from the environment.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_HOST: &str = "http://localhost:7700";

/// Connection and polling settings shared by every handle of one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
  /// Server base URL (default: http://localhost:7700)
  pub host: String,

  /// API key sent as a bearer token
  /// If not set, reads from MEILI_API_KEY env var
  #[serde(skip_serializing_if = "Option::is_none")]
  pub api_key: Option<String>,

  /// Per-request timeout in seconds (default: 30, 0 disables)
  pub request_timeout_secs: u64,

  /// Default task polling interval in milliseconds (default: 50)
  pub poll_interval_ms: u64,

  /// Default documents per batch for bulk ingestion (default: 1000)
  pub batch_size: usize,

  /// User-Agent header value
  pub user_agent: String,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      host: DEFAULT_HOST.to_string(),
      api_key: None,
      request_timeout_secs: 30,
      poll_interval_ms: 50,
      batch_size: 1000,
      user_agent: format!("meili-client/{}", env!("CARGO_PKG_VERSION")),
    }
  }
}

impl ClientConfig {
  pub fn new(host: impl Into<String>) -> Self {
    Self {
      host: host.into(),
      ..Default::default()
    }
  }

  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.api_key = Some(api_key.into());
    self
  }

  pub fn request_timeout(&self) -> Option<Duration> {
    (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
  }

  pub fn poll_interval(&self) -> Duration {
    Duration::from_millis(self.poll_interval_ms)
  }

  /// Load config from an explicit file, falling back to the user config and
  /// then defaults. Errors are only surfaced for an explicit path.
  pub fn load(path: Option<&Path>) -> Result<Self> {
    let mut config = match path {
      Some(path) => Self::from_file(path)?,
      None => Self::user_config_path()
        .filter(|p| p.exists())
        .and_then(|p| Self::from_file(&p).ok())
        .unwrap_or_default(),
    };
    config.apply_env();
    config.validate()?;
    Ok(config)
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
  }

  /// Apply `MEILI_HOST` and `MEILI_API_KEY` overrides.
  pub fn apply_env(&mut self) {
    if let Ok(host) = std::env::var("MEILI_HOST")
      && !host.is_empty()
    {
      self.host = host;
    }
    if self.api_key.is_none()
      && let Ok(key) = std::env::var("MEILI_API_KEY")
      && !key.is_empty()
    {
      self.api_key = Some(key);
    }
  }

  pub fn validate(&self) -> Result<()> {
    if self.host.trim().is_empty() {
      return Err(Error::Validation("host must not be empty".into()));
    }
    if self.batch_size == 0 {
      return Err(Error::Validation("batch_size must be greater than zero".into()));
    }
    Ok(())
  }

  /// Get the user-level config path
  pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("MEILI_CONFIG_DIR") {
      return Some(PathBuf::from(path).join("config.toml"));
    }

    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
      return Some(PathBuf::from(path).join("meili").join("config.toml"));
    }

    dirs::config_dir().map(|p: PathBuf| p.join("meili").join("config.toml"))
  }

  /// Generate a default config file as a string
  pub fn generate_template() -> String {
    let defaults = Self::default();
    format!(
      r#"# meili client configuration
# Place in ~/.config/meili/config.toml or pass --config <file>

# Server base URL
host = "{host}"

# API key sent as a bearer token (or set MEILI_API_KEY)
# api_key = ""

# Per-request timeout in seconds (0 disables)
request_timeout_secs = {timeout}

# Task polling interval in milliseconds
poll_interval_ms = {poll}

# Documents per batch for bulk ingestion
batch_size = {batch}
"#,
      host = defaults.host,
      timeout = defaults.request_timeout_secs,
      poll = defaults.poll_interval_ms,
      batch = defaults.batch_size,
    )
  }
}
