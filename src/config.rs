//! Runtime settings.
//!
//! Values are layered, later sources winning:
//! 1. Built-in defaults
//! 2. `<config_dir>/comment-annotator/config.json` (or an explicit `--config` path)
//! 3. Environment variables:
//!    - `ENDPOINT` / `COMMENT_ANNOTATOR_ENDPOINT` - text analytics endpoint URL
//!    - `API_KEY` / `COMMENT_ANNOTATOR_API_KEY` - subscription key
//! 4. Command line flags (applied by the binary)
//!
//! Missing credentials are not an error here; the first remote call reports them.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::models::COMMENT_COLUMN;

const APP_NAME: &str = "comment-annotator";
const CONFIG_FILE: &str = "config.json";

/// Synchronous analyze-text calls accept at most this many documents.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Service endpoint, e.g. `https://<resource>.cognitiveservices.azure.com`
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    /// Language hint sent with every document.
    pub language: String,
    /// Column holding the comments to analyze.
    pub comment_column: String,
    pub max_batch_size: usize,
    /// Retries after the first attempt, for throttling and server errors only.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_backoff_ms: u64,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            language: "es".to_string(),
            comment_column: COMMENT_COLUMN.to_string(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            max_retries: 2,
            retry_backoff_ms: 500,
            timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Load settings from `path` (or the default location) and the environment.
    ///
    /// A missing file yields defaults; an unreadable one is logged and ignored.
    pub fn load(path: Option<&Path>) -> Self {
        let mut settings = match Self::try_load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {:#}", e);
                Self::default()
            }
        };
        settings.apply_env();
        settings
    }

    fn try_load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&config_path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings)
    }

    /// Override endpoint and key from the process environment.
    pub fn apply_env(&mut self) {
        if let Some(endpoint) = env_var(&["COMMENT_ANNOTATOR_ENDPOINT", "ENDPOINT"]) {
            self.endpoint = Some(endpoint);
        }
        if let Some(key) = env_var(&["COMMENT_ANNOTATOR_API_KEY", "API_KEY"]) {
            self.api_key = Some(key);
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// First non-empty variable among `names`.
fn env_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

pub fn default_config_path() -> Option<PathBuf> {
    let mut path = config_dir()?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Some(path)
}
