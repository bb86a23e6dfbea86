//! Configuration types for Charter.

use std::path::{Path, PathBuf};
use std::time::Duration;

use charter_classifier::backend::{BackendSettings, DEFAULT_API_VERSION, DEFAULT_ENDPOINT};
use charter_classifier::prompt::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use charter_classifier::PromptSettings;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::error::CharterError;
use crate::retry::RetryPolicy;
use crate::Result;

/// Top-level configuration.
///
/// Every section has defaults, so a config file only needs the keys it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharterConfig {
    /// Layer B provider settings.
    pub classifier: ClassifierConfig,

    /// Timeout, retry and concurrency for Layer B calls.
    pub orchestrator: OrchestratorConfig,

    /// Where evaluation records are appended.
    pub audit: AuditConfig,
}

/// Layer B provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Provider base URL.
    pub endpoint: String,

    /// Fixed model identifier.
    pub model: String,

    /// Fixed completion budget.
    pub max_tokens: u32,

    /// Fixed sampling temperature. Keep low.
    pub temperature: f32,

    /// Name of the environment variable holding the API key.
    pub api_key_env: String,

    /// Provider API version header.
    pub api_version: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl ClassifierConfig {
    pub fn prompt_settings(&self) -> PromptSettings {
        PromptSettings {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    /// Reads the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(CharterError::Config(format!(
                "environment variable {} is not set",
                self.api_key_env
            ))),
        }
    }

    /// Backend settings for the given key.
    ///
    /// The transport timeout is set just above the orchestrator's per-attempt
    /// timeout so the orchestrator's deadline is the one that fires.
    pub fn backend_settings(&self, api_key: String, attempt_timeout: Duration) -> BackendSettings {
        BackendSettings {
            endpoint: self.endpoint.clone(),
            api_key,
            api_version: self.api_version.clone(),
            request_timeout: attempt_timeout + Duration::from_secs(1),
        }
    }
}

/// Timeout, retry and concurrency for Layer B calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Per-attempt deadline in milliseconds.
    pub layer_b_timeout_ms: u64,

    /// Total attempts, including the first.
    pub max_attempts: u32,

    /// First backoff delay in milliseconds.
    pub backoff_base_ms: u64,

    /// Backoff ceiling in milliseconds.
    pub backoff_max_ms: u64,

    /// Maximum in-flight Layer B calls across all runs.
    pub max_concurrent_calls: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            layer_b_timeout_ms: 10_000,
            max_attempts: 3,
            backoff_base_ms: 250,
            backoff_max_ms: 2_000,
            max_concurrent_calls: 8,
        }
    }
}

impl OrchestratorConfig {
    pub fn layer_b_timeout(&self) -> Duration {
        Duration::from_millis(self.layer_b_timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff_base: Duration::from_millis(self.backoff_base_ms),
            backoff_max: Duration::from_millis(self.backoff_max_ms),
        }
    }
}

/// Audit ledger settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Append every record to the ledger.
    pub enabled: bool,

    /// Path to the ledger database.
    pub db_path: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            db_path: PathBuf::from("./charter_ledger.db"),
        }
    }
}

impl CharterConfig {
    /// Loads and validates a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: CharterConfig = serde_json::from_str(&text)
            .map_err(|e| CharterError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        let c = &self.classifier;
        if c.model.trim().is_empty() {
            return Err(CharterError::Config("classifier.model is empty".into()));
        }
        if !(c.endpoint.starts_with("http://") || c.endpoint.starts_with("https://")) {
            return Err(CharterError::Config(format!(
                "classifier.endpoint must be an http(s) URL, got '{}'",
                c.endpoint
            )));
        }
        if c.max_tokens == 0 {
            return Err(CharterError::Config("classifier.max_tokens must be positive".into()));
        }
        if !(0.0..=1.0).contains(&c.temperature) {
            return Err(CharterError::Config(format!(
                "classifier.temperature {} outside [0, 1]",
                c.temperature
            )));
        }
        if c.api_key_env.trim().is_empty() {
            return Err(CharterError::Config("classifier.api_key_env is empty".into()));
        }

        let o = &self.orchestrator;
        if o.layer_b_timeout_ms == 0 {
            return Err(CharterError::Config("orchestrator.layer_b_timeout_ms must be positive".into()));
        }
        if o.max_attempts == 0 {
            return Err(CharterError::Config("orchestrator.max_attempts must be at least 1".into()));
        }
        if o.backoff_base_ms > o.backoff_max_ms {
            return Err(CharterError::Config(
                "orchestrator.backoff_base_ms exceeds backoff_max_ms".into(),
            ));
        }
        if o.max_concurrent_calls == 0 {
            return Err(CharterError::Config(
                "orchestrator.max_concurrent_calls must be at least 1".into(),
            ));
        }
        if o.max_concurrent_calls > Semaphore::MAX_PERMITS {
            return Err(CharterError::Config(format!(
                "orchestrator.max_concurrent_calls {} exceeds {}",
                o.max_concurrent_calls,
                Semaphore::MAX_PERMITS
            )));
        }

        if self.audit.enabled && self.audit.db_path.as_os_str().is_empty() {
            return Err(CharterError::Config("audit.db_path is empty".into()));
        }

        Ok(())
    }
}
