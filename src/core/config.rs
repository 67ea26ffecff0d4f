//! Gateway configuration
//!
//! Endpoint URLs and credentials are collected here and handed to the
//! pipeline explicitly. Nothing in the crate reads ambient configuration
//! except `GatewayConfig::from_env`.

use crate::core::error::{GatewayError, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_LLM_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4";
pub const DEFAULT_ORACLE_URL: &str = "https://your-pigos-oracle-endpoint.com/trigger_csip";
pub const DEFAULT_TARGET_CONTRACT: &str = "DLMCore";

/// Top-level configuration for one pipeline
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Language-model endpoint used by the structuring stage
    pub llm: LlmConfig,
    /// Trigger/oracle endpoint used by the dispatch stage
    pub oracle: OracleConfig,
}

/// Language-model endpoint settings
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Bearer credential sent with every completion request
    pub api_key: String,
    /// Chat-completions URL (OpenAI-compatible)
    pub api_url: String,
    /// Model identifier placed in the request payload
    pub model: String,
    /// Transport timeout; `None` leaves the request unbounded
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_LLM_API_URL.into(),
            model: DEFAULT_LLM_MODEL.into(),
            timeout_secs: None,
        }
    }
}

// Keeps the credential out of debug logs.
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Trigger/oracle endpoint settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// URL receiving `{q_proof, target_contract}`
    pub url: String,
    /// Contract name forwarded alongside the proof
    pub target_contract: String,
    /// Transport timeout; `None` leaves the request unbounded
    pub timeout_secs: Option<u64>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ORACLE_URL.into(),
            target_contract: DEFAULT_TARGET_CONTRACT.into(),
            timeout_secs: None,
        }
    }
}

impl OracleConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl GatewayConfig {
    /// Build a configuration from environment variables
    ///
    /// Required: LLM_API_KEY
    /// Optional: LLM_API_URL, LLM_MODEL, ORACLE_URL, ORACLE_TARGET_CONTRACT
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| GatewayError::Config("LLM_API_KEY not set".into()))?;

        let mut config = Self::default();
        config.llm.api_key = api_key;
        if let Ok(url) = std::env::var("LLM_API_URL") {
            config.llm.api_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.llm.model = model;
        }
        if let Ok(url) = std::env::var("ORACLE_URL") {
            config.oracle.url = url;
        }
        if let Ok(target) = std::env::var("ORACLE_TARGET_CONTRACT") {
            config.oracle.target_contract = target;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: GatewayConfig = toml::from_str(content)
            .map_err(|e| GatewayError::Config(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.llm.api_key.trim().is_empty() {
            return Err(GatewayError::Config("llm.api_key is empty".into()));
        }
        if self.llm.api_url.trim().is_empty() {
            return Err(GatewayError::Config("llm.api_url is empty".into()));
        }
        if self.oracle.url.trim().is_empty() {
            return Err(GatewayError::Config("oracle.url is empty".into()));
        }
        Ok(())
    }
}
