//! TOML-based configuration for deepscribe
//!
//! Every section is optional; a missing `deepscribe.toml` yields the defaults.
//! Secrets never live in the file: each backend names the environment
//! variable its key is read from, and [`Credentials::from_env`] resolves them
//! once per process.

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "deepscribe.toml";

/// Root configuration structure loaded from deepscribe.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeepscribeConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub research: ResearchConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============= LLM Configuration =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderKind {
    #[serde(rename = "openai")]
    OpenAI,
    Ollama,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_provider")]
    pub provider: LlmProviderKind,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Base URL; for Ollama this is the server root, `/v1` is appended
    #[serde(default = "default_llm_api_base")]
    pub api_base: String,

    /// Environment variable name containing the API key
    #[serde(default = "default_llm_api_key_env")]
    pub api_key_env: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_llm_provider() -> LlmProviderKind {
    LlmProviderKind::OpenAI
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_llm_model(),
            api_base: default_llm_api_base(),
            api_key_env: default_llm_api_key_env(),
            temperature: None,
            max_tokens: None,
        }
    }
}

// ============= Research Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchConfig {
    #[serde(default = "default_research_api_base")]
    pub api_base: String,

    /// Environment variable name containing the research provider key
    #[serde(default = "default_research_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_crawl_depth")]
    pub crawl_depth: u32,

    #[serde(default = "default_time_budget_secs")]
    pub time_budget_secs: u32,

    #[serde(default = "default_url_limit")]
    pub url_limit: u32,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_research_api_base() -> String {
    "https://api.firecrawl.dev".to_string()
}

fn default_research_api_key_env() -> String {
    "FIRECRAWL_API_KEY".to_string()
}

fn default_crawl_depth() -> u32 {
    3
}

fn default_time_budget_secs() -> u32 {
    180
}

fn default_url_limit() -> u32 {
    10
}

fn default_poll_interval_ms() -> u64 {
    2000
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            api_base: default_research_api_base(),
            api_key_env: default_research_api_key_env(),
            crawl_depth: default_crawl_depth(),
            time_budget_secs: default_time_budget_secs(),
            url_limit: default_url_limit(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

// ============= Engine Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,

    #[serde(default)]
    pub parallel_tools: bool,
}

fn default_max_iterations() -> usize {
    10
}

fn default_tool_timeout_secs() -> u64 {
    300
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tool_timeout_secs: default_tool_timeout_secs(),
            parallel_tools: false,
        }
    }
}

// ============= Logging Configuration =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DeepscribeConfig {
    /// Load configuration from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Configuration(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AppError::Configuration(format!("failed to render configuration: {}", e)))
    }

    /// Check the values that would otherwise fail deep inside a run
    pub fn validate(&self) -> Result<()> {
        if self.llm.model.trim().is_empty() {
            return Err(AppError::Configuration("llm.model must not be empty".to_string()));
        }

        let limits = [
            ("research.crawl_depth", u64::from(self.research.crawl_depth)),
            ("research.time_budget_secs", u64::from(self.research.time_budget_secs)),
            ("research.url_limit", u64::from(self.research.url_limit)),
            ("research.poll_interval_ms", self.research.poll_interval_ms),
            ("engine.max_iterations", self.engine.max_iterations as u64),
            ("engine.tool_timeout_secs", self.engine.tool_timeout_secs),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(AppError::Configuration(format!("{} must be positive", name)));
            }
        }

        Ok(())
    }
}

/// API keys for the two backends, resolved once and passed explicitly.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub llm_key: Option<String>,
    pub research_provider_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("llm_key", &redact(&self.llm_key))
            .field("research_provider_key", &redact(&self.research_provider_key))
            .finish()
    }
}

impl Credentials {
    /// Read keys from the variables named in the config, after loading `.env`
    pub fn from_env(config: &DeepscribeConfig) -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Resolve keys through an arbitrary lookup (used by tests)
    pub fn from_lookup(
        config: &DeepscribeConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            llm_key: non_empty(&config.llm.api_key_env),
            research_provider_key: non_empty(&config.research.api_key_env),
        }
    }
}
