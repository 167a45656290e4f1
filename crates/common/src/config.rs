use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Top-level configuration, loaded from TOML or the environment.
///
/// Missing required values are a fatal [`EngineError::Configuration`] at
/// startup, never a per-call error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    pub storage: StorageConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub qdrant_url: String,
    #[serde(default)]
    pub qdrant_api_key: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            dimension: default_dimension(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorConfig {
    #[serde(default = "default_estimator_base_url")]
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_estimator_model")]
    pub model: String,
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    #[serde(default = "default_upsert_chunk_size")]
    pub upsert_chunk_size: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
            upsert_chunk_size: default_upsert_chunk_size(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_embedding_model() -> String {
    "all-minilm-l6-v2".to_string()
}

fn default_dimension() -> usize {
    384
}

fn default_estimator_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_estimator_model() -> String {
    "gemini-2.0-flash-exp".to_string()
}

fn default_max_retries() -> u32 {
    1
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_result_limit() -> usize {
    10
}

fn default_upsert_chunk_size() -> usize {
    50
}

impl SystemConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Configuration(format!("cannot read config file {}: {}", path, e))
        })?;
        let config: SystemConfig = toml::from_str(&content).map_err(|e| {
            EngineError::Configuration(format!("cannot parse config file {}: {}", path, e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from the environment: `QDRANT_URL`,
    /// `QDRANT_API_KEY` and `GEMINI_API_KEY` are required,
    /// `GEMINI_BASE_URL` and `EMBEDDING_MODEL` optional.
    pub fn from_env() -> Result<Self> {
        let qdrant_url = require_env("QDRANT_URL")?;
        let qdrant_api_key = require_env("QDRANT_API_KEY")?;
        let api_key = require_env("GEMINI_API_KEY")?;

        let mut estimator = EstimatorConfig {
            base_url: default_estimator_base_url(),
            api_key,
            model: default_estimator_model(),
            timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        };
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            estimator.base_url = base_url;
        }

        let mut embedding = EmbeddingConfig::default();
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            embedding.model = model;
        }

        let config = Self {
            storage: StorageConfig {
                qdrant_url,
                qdrant_api_key: Some(qdrant_api_key),
                request_timeout_secs: default_request_timeout_secs(),
            },
            embedding,
            estimator,
            matching: MatchingConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.qdrant_url.is_empty() {
            return Err(EngineError::Configuration(
                "storage.qdrant_url must not be empty".to_string(),
            ));
        }
        if self.estimator.api_key.is_empty() {
            return Err(EngineError::Configuration(
                "estimator.api_key must not be empty".to_string(),
            ));
        }
        if self.embedding.dimension == 0 {
            return Err(EngineError::Configuration(
                "embedding.dimension must be positive".to_string(),
            ));
        }
        if self.matching.result_limit == 0 {
            return Err(EngineError::Configuration(
                "matching.result_limit must be positive".to_string(),
            ));
        }
        if self.matching.upsert_chunk_size == 0 {
            return Err(EngineError::Configuration(
                "matching.upsert_chunk_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(EngineError::Configuration(format!(
            "{} must be set in environment variables",
            name
        ))),
    }
}
