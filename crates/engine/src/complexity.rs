//! Task-complexity estimation via an external text-generation service.
//!
//! The service is a collaborator, not part of this crate: we own the request
//! contract, the prompt, bounded retry, and response validation. There is no
//! local fallback heuristic; a failed estimate propagates to the caller.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use workmatch_common::{ComplexityAnalysis, EngineError, EstimatorConfig, Result, SkillLevels};

use crate::parser;

/// One-shot text-generation channel. Stateless across calls.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Inputs to a complexity assessment.
#[derive(Debug, Clone)]
pub struct ComplexityRequest<'a> {
    pub task_type: &'a str,
    pub description: &'a str,
    pub avg_duration: Option<u32>,
    pub skills: &'a SkillLevels,
    pub priority: u8,
}

/// Gemini `generateContent` backend.
#[derive(Debug)]
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    /// Missing credentials are fatal here, at construction, never per call.
    pub fn new(config: &EstimatorConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(EngineError::Configuration(
                "estimator API key must be set".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::Configuration(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::Service(format!("generative service unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Service(format!(
                "generative service returned {}",
                status
            )));
        }

        let payload: serde_json::Value = response.json().await.map_err(|e| {
            EngineError::Service(format!("cannot read generative response: {}", e))
        })?;
        let text = payload
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                EngineError::Service("generative service returned no content".to_string())
            })?;
        if text.trim().is_empty() {
            return Err(EngineError::Service(
                "generative service returned no content".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}

/// Retry only retryable (service) failures, a bounded number of times, with
/// a fixed pause between attempts. Parse failures are never retried.
pub(crate) async fn generate_with_retry(
    backend: &dyn GenerativeBackend,
    prompt: &str,
    max_retries: u32,
    backoff: Duration,
) -> Result<String> {
    let mut attempt = 0;
    loop {
        match backend.generate(prompt).await {
            Ok(text) => return Ok(text),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                attempt += 1;
                tracing::warn!(attempt, error = %e, "generative call failed, retrying");
                tokio::time::sleep(backoff).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Client for the complexity estimator.
pub struct ComplexityClient {
    backend: Arc<dyn GenerativeBackend>,
    max_retries: u32,
    retry_backoff: Duration,
}

impl ComplexityClient {
    pub fn new(backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            backend,
            max_retries: 1,
            retry_backoff: Duration::from_millis(500),
        }
    }

    pub fn with_retry(mut self, max_retries: u32, retry_backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = retry_backoff;
        self
    }

    /// Ask the estimator for a structured assessment and validate the reply.
    pub async fn analyze(&self, request: &ComplexityRequest<'_>) -> Result<ComplexityAnalysis> {
        let prompt = build_prompt(request);
        let text = generate_with_retry(
            self.backend.as_ref(),
            &prompt,
            self.max_retries,
            self.retry_backoff,
        )
        .await?;
        let analysis =
            parser::parse_structured(&text, |a: &ComplexityAnalysis| a.validate())?;
        tracing::debug!(
            task_type = request.task_type,
            complexity_score = analysis.complexity_score,
            "complexity analysis completed"
        );
        Ok(analysis)
    }
}

fn build_prompt(request: &ComplexityRequest<'_>) -> String {
    let skills = request
        .skills
        .iter()
        .map(|(name, level)| format!("{}: {}", name, level))
        .collect::<Vec<_>>()
        .join(", ");
    let avg_duration = request
        .avg_duration
        .map(|minutes| minutes.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        r#"You are a workforce planning AI assistant. Analyze the following task and provide a detailed assessment.

Task Information:

- Task Type: {task_type}

- Description: {description}

- Historical Average Duration: {avg_duration} minutes

- Required Skills: {skills}

- Priority Level: {priority}

Provide your analysis in the following JSON format:

{{
  "complexity_score": <1-10>,
  "recommended_skills": {{
    "skill_name": <required_level_1-10>
  }},
  "challenges": ["challenge1", "challenge2"],
  "duration_estimate": {{
    "optimistic": <minutes>,
    "likely": <minutes>,
    "pessimistic": <minutes>,
    "confidence": <0.0-1.0>
  }}
}}

Your response must be ONLY valid JSON. Do not include any text before or after the JSON object."#,
        task_type = request.task_type,
        description = request.description,
        avg_duration = avg_duration,
        skills = skills,
        priority = request.priority,
    )
}
