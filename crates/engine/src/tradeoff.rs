//! Schedule trade-off analysis via the same text-generation channel as the
//! complexity estimator.

use std::sync::Arc;
use std::time::Duration;
use workmatch_common::{Result, TradeoffAnalysis};

use crate::complexity::{generate_with_retry, GenerativeBackend};
use crate::parser;

/// Inputs to a trade-off review of a draft schedule.
#[derive(Debug, Clone)]
pub struct TradeoffRequest {
    pub schedule: serde_json::Value,
    pub budget: f64,
    pub coverage_percentage: u8,
    pub availability: serde_json::Value,
    pub detected_issues: serde_json::Value,
}

pub struct TradeoffClient {
    backend: Arc<dyn GenerativeBackend>,
    max_retries: u32,
    retry_backoff: Duration,
}

impl TradeoffClient {
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

    pub async fn analyze(&self, request: &TradeoffRequest) -> Result<TradeoffAnalysis> {
        let prompt = build_prompt(request);
        let text = generate_with_retry(
            self.backend.as_ref(),
            &prompt,
            self.max_retries,
            self.retry_backoff,
        )
        .await?;
        parser::parse_structured(&text, |a: &TradeoffAnalysis| a.validate())
    }
}

fn build_prompt(request: &TradeoffRequest) -> String {
    let schedule = serde_json::to_string_pretty(&request.schedule)
        .unwrap_or_else(|_| request.schedule.to_string());
    let availability = serde_json::to_string_pretty(&request.availability)
        .unwrap_or_else(|_| request.availability.to_string());
    let issues = serde_json::to_string_pretty(&request.detected_issues)
        .unwrap_or_else(|_| request.detected_issues.to_string());

    format!(
        r#"You are an operations optimization AI. Review the current schedule and constraints, then provide recommendations with trade-off analysis.

Current Schedule:

{schedule}

Constraints:

- Cost Budget: ${budget}

- Required Coverage: {coverage}%

- Employee Availability: {availability}

Issues Detected:

{issues}

Provide your analysis in the following JSON format:

{{
  "recommendations": [
    {{
      "action": "Specific action to take",
      "rationale": "Why this helps",
      "cost_impact": "$XX or percentage",
      "risk_reduction": "XX% or description",
      "priority": <1-5>,
      "confidence": <0.0-1.0>
    }}
  ],
  "alerts": [
    {{
      "severity": "low|medium|high",
      "message": "Description of issue",
      "affected_time_slots": ["time1", "time2"]
    }}
  ]
}}

Your response must be ONLY valid JSON."#,
        schedule = schedule,
        budget = request.budget,
        coverage = request.coverage_percentage,
        availability = availability,
        issues = issues,
    )
}
