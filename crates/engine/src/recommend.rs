//! The consumer-facing operations: employee search with a synthesized
//! recommendation, and backlog ordering.

use serde::{Deserialize, Serialize};
use workmatch_common::{
    validate_priority, BacklogEntry, EngineError, Recommendation, Result, SkillLevels,
};

use crate::complexity::{ComplexityClient, ComplexityRequest};
use crate::matcher::Matcher;
use crate::{scheduler, synthesizer};

pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// A "search employees for task" request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskQuery {
    pub task_type: String,
    pub required_skills: SkillLevels,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub avg_duration: Option<u32>,
}

fn default_priority() -> u8 {
    3
}

impl TaskQuery {
    pub fn validate(&self) -> Result<()> {
        if self.task_type.is_empty() {
            return Err(EngineError::Validation(
                "task_type must not be empty".to_string(),
            ));
        }
        if self.required_skills.is_empty() {
            return Err(EngineError::Validation(
                "required_skills must not be empty".to_string(),
            ));
        }
        self.required_skills.validate()?;
        validate_priority(self.priority)
    }
}

/// Ties the matcher and the complexity client together behind the contract
/// the consumer layer calls.
pub struct RecommendationEngine {
    matcher: Matcher,
    complexity: ComplexityClient,
    result_limit: usize,
}

impl RecommendationEngine {
    pub fn new(matcher: Matcher, complexity: ComplexityClient) -> Self {
        Self {
            matcher,
            complexity,
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }

    pub fn with_result_limit(mut self, result_limit: usize) -> Self {
        self.result_limit = result_limit.max(1);
        self
    }

    /// Analyze complexity and rank employees, then synthesize both into a
    /// recommendation.
    ///
    /// Validation happens before any external call. Either upstream failing
    /// fails the whole request with its typed error; there is no default
    /// analysis and no default ranking. The synthesizer itself runs only
    /// once both results exist and cannot fail.
    pub async fn recommend(&self, query: &TaskQuery) -> Result<Recommendation> {
        query.validate()?;

        let request = ComplexityRequest {
            task_type: &query.task_type,
            description: &query.description,
            avg_duration: query.avg_duration,
            skills: &query.required_skills,
            priority: query.priority,
        };

        let (complexity_analysis, top_employees) = tokio::try_join!(
            self.complexity.analyze(&request),
            self.matcher
                .match_skills(&query.required_skills, self.result_limit),
        )?;

        let recommendation_summary = synthesizer::synthesize(&complexity_analysis, &top_employees);
        tracing::info!(
            task_type = query.task_type,
            candidates = top_employees.len(),
            "recommendation assembled"
        );

        Ok(Recommendation {
            complexity_analysis,
            top_employees,
            recommendation_summary,
        })
    }

    /// Order a backlog by priority and deadline.
    pub fn order_backlog(&self, tasks: &[BacklogEntry]) -> Result<Vec<BacklogEntry>> {
        scheduler::order(tasks)
    }
}
