use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

use crate::error::{EngineError, Result};

/// Canonical ordered mapping of skill name to integer level (1-10).
///
/// This is the only skills container the matching, synthesis and scheduling
/// paths accept. Upstream payloads that carry skills as a JSON-encoded string
/// are coerced through [`SkillLevels::from_value`]; every other shape is
/// rejected there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillLevels(BTreeMap<String, u8>);

impl SkillLevels {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Normalize a duck-typed skills payload into the canonical mapping.
    ///
    /// Accepts a JSON object of `name -> level`, or a JSON string containing
    /// such an object. Lists of bare skill names carry no levels and are
    /// rejected, as is anything else.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(map) => {
                let mut skills = BTreeMap::new();
                for (name, level) in map {
                    let level = level.as_u64().ok_or_else(|| {
                        EngineError::Validation(format!(
                            "skill '{}' has a non-integer level: {}",
                            name, level
                        ))
                    })?;
                    skills.insert(name.clone(), level as u8);
                }
                let skills = Self(skills);
                skills.validate()?;
                Ok(skills)
            }
            serde_json::Value::String(raw) => {
                let inner: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
                    EngineError::Validation(format!("skills string is not valid JSON: {}", e))
                })?;
                match inner {
                    serde_json::Value::Object(_) => Self::from_value(&inner),
                    other => Err(EngineError::Validation(format!(
                        "skills string must encode an object, got: {}",
                        other
                    ))),
                }
            }
            other => Err(EngineError::Validation(format!(
                "skills must be a mapping of name to level, got: {}",
                other
            ))),
        }
    }

    /// Check every level is within 1-10.
    pub fn validate(&self) -> Result<()> {
        for (name, level) in &self.0 {
            if !(1..=10).contains(level) {
                return Err(EngineError::Validation(format!(
                    "skill '{}' level {} outside 1-10",
                    name, level
                )));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, name: &str) -> Option<u8> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u8)> {
        self.0.iter()
    }

    /// Canonical JSON rendering, key order fixed by the underlying map.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

impl<S: Into<String>> FromIterator<(S, u8)> for SkillLevels {
    fn from_iter<T: IntoIterator<Item = (S, u8)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Unique identifier for tasks
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A task accepted at intake. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub task_type: String,
    #[serde(default)]
    pub description: String,
    pub required_skills: SkillLevels,
    pub priority: u8,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Task {
    pub fn validate(&self) -> Result<()> {
        validate_priority(self.priority)?;
        self.required_skills.validate()?;
        if self.end <= self.start {
            return Err(EngineError::Validation(format!(
                "task {}: end {} is not after start {}",
                self.id, self.end, self.start
            )));
        }
        Ok(())
    }
}

pub fn validate_priority(priority: u8) -> Result<()> {
    if !(1..=5).contains(&priority) {
        return Err(EngineError::Validation(format!(
            "priority {} outside 1-5",
            priority
        )));
    }
    Ok(())
}

/// A deadline as supplied by a consumer: either already a timestamp or text
/// still to be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Deadline {
    Timestamp(NaiveDateTime),
    Text(String),
}

impl Deadline {
    /// Parse text deadlines into a timestamp; already-parsed values pass
    /// through unchanged.
    pub fn normalize(&self) -> Option<NaiveDateTime> {
        match self {
            Deadline::Timestamp(ts) => Some(*ts),
            Deadline::Text(raw) => parse_timestamp(raw),
        }
    }
}

/// Accepted text forms: RFC 3339 (offset converted to UTC and discarded),
/// `%Y-%m-%dT%H:%M:%S` and `%Y-%m-%dT%H:%M`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").ok())
}

/// Scheduler input: the slice of task state the backlog ordering needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklogEntry {
    pub task_id: TaskId,
    #[serde(default)]
    pub task_type: String,
    pub priority: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Deadline>,
    pub end: Deadline,
}

/// An employee as held by the similarity index.
///
/// The index owns the stored vector; any change to `skills`,
/// `certifications` or `past_task_success` requires re-upserting the
/// employee so the vector is regenerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: u64,
    pub name: String,
    pub skills: SkillLevels,
    #[serde(default)]
    pub certifications: BTreeSet<String>,
    /// Weekday -> [start_hour, end_hour]
    #[serde(default)]
    pub availability: BTreeMap<String, (u8, u8)>,
    pub hourly_rate: f64,
    #[serde(default)]
    pub weekly_max_hours: u32,
    /// Task type -> historical success ratio (0.0-1.0)
    #[serde(default)]
    pub past_task_success: BTreeMap<String, f64>,
}

impl Employee {
    /// Average of the historical success ratios, 0.0 with no history.
    pub fn performance_rating(&self) -> f64 {
        if self.past_task_success.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.past_task_success.values().sum();
        sum / self.past_task_success.len() as f64
    }

    pub fn validate(&self) -> Result<()> {
        self.skills.validate()?;
        if self.hourly_rate < 0.0 {
            return Err(EngineError::Validation(format!(
                "employee {}: negative hourly rate {}",
                self.employee_id, self.hourly_rate
            )));
        }
        for (task_type, ratio) in &self.past_task_success {
            if !(0.0..=1.0).contains(ratio) {
                return Err(EngineError::Validation(format!(
                    "employee {}: success ratio {} for '{}' outside 0.0-1.0",
                    self.employee_id, ratio, task_type
                )));
            }
        }
        Ok(())
    }
}

/// A completed task as ingested into the reserved `tasks` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalTask {
    pub task_id: u64,
    pub task_type: String,
    pub duration_minutes: u32,
    pub required_skills: SkillLevels,
    #[serde(default)]
    pub employee_assigned: Option<u64>,
    pub outcome: String,
}

/// One ranked employee from a similarity query. Lists are ordered by score
/// descending; ties keep the store's native return order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub employee_id: u64,
    pub employee_name: String,
    pub score: f32,
}

/// Three-point duration estimate in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationEstimate {
    pub optimistic: u32,
    pub likely: u32,
    pub pessimistic: u32,
    pub confidence: f64,
}

/// Structured complexity assessment produced by the external estimator.
/// Computed once per matching request, never cached or persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityAnalysis {
    pub complexity_score: u8,
    pub recommended_skills: SkillLevels,
    pub challenges: Vec<String>,
    pub duration_estimate: DurationEstimate,
}

impl ComplexityAnalysis {
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.complexity_score) {
            return Err(EngineError::Validation(format!(
                "complexity_score {} outside 1-10",
                self.complexity_score
            )));
        }
        self.recommended_skills.validate()?;
        if !(0.0..=1.0).contains(&self.duration_estimate.confidence) {
            return Err(EngineError::Validation(format!(
                "duration confidence {} outside 0.0-1.0",
                self.duration_estimate.confidence
            )));
        }
        Ok(())
    }
}

/// The assembled per-request recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub complexity_analysis: ComplexityAnalysis,
    pub top_employees: Vec<MatchResult>,
    pub recommendation_summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// One actionable suggestion from the schedule trade-off analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeoffRecommendation {
    pub action: String,
    pub rationale: String,
    pub cost_impact: String,
    pub risk_reduction: String,
    pub priority: u8,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAlert {
    pub severity: AlertSeverity,
    pub message: String,
    #[serde(default)]
    pub affected_time_slots: Vec<String>,
}

/// Structured output of the schedule trade-off analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeoffAnalysis {
    pub recommendations: Vec<TradeoffRecommendation>,
    pub alerts: Vec<ScheduleAlert>,
}

impl TradeoffAnalysis {
    pub fn validate(&self) -> Result<()> {
        for rec in &self.recommendations {
            validate_priority(rec.priority)?;
            if !(0.0..=1.0).contains(&rec.confidence) {
                return Err(EngineError::Validation(format!(
                    "recommendation confidence {} outside 0.0-1.0",
                    rec.confidence
                )));
            }
        }
        Ok(())
    }
}
