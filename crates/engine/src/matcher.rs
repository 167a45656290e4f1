//! Employee matching against the similarity index.

use std::sync::Arc;
use workmatch_common::{Employee, EngineError, HistoricalTask, MatchResult, Result, SkillLevels};
use workmatch_embedding::{texts, SkillEmbedder};
use workmatch_storage::{Collection, ScoredRecord, VectorIndex, VectorRecord};

pub const DEFAULT_UPSERT_CHUNK_SIZE: usize = 50;

/// Orchestrates the embedder and the vector index. Both collaborators are
/// injected; the matcher holds no other state and every call is independent.
pub struct Matcher {
    embedder: Arc<dyn SkillEmbedder>,
    index: Arc<dyn VectorIndex>,
    upsert_chunk_size: usize,
}

impl Matcher {
    pub fn new(embedder: Arc<dyn SkillEmbedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            embedder,
            index,
            upsert_chunk_size: DEFAULT_UPSERT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, upsert_chunk_size: usize) -> Self {
        self.upsert_chunk_size = upsert_chunk_size.max(1);
        self
    }

    /// Encode and write a batch of employees, replacing any prior vectors
    /// for the same ids.
    ///
    /// Writes go out in chunks to bound request size. A failing chunk leaves
    /// earlier chunks committed and later chunks un-attempted; there is no
    /// cross-chunk atomicity. Returns the number of employees written.
    pub async fn upsert_employees(&self, employees: &[Employee]) -> Result<usize> {
        for employee in employees {
            employee.validate()?;
        }

        let mut written = 0;
        for chunk in employees.chunks(self.upsert_chunk_size) {
            let mut records = Vec::with_capacity(chunk.len());
            for employee in chunk {
                let text = texts::employee_text(employee);
                let vector = self.embedder.encode(&text)?;
                records.push(VectorRecord {
                    id: employee.employee_id,
                    vector,
                    payload: employee_payload(employee),
                });
            }
            self.index.upsert(Collection::Employees, records).await?;
            written += chunk.len();
            tracing::debug!(written, total = employees.len(), "upserted employee chunk");
        }
        Ok(written)
    }

    /// Encode and write completed tasks into the reserved `tasks`
    /// collection. Same chunking contract as employee upserts.
    pub async fn upsert_history(&self, tasks: &[HistoricalTask]) -> Result<usize> {
        let mut written = 0;
        for chunk in tasks.chunks(self.upsert_chunk_size) {
            let mut records = Vec::with_capacity(chunk.len());
            for task in chunk {
                task.required_skills.validate()?;
                let text = texts::historical_task_text(task);
                let vector = self.embedder.encode(&text)?;
                records.push(VectorRecord {
                    id: task.task_id,
                    vector,
                    payload: serde_json::to_value(task).map_err(|e| {
                        EngineError::Validation(format!(
                            "task {} cannot be serialized: {}",
                            task.task_id, e
                        ))
                    })?,
                });
            }
            self.index.upsert(Collection::Tasks, records).await?;
            written += chunk.len();
            tracing::debug!(written, total = tasks.len(), "upserted history chunk");
        }
        Ok(written)
    }

    /// Rank employees against a skill requirement. An empty index yields an
    /// empty list, not an error. Never returns more than `limit` results;
    /// scores come back non-increasing in the store's order.
    pub async fn match_skills(
        &self,
        skills: &SkillLevels,
        limit: usize,
    ) -> Result<Vec<MatchResult>> {
        if skills.is_empty() {
            return Err(EngineError::Validation(
                "required_skills must not be empty".to_string(),
            ));
        }
        skills.validate()?;

        let query = texts::match_query_text(skills);
        let vector = self.embedder.encode(&query)?;
        let hits = self
            .index
            .query(Collection::Employees, vector, limit)
            .await?;
        tracing::debug!(hits = hits.len(), limit, "similarity query completed");
        Ok(hits.into_iter().map(to_match_result).collect())
    }
}

/// Payload stored beside each employee vector; mirrors the employee record
/// plus the derived rating so query hits are self-describing.
fn employee_payload(employee: &Employee) -> serde_json::Value {
    serde_json::json!({
        "employee_id": employee.employee_id,
        "name": employee.name,
        "hourly_rate": employee.hourly_rate,
        "skills": employee.skills,
        "certifications": employee.certifications,
        "availability": employee.availability,
        "max_hours": employee.weekly_max_hours,
        "performance_rating": employee.performance_rating(),
        "past_task_success": employee.past_task_success,
    })
}

fn to_match_result(record: ScoredRecord) -> MatchResult {
    let employee_name = record
        .payload
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown")
        .to_string();
    MatchResult {
        employee_id: record.id,
        employee_name,
        score: record.score,
    }
}
