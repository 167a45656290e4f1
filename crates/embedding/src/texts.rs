//! Canonical embedding-text builders.
//!
//! Stored vectors and query vectors are only comparable when both sides
//! render skills through the same canonical containers, so these formats are
//! fixed. Key order comes from the ordered skill mapping, never from caller
//! input order.

use workmatch_common::{Employee, HistoricalTask, SkillLevels};

/// Text representation an employee is embedded under.
pub fn employee_text(employee: &Employee) -> String {
    let certifications =
        serde_json::to_string(&employee.certifications).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Employee with skills {}, certifications {}, performance rating {}",
        employee.skills.to_json(),
        certifications,
        employee.performance_rating()
    )
}

/// Query text for a nearest-neighbor skill search.
pub fn match_query_text(skills: &SkillLevels) -> String {
    let fragment = skills
        .iter()
        .map(|(name, level)| format!("{}:{}", name, level))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Task requiring skills {}", fragment)
}

/// Text representation a completed task is embedded under in the reserved
/// `tasks` collection.
pub fn historical_task_text(task: &HistoricalTask) -> String {
    format!(
        "Task of type {} requiring skills {} with duration {} minutes",
        task.task_type,
        task.required_skills.to_json(),
        task.duration_minutes
    )
}
