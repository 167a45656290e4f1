//! Backlog ordering by priority and deadline.

use chrono::NaiveDateTime;
use workmatch_common::{BacklogEntry, Deadline, EngineError, Result};

/// Order a backlog: priority descending, deadline ascending within equal
/// priority, remaining ties in input order (the sort is stable by design,
/// not by accident).
///
/// Every deadline is normalized to a timestamp before anything is sorted.
/// The first unparseable deadline aborts the whole call with a validation
/// error naming the task; the input slice is never touched, so failure is
/// all-or-nothing. Output deadlines are all parsed, which makes the
/// operation idempotent.
pub fn order(tasks: &[BacklogEntry]) -> Result<Vec<BacklogEntry>> {
    let mut normalized: Vec<(BacklogEntry, NaiveDateTime)> = Vec::with_capacity(tasks.len());
    for entry in tasks {
        if !(1..=5).contains(&entry.priority) {
            return Err(EngineError::Validation(format!(
                "task {}: priority {} outside 1-5",
                entry.task_id, entry.priority
            )));
        }
        let end = match entry.end.normalize() {
            Some(ts) => ts,
            None => {
                let raw = match &entry.end {
                    Deadline::Text(raw) => raw.as_str(),
                    Deadline::Timestamp(_) => unreachable!("timestamps always normalize"),
                };
                return Err(EngineError::Validation(format!(
                    "task {}: unparseable deadline '{}'",
                    entry.task_id, raw
                )));
            }
        };
        let mut entry = entry.clone();
        entry.end = Deadline::Timestamp(end);
        normalized.push((entry, end));
    }

    normalized.sort_by(|a, b| {
        b.0.priority
            .cmp(&a.0.priority)
            .then_with(|| a.1.cmp(&b.1))
    });

    Ok(normalized.into_iter().map(|(entry, _)| entry).collect())
}
