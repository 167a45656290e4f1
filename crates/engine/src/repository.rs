//! Task intake storage.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use workmatch_common::{Result, Task};

/// Repository over task intake, keyed by consumer session. Injected where
/// needed so the scheduler and matcher stay pure functions over explicit
/// inputs.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Validate and store a task under a session.
    async fn create(&self, session: &str, task: Task) -> Result<()>;

    /// List a session's tasks in intake order.
    async fn list_by_session(&self, session: &str) -> Result<Vec<Task>>;
}

#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<HashMap<String, Vec<Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, session: &str, task: Task) -> Result<()> {
        task.validate()?;
        self.tasks
            .write()
            .await
            .entry(session.to_string())
            .or_default()
            .push(task);
        Ok(())
    }

    async fn list_by_session(&self, session: &str) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .read()
            .await
            .get(session)
            .cloned()
            .unwrap_or_default())
    }
}
