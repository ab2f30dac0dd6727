use crate::cleaner::{Result, types::TaskQueryResult};
use async_trait::async_trait;

/// Remote task backend the reconciliation pass works against
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Fetch every task whose name matches `title`
    async fn fetch_tasks_by_title(&self, title: &str) -> Result<TaskQueryResult>;

    /// Delete a task. Returns `true` only on an explicit success from the backend.
    async fn delete_task(&self, id: &str) -> bool;
}
