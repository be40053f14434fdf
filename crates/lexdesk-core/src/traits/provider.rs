//! Data provider trait — where the engine gets sessions and tasks from.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Session, Task, User};

/// Read-only access to the office data, already filtered for the viewer.
#[async_trait]
pub trait CaseDataProvider: Send + Sync {
    /// Sessions visible to `user`.
    async fn list_sessions(&self, user: &User) -> Result<Vec<Session>>;

    /// Tasks visible to `user` (empty for client-role users).
    async fn list_tasks(&self, user: &User) -> Result<Vec<Task>>;
}
