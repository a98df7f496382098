use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{TaskError, TaskResult};
use crate::models::{Task, TaskFilter, TaskStatus};

/// Repository trait for Task persistence
///
/// Writes replace the whole document; there is no optimistic locking, so
/// concurrent updates of one task are last-writer-wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn find_by_id(&self, id: Uuid) -> TaskResult<Option<Task>>;

    async fn find_all(&self, filter: TaskFilter) -> TaskResult<Vec<Task>>;

    async fn find_by_status(&self, status: TaskStatus) -> TaskResult<Vec<Task>>;

    /// Tasks the user created or is assigned to.
    async fn find_by_user(&self, user_id: Uuid) -> TaskResult<Vec<Task>>;

    async fn create(&self, task: Task) -> TaskResult<Task>;

    /// `NotFound` if the task does not exist.
    async fn update(&self, task: Task) -> TaskResult<Task>;

    async fn delete(&self, id: Uuid) -> TaskResult<bool>;
}

/// In-memory implementation of TaskRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creation order; ids are UUIDv7.
    async fn collect(&self, keep: impl Fn(&Task) -> bool) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        let mut found: Vec<Task> = tasks.values().filter(|t| keep(t)).cloned().collect();
        found.sort_by_key(|t| t.id);
        found
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).cloned())
    }

    async fn find_all(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        Ok(self
            .collect(|t| filter.status.is_none_or(|status| t.status == status))
            .await)
    }

    async fn find_by_status(&self, status: TaskStatus) -> TaskResult<Vec<Task>> {
        Ok(self.collect(|t| t.status == status).await)
    }

    async fn find_by_user(&self, user_id: Uuid) -> TaskResult<Vec<Task>> {
        Ok(self.collect(|t| t.is_participant(user_id)).await)
    }

    async fn create(&self, task: Task) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id, task.clone());

        tracing::info!(task_id = %task.id, "Created task");
        Ok(task)
    }

    async fn update(&self, task: Task) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;

        let Some(slot) = tasks.get_mut(&task.id) else {
            return Err(TaskError::NotFound(task.id));
        };
        *slot = task.clone();

        tracing::info!(task_id = %task.id, "Updated task");
        Ok(task)
    }

    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let mut tasks = self.tasks.write().await;

        if tasks.remove(&id).is_some() {
            tracing::info!(task_id = %id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
