use chrono::Utc;
use domain_users::{UserError, UserRepository, UserService};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task, TaskFilter, TaskStatus, UpdateTask, sort_by_due_date};
use crate::repository::TaskRepository;

/// Service layer for Task business logic
///
/// Authorization is checked inline: updates need the creator or the
/// assignee, deletes and assignments need the creator.
pub struct TaskService<R: TaskRepository, U: UserRepository> {
    repository: Arc<R>,
    users: UserService<U>,
}

impl<R: TaskRepository, U: UserRepository> Clone for TaskService<R, U> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            users: self.users.clone(),
        }
    }
}

impl<R: TaskRepository, U: UserRepository> TaskService<R, U> {
    pub fn new(repository: R, users: UserService<U>) -> Self {
        Self {
            repository: Arc::new(repository),
            users,
        }
    }

    #[instrument(skip(self, input), fields(created_by = %created_by))]
    pub async fn create(&self, input: CreateTask, created_by: Uuid) -> TaskResult<Task> {
        let input = CreateTask {
            title: input.title.trim().to_string(),
            ..input
        };
        ensure_title(&input.title)?;
        input.validate()?;

        self.users
            .get_by_id(created_by)
            .await
            .map_err(|e| user_lookup_error(e, TaskError::CreatorNotFound(created_by)))?;

        self.repository.create(Task::new(input, created_by)).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> TaskResult<Task> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    #[instrument(skip(self, input), fields(task_id = %id, updated_by = %updated_by))]
    pub async fn update(&self, id: Uuid, input: UpdateTask, updated_by: Uuid) -> TaskResult<Task> {
        let input = UpdateTask {
            title: input.title.map(|t| t.trim().to_string()),
            ..input
        };
        if let Some(title) = &input.title {
            ensure_title(title)?;
        }
        input.validate()?;

        let mut task = self.get(id).await?;
        if !task.is_participant(updated_by) {
            return Err(TaskError::Unauthorized(
                "Only the creator or assignee can update this task".into(),
            ));
        }

        if let Some(status) = input.status {
            if !task.status.can_transition_to(status) {
                return Err(TaskError::InvalidTransition {
                    from: task.status,
                    to: status,
                });
            }
            task.status = status;
        }
        if let Some(title) = input.title {
            task.title = title;
        }
        if let Some(description) = input.description {
            task.description = Some(description);
        }
        if let Some(priority) = input.priority {
            task.priority = priority;
        }
        if let Some(due_date) = input.due_date {
            task.due_date = Some(due_date);
        }
        task.updated_at = Utc::now();

        self.repository.update(task).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid, requester: Uuid) -> TaskResult<()> {
        let task = self.get(id).await?;
        if task.created_by != requester {
            return Err(TaskError::Unauthorized(
                "Only the creator can delete this task".into(),
            ));
        }

        if !self.repository.delete(id).await? {
            return Err(TaskError::NotFound(id));
        }
        Ok(())
    }

    /// Assigning a pending task also starts it.
    #[instrument(skip(self))]
    pub async fn assign(&self, task_id: Uuid, assignee_id: Uuid, assigner_id: Uuid) -> TaskResult<Task> {
        let mut task = self.get(task_id).await?;
        if task.created_by != assigner_id {
            return Err(TaskError::Unauthorized(
                "Only the creator can assign this task".into(),
            ));
        }

        self.users
            .get_by_id(assignee_id)
            .await
            .map_err(|e| user_lookup_error(e, TaskError::AssigneeNotFound(assignee_id)))?;

        task.assigned_to = Some(assignee_id);
        if task.status == TaskStatus::Pending {
            task.status = TaskStatus::InProgress;
        }
        task.updated_at = Utc::now();

        self.repository.update(task).await
    }

    pub async fn list_all(&self) -> TaskResult<Vec<Task>> {
        let tasks = self.repository.find_all(TaskFilter::default()).await?;
        Ok(sorted(tasks))
    }

    pub async fn list_by_status(&self, status: TaskStatus) -> TaskResult<Vec<Task>> {
        let tasks = self.repository.find_by_status(status).await?;
        Ok(sorted(tasks))
    }

    /// Tasks the user created or is assigned to.
    pub async fn list_by_user(&self, user_id: Uuid) -> TaskResult<Vec<Task>> {
        let tasks = self.repository.find_by_user(user_id).await?;
        Ok(sorted(tasks))
    }
}

fn ensure_title(title: &str) -> TaskResult<()> {
    if title.is_empty() {
        return Err(TaskError::Validation("title must not be blank".into()));
    }
    Ok(())
}

fn sorted(mut tasks: Vec<Task>) -> Vec<Task> {
    sort_by_due_date(&mut tasks);
    tasks
}

fn user_lookup_error(err: UserError, not_found: TaskError) -> TaskError {
    match err {
        UserError::NotFound(_) => not_found,
        other => TaskError::User(other),
    }
}
