use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const MIN_PRIORITY: i32 = 1;
pub const MAX_PRIORITY: i32 = 5;

/// Task status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Allowed moves:
    ///
    /// | from        | to                        |
    /// |-------------|---------------------------|
    /// | pending     | in_progress, completed    |
    /// | in_progress | completed                 |
    /// | completed   | in_progress (reopen)      |
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress) | (Pending, Completed) | (InProgress, Completed) | (Completed, InProgress)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// 1 (lowest) to 5 (highest)
    pub priority: i32,
    pub due_date: Option<DateTime<Utc>>,
    /// Set only through assignment
    pub assigned_to: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(input: CreateTask, created_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            status: TaskStatus::Pending,
            priority: input.priority,
            due_date: input.due_date,
            assigned_to: None,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creator or assignee.
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.created_by == user_id || self.assigned_to == Some(user_id)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1, max = 5, message = "priority must be between 1 and 5"))]
    pub priority: i32,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update. `None` leaves a field alone.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    #[validate(range(min = 1, max = 5, message = "priority must be between 1 and 5"))]
    pub priority: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AssignTask {
    /// User to assign; must exist
    pub assignee_id: String,
}

/// Repository filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
}

/// Query string for `GET /tasks`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListTasksQuery {
    /// `pending`, `in_progress` or `completed`
    pub status: Option<String>,
}

/// Stable sort by due date, earliest first; tasks without one come first.
pub fn sort_by_due_date(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| t.due_date);
}
