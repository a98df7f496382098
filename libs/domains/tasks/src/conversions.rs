//! Task-specific proto ↔ domain conversions
//!
//! Wire helpers for UUID strings and unix timestamps live in
//! `grpc_client::conversions`; malformed fields become `INVALID_ARGUMENT`.

use grpc_client::conversions::{
    datetime_to_timestamp, opt_datetime_to_timestamp, opt_timestamp_to_datetime, parse_opt_uuid,
    parse_uuid, timestamp_to_datetime,
};
use rpc::taskhub::v1 as proto;
use tonic::Status;

use crate::models::{CreateTask, Task, TaskStatus, UpdateTask};

// ============================================================================
// Status Conversions
// ============================================================================

impl From<TaskStatus> for proto::TaskStatus {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => proto::TaskStatus::Pending,
            TaskStatus::InProgress => proto::TaskStatus::InProgress,
            TaskStatus::Completed => proto::TaskStatus::Completed,
        }
    }
}

impl From<TaskStatus> for i32 {
    fn from(status: TaskStatus) -> Self {
        proto::TaskStatus::from(status) as i32
    }
}

impl TryFrom<i32> for TaskStatus {
    type Error = Status;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match proto::TaskStatus::try_from(value) {
            Ok(proto::TaskStatus::Pending) => Ok(TaskStatus::Pending),
            Ok(proto::TaskStatus::InProgress) => Ok(TaskStatus::InProgress),
            Ok(proto::TaskStatus::Completed) => Ok(TaskStatus::Completed),
            Ok(proto::TaskStatus::Unspecified) | Err(_) => {
                Err(Status::invalid_argument(format!("Invalid status: {}", value)))
            }
        }
    }
}

/// `ListTasks` filter: `UNSPECIFIED` means every status.
pub fn status_filter(value: i32) -> Result<Option<TaskStatus>, Status> {
    if value == proto::TaskStatus::Unspecified as i32 {
        return Ok(None);
    }
    TaskStatus::try_from(value).map(Some)
}

// ============================================================================
// Requests: Proto → Domain (server side)
// ============================================================================

impl TryFrom<proto::CreateTaskRequest> for CreateTask {
    type Error = Status;

    fn try_from(req: proto::CreateTaskRequest) -> Result<Self, Self::Error> {
        Ok(CreateTask {
            title: req.title,
            description: req.description,
            priority: req.priority,
            due_date: opt_timestamp_to_datetime("due_date", req.due_date)?,
        })
    }
}

impl TryFrom<proto::UpdateTaskRequest> for UpdateTask {
    type Error = Status;

    fn try_from(req: proto::UpdateTaskRequest) -> Result<Self, Self::Error> {
        Ok(UpdateTask {
            title: req.title,
            description: req.description,
            status: req.status.map(TaskStatus::try_from).transpose()?,
            priority: req.priority,
            due_date: opt_timestamp_to_datetime("due_date", req.due_date)?,
        })
    }
}

// ============================================================================
// Requests: Domain → Proto (client side)
// ============================================================================

impl From<CreateTask> for proto::CreateTaskRequest {
    fn from(input: CreateTask) -> Self {
        proto::CreateTaskRequest {
            title: input.title,
            description: input.description,
            priority: input.priority,
            due_date: opt_datetime_to_timestamp(input.due_date),
        }
    }
}

/// The id is not part of `UpdateTask`, so this is a function rather than `From`.
pub fn update_request(id: uuid::Uuid, input: UpdateTask) -> proto::UpdateTaskRequest {
    proto::UpdateTaskRequest {
        id: id.to_string(),
        title: input.title,
        description: input.description,
        status: input.status.map(i32::from),
        priority: input.priority,
        due_date: opt_datetime_to_timestamp(input.due_date),
    }
}

// ============================================================================
// Task messages
// ============================================================================

impl From<Task> for proto::Task {
    fn from(task: Task) -> Self {
        proto::Task {
            id: task.id.to_string(),
            title: task.title,
            description: task.description,
            status: task.status.into(),
            priority: task.priority,
            due_date: opt_datetime_to_timestamp(task.due_date),
            assigned_to: task.assigned_to.map(|id| id.to_string()),
            created_by: task.created_by.to_string(),
            created_at: datetime_to_timestamp(task.created_at),
            updated_at: datetime_to_timestamp(task.updated_at),
        }
    }
}

impl TryFrom<proto::Task> for Task {
    type Error = Status;

    fn try_from(msg: proto::Task) -> Result<Self, Self::Error> {
        Ok(Task {
            id: parse_uuid("id", &msg.id)?,
            title: msg.title,
            description: msg.description,
            status: msg.status.try_into()?,
            priority: msg.priority,
            due_date: opt_timestamp_to_datetime("due_date", msg.due_date)?,
            assigned_to: parse_opt_uuid("assigned_to", msg.assigned_to.as_deref())?,
            created_by: parse_uuid("created_by", &msg.created_by)?,
            created_at: timestamp_to_datetime("created_at", msg.created_at)?,
            updated_at: timestamp_to_datetime("updated_at", msg.updated_at)?,
        })
    }
}

impl From<Task> for proto::TaskResponse {
    fn from(task: Task) -> Self {
        proto::TaskResponse {
            task: Some(task.into()),
        }
    }
}

pub fn list_response(tasks: Vec<Task>) -> proto::ListTasksResponse {
    proto::ListTasksResponse {
        tasks: tasks.into_iter().map(Into::into).collect(),
    }
}

/// Unwraps a `TaskResponse` on the client side.
pub fn task_from_response(resp: proto::TaskResponse) -> Result<Task, Status> {
    resp.task
        .ok_or_else(|| Status::internal("response carried no task"))?
        .try_into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tonic::Code;
    use uuid::Uuid;

    #[test]
    fn test_status_numbers_match_proto() {
        assert_eq!(i32::from(TaskStatus::Pending), 1);
        assert_eq!(i32::from(TaskStatus::InProgress), 2);
        assert_eq!(i32::from(TaskStatus::Completed), 3);
        assert_eq!(TaskStatus::try_from(2).unwrap(), TaskStatus::InProgress);
    }

    #[test]
    fn test_unspecified_status_is_rejected_except_as_filter() {
        assert_eq!(TaskStatus::try_from(0).unwrap_err().code(), Code::InvalidArgument);
        assert_eq!(TaskStatus::try_from(42).unwrap_err().code(), Code::InvalidArgument);
        assert_eq!(status_filter(0).unwrap(), None);
        assert_eq!(status_filter(3).unwrap(), Some(TaskStatus::Completed));
    }

    #[test]
    fn test_update_request_keeps_absent_fields_absent() {
        let update = UpdateTask::try_from(proto::UpdateTaskRequest {
            id: Uuid::now_v7().to_string(),
            priority: Some(4),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(update.priority, Some(4));
        assert!(update.title.is_none());
        assert!(update.status.is_none());
        assert!(update.due_date.is_none());
    }

    #[test]
    fn test_task_message_uses_strings_and_seconds() {
        let due = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        let mut task = Task::new(
            CreateTask {
                title: "Wire".into(),
                description: None,
                priority: 2,
                due_date: Some(due),
            },
            Uuid::now_v7(),
        );
        task.assigned_to = Some(Uuid::now_v7());

        let msg = proto::Task::from(task.clone());
        assert_eq!(msg.id, task.id.to_string());
        assert_eq!(msg.due_date, Some(due.timestamp()));
        assert_eq!(msg.status, proto::TaskStatus::Pending as i32);

        let back = Task::try_from(msg).unwrap();
        assert_eq!(back.assigned_to, task.assigned_to);
        assert_eq!(back.due_date, Some(due));
    }

    #[test]
    fn test_list_response_keeps_order() {
        let creator = Uuid::now_v7();
        let tasks: Vec<Task> = ["first", "second"]
            .into_iter()
            .map(|title| {
                Task::new(
                    CreateTask {
                        title: title.into(),
                        description: None,
                        priority: 1,
                        due_date: None,
                    },
                    creator,
                )
            })
            .collect();

        let resp = list_response(tasks.clone());
        assert_eq!(resp.tasks.len(), 2);
        assert_eq!(resp.tasks[0].id, tasks[0].id.to_string());
        assert_eq!(resp.tasks[1].title, "second");
    }

    #[test]
    fn test_task_message_with_bad_id() {
        let msg = proto::Task {
            id: "not-a-uuid".into(),
            status: 1,
            ..Default::default()
        };
        let status = Task::try_from(msg).unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert!(status.message().contains("id"));
    }
}
