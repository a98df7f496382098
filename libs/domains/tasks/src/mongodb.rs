//! MongoDB implementation of TaskRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Document, doc},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{TaskError, TaskResult};
use crate::models::{Task, TaskFilter, TaskStatus};
use crate::repository::TaskRepository;

pub const COLLECTION: &str = "tasks";

/// Stored shape of a task. Ids are kept as strings so `$or` lookups on
/// `created_by`/`assigned_to` stay readable from the shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskDocument {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    status: String,
    priority: i32,
    #[serde(default)]
    due_date: Option<bson::DateTime>,
    #[serde(default)]
    assigned_to: Option<String>,
    created_by: String,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl From<&Task> for TaskDocument {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.to_string(),
            priority: task.priority,
            due_date: task.due_date.map(to_bson_date),
            assigned_to: task.assigned_to.map(|id| id.to_string()),
            created_by: task.created_by.to_string(),
            created_at: to_bson_date(task.created_at),
            updated_at: to_bson_date(task.updated_at),
        }
    }
}

impl TryFrom<TaskDocument> for Task {
    type Error = TaskError;

    fn try_from(doc: TaskDocument) -> TaskResult<Self> {
        Ok(Task {
            id: parse_id(&doc.id)?,
            title: doc.title,
            description: doc.description,
            status: TaskStatus::from_str(&doc.status)
                .map_err(|_| TaskError::Database(format!("unknown status '{}'", doc.status)))?,
            priority: doc.priority,
            due_date: doc.due_date.map(from_bson_date),
            assigned_to: doc.assigned_to.as_deref().map(parse_id).transpose()?,
            created_by: parse_id(&doc.created_by)?,
            created_at: from_bson_date(doc.created_at),
            updated_at: from_bson_date(doc.updated_at),
        })
    }
}

fn to_bson_date(value: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(value.timestamp_millis())
}

fn from_bson_date(value: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

fn parse_id(raw: &str) -> TaskResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| TaskError::Database(format!("bad id '{}': {}", raw, e)))
}

#[derive(Clone)]
pub struct MongoTaskRepository {
    collection: Collection<TaskDocument>,
}

impl MongoTaskRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<TaskDocument>(COLLECTION),
        }
    }

    pub async fn ensure_indexes(&self) -> TaskResult<()> {
        let indexes = ["created_by", "assigned_to", "status", "due_date"]
            .into_iter()
            .map(|field| {
                let mut keys = Document::new();
                keys.insert(field, 1);
                IndexModel::builder().keys(keys).build()
            });

        self.collection.create_indexes(indexes).await?;

        tracing::info!(collection = COLLECTION, "indexes ensured");
        Ok(())
    }

    fn by_id(id: Uuid) -> Document {
        doc! { "_id": id.to_string() }
    }

    fn user_filter(user_id: Uuid) -> Document {
        let id = user_id.to_string();
        doc! { "$or": [ { "created_by": &id }, { "assigned_to": &id } ] }
    }

    async fn find_many(&self, filter: Document) -> TaskResult<Vec<Task>> {
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "due_date": 1, "_id": 1 })
            .await?;
        let docs: Vec<TaskDocument> = cursor.try_collect().await?;

        docs.into_iter().map(Task::try_from).collect()
    }
}

#[async_trait]
impl TaskRepository for MongoTaskRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> TaskResult<Option<Task>> {
        self.collection
            .find_one(Self::by_id(id))
            .await?
            .map(Task::try_from)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        let mut query = Document::new();
        if let Some(status) = filter.status {
            query.insert("status", status.to_string());
        }
        self.find_many(query).await
    }

    #[instrument(skip(self))]
    async fn find_by_status(&self, status: TaskStatus) -> TaskResult<Vec<Task>> {
        self.find_many(doc! { "status": status.to_string() }).await
    }

    #[instrument(skip(self))]
    async fn find_by_user(&self, user_id: Uuid) -> TaskResult<Vec<Task>> {
        self.find_many(Self::user_filter(user_id)).await
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn create(&self, task: Task) -> TaskResult<Task> {
        self.collection.insert_one(TaskDocument::from(&task)).await?;

        tracing::info!("Task created");
        Ok(task)
    }

    #[instrument(skip(self, task), fields(task_id = %task.id))]
    async fn update(&self, task: Task) -> TaskResult<Task> {
        let result = self
            .collection
            .replace_one(Self::by_id(task.id), TaskDocument::from(&task))
            .await?;

        if result.matched_count == 0 {
            return Err(TaskError::NotFound(task.id));
        }

        tracing::info!("Task updated");
        Ok(task)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> TaskResult<bool> {
        let result = self.collection.delete_one(Self::by_id(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(task_id = %id, "Task deleted");
        }
        Ok(result.deleted_count > 0)
    }
}
