use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse, UnprocessableResponse,
    },
};
use domain_auth::AuthUser;
use domain_users::UserRepository;
use std::str::FromStr;
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::{TaskError, TaskResult};
use crate::models::{AssignTask, CreateTask, ListTasksQuery, Task, TaskStatus, UpdateTask};
use crate::repository::TaskRepository;
use crate::service::TaskService;

/// OpenAPI documentation for the tasks endpoints
#[derive(OpenApi)]
#[openapi(
    paths(list_tasks, create_task, get_task, update_task, delete_task, assign_task, user_tasks),
    components(
        schemas(Task, TaskStatus, CreateTask, UpdateTask, AssignTask),
        responses(
            BadRequestResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            UnprocessableResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "tasks", description = "Task lifecycle")
    )
)]
pub struct ApiDoc;

type SharedService<R, U> = Arc<TaskService<R, U>>;

/// Every route expects an [`AuthUser`] from `require_auth`.
pub fn router<R: TaskRepository, U: UserRepository>(service: TaskService<R, U>) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", get(get_task).put(update_task).delete(delete_task))
        .route("/tasks/{id}/assign", post(assign_task))
        .route("/users/{id}/tasks", get(user_tasks))
        .with_state(Arc::new(service))
}

/// List tasks, optionally by status
#[utoipa::path(
    get,
    path = "/tasks",
    tag = "tasks",
    security(("bearer" = [])),
    params(ListTasksQuery),
    responses(
        (status = 200, description = "Tasks ordered by due date", body = Vec<Task>),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn list_tasks<R: TaskRepository, U: UserRepository>(
    State(service): State<SharedService<R, U>>,
    _auth: AuthUser,
    Query(query): Query<ListTasksQuery>,
) -> TaskResult<Json<Vec<Task>>> {
    let tasks = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => {
            let status = TaskStatus::from_str(raw)
                .map_err(|_| TaskError::Validation(format!("Unknown status: {}", raw)))?;
            service.list_by_status(status).await?
        }
        None => service.list_all().await?,
    };
    Ok(Json(tasks))
}

/// Create a task owned by the caller
#[utoipa::path(
    post,
    path = "/tasks",
    tag = "tasks",
    security(("bearer" = [])),
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn create_task<R: TaskRepository, U: UserRepository>(
    State(service): State<SharedService<R, U>>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateTask>,
) -> TaskResult<impl IntoResponse> {
    let task = service.create(input, auth.id).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Get a task by ID
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "tasks",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_task<R: TaskRepository, U: UserRepository>(
    State(service): State<SharedService<R, U>>,
    _auth: AuthUser,
    UuidPath(id): UuidPath,
) -> TaskResult<Json<Task>> {
    Ok(Json(service.get(id).await?))
}

/// Update a task you created or are assigned to
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    tag = "tasks",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = UpdateTask,
    responses(
        (status = 200, description = "Task updated", body = Task),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = UnprocessableResponse)
    )
)]
async fn update_task<R: TaskRepository, U: UserRepository>(
    State(service): State<SharedService<R, U>>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateTask>,
) -> TaskResult<Json<Task>> {
    Ok(Json(service.update(id, input, auth.id).await?))
}

/// Delete a task you created
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = "tasks",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_task<R: TaskRepository, U: UserRepository>(
    State(service): State<SharedService<R, U>>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
) -> TaskResult<StatusCode> {
    service.delete(id, auth.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Assign a task you created to another user
#[utoipa::path(
    post,
    path = "/tasks/{id}/assign",
    tag = "tasks",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = AssignTask,
    responses(
        (status = 200, description = "Task assigned", body = Task),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn assign_task<R: TaskRepository, U: UserRepository>(
    State(service): State<SharedService<R, U>>,
    auth: AuthUser,
    UuidPath(id): UuidPath,
    Json(input): Json<AssignTask>,
) -> TaskResult<Json<Task>> {
    let assignee = Uuid::parse_str(input.assignee_id.trim())
        .map_err(|_| TaskError::Validation(format!("Invalid UUID: {}", input.assignee_id)))?;

    Ok(Json(service.assign(id, assignee, auth.id).await?))
}

/// Tasks a user created or is assigned to
#[utoipa::path(
    get,
    path = "/users/{id}/tasks",
    tag = "tasks",
    security(("bearer" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Tasks ordered by due date", body = Vec<Task>),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn user_tasks<R: TaskRepository, U: UserRepository>(
    State(service): State<SharedService<R, U>>,
    _auth: AuthUser,
    UuidPath(id): UuidPath,
) -> TaskResult<Json<Vec<Task>>> {
    Ok(Json(service.list_by_user(id).await?))
}
