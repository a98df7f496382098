//! `taskhub.v1.TaskService` on top of the tasks domain.
//!
//! Every call is expected to pass through `BearerAuthInterceptor`, which puts
//! the caller into the request extensions.

use domain_auth::AuthUser;
use domain_tasks::conversions::{list_response, status_filter};
use domain_tasks::{CreateTask, TaskRepository, TaskService, UpdateTask};
use domain_users::UserRepository;
use grpc_client::ToTonicResult;
use grpc_client::conversions::parse_uuid;
use rpc::taskhub::v1::{
    AssignTaskRequest, CreateTaskRequest, DeleteTaskRequest, DeleteTaskResponse, GetTaskRequest,
    GetUserTasksRequest, ListTasksRequest, ListTasksResponse, TaskResponse, UpdateTaskRequest,
    task_service_server::TaskService as TaskRpc,
};
use tonic::{Request, Response, Status};
use tracing::{info, instrument};

pub struct TaskServiceImpl<R: TaskRepository, U: UserRepository> {
    service: TaskService<R, U>,
}

impl<R: TaskRepository, U: UserRepository> TaskServiceImpl<R, U> {
    pub fn new(service: TaskService<R, U>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl<R: TaskRepository, U: UserRepository> TaskRpc for TaskServiceImpl<R, U> {
    #[instrument(skip_all)]
    async fn create_task(
        &self,
        request: Request<CreateTaskRequest>,
    ) -> Result<Response<TaskResponse>, Status> {
        let caller = AuthUser::from_request(&request)?;
        let input = CreateTask::try_from(request.into_inner())?;

        let task = self.service.create(input, caller.id).await.to_tonic()?;

        info!(task_id = %task.id, user_id = %caller.id, "task created over gRPC");
        Ok(Response::new(task.into()))
    }

    #[instrument(skip_all)]
    async fn get_task(
        &self,
        request: Request<GetTaskRequest>,
    ) -> Result<Response<TaskResponse>, Status> {
        AuthUser::from_request(&request)?;
        let id = parse_uuid("id", &request.get_ref().id)?;

        let task = self.service.get(id).await.to_tonic()?;
        Ok(Response::new(task.into()))
    }

    #[instrument(skip_all)]
    async fn update_task(
        &self,
        request: Request<UpdateTaskRequest>,
    ) -> Result<Response<TaskResponse>, Status> {
        let caller = AuthUser::from_request(&request)?;
        let req = request.into_inner();
        let id = parse_uuid("id", &req.id)?;
        let input = UpdateTask::try_from(req)?;

        let task = self.service.update(id, input, caller.id).await.to_tonic()?;
        Ok(Response::new(task.into()))
    }

    #[instrument(skip_all)]
    async fn delete_task(
        &self,
        request: Request<DeleteTaskRequest>,
    ) -> Result<Response<DeleteTaskResponse>, Status> {
        let caller = AuthUser::from_request(&request)?;
        let id = parse_uuid("id", &request.get_ref().id)?;

        self.service.delete(id, caller.id).await.to_tonic()?;
        Ok(Response::new(DeleteTaskResponse { success: true }))
    }

    #[instrument(skip_all)]
    async fn list_tasks(
        &self,
        request: Request<ListTasksRequest>,
    ) -> Result<Response<ListTasksResponse>, Status> {
        AuthUser::from_request(&request)?;

        let tasks = match status_filter(request.get_ref().status)? {
            Some(status) => self.service.list_by_status(status).await,
            None => self.service.list_all().await,
        }
        .to_tonic()?;

        Ok(Response::new(list_response(tasks)))
    }

    #[instrument(skip_all)]
    async fn assign_task(
        &self,
        request: Request<AssignTaskRequest>,
    ) -> Result<Response<TaskResponse>, Status> {
        let caller = AuthUser::from_request(&request)?;
        let req = request.get_ref();
        let task_id = parse_uuid("task_id", &req.task_id)?;
        let assignee_id = parse_uuid("assignee_id", &req.assignee_id)?;

        let task = self
            .service
            .assign(task_id, assignee_id, caller.id)
            .await
            .to_tonic()?;
        Ok(Response::new(task.into()))
    }

    #[instrument(skip_all)]
    async fn get_user_tasks(
        &self,
        request: Request<GetUserTasksRequest>,
    ) -> Result<Response<ListTasksResponse>, Status> {
        AuthUser::from_request(&request)?;
        let user_id = parse_uuid("user_id", &request.get_ref().user_id)?;

        let tasks = self.service.list_by_user(user_id).await.to_tonic()?;
        Ok(Response::new(list_response(tasks)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_tasks::InMemoryTaskRepository;
    use domain_users::{InMemoryUserRepository, User, UserService};
    use rpc::taskhub::v1::TaskStatus as ProtoStatus;
    use tonic::Code;
    use uuid::Uuid;

    struct Fixture {
        rpc: TaskServiceImpl<InMemoryTaskRepository, InMemoryUserRepository>,
        alice: AuthUser,
        bob: AuthUser,
    }

    async fn seed(users: &InMemoryUserRepository, username: &str) -> AuthUser {
        let user = User::new(
            username.to_string(),
            format!("{}@example.com", username),
            "$argon2id$test".to_string(),
            None,
            None,
        );
        let user = domain_users::UserRepository::create(users, user).await.unwrap();
        AuthUser {
            id: user.id,
            username: user.username,
        }
    }

    async fn fixture() -> Fixture {
        let users = InMemoryUserRepository::new();
        let alice = seed(&users, "alice").await;
        let bob = seed(&users, "bob").await;
        let service = TaskService::new(InMemoryTaskRepository::new(), UserService::new(users));

        Fixture {
            rpc: TaskServiceImpl::new(service),
            alice,
            bob,
        }
    }

    fn as_user<T>(user: &AuthUser, message: T) -> Request<T> {
        let mut request = Request::new(message);
        request.extensions_mut().insert(user.clone());
        request
    }

    fn create_request(title: &str, priority: i32) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.to_string(),
            description: None,
            priority,
            due_date: None,
        }
    }

    async fn create(f: &Fixture, user: &AuthUser, title: &str) -> rpc::taskhub::v1::Task {
        f.rpc
            .create_task(as_user(user, create_request(title, 3)))
            .await
            .unwrap()
            .into_inner()
            .task
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_requires_caller() {
        let f = fixture().await;
        let status = f
            .rpc
            .create_task(Request::new(create_request("Write docs", 3)))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated);
    }

    #[tokio::test]
    async fn test_create_sets_creator_and_pending() {
        let f = fixture().await;
        let task = create(&f, &f.alice, "Write docs").await;

        assert_eq!(task.created_by, f.alice.id.to_string());
        assert_eq!(task.status, ProtoStatus::Pending as i32);
        assert!(task.assigned_to.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_priority() {
        let f = fixture().await;
        let status = f
            .rpc
            .create_task(as_user(&f.alice, create_request("Write docs", 0)))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_get_unknown_and_malformed_ids() {
        let f = fixture().await;

        let status = f
            .rpc
            .get_task(as_user(&f.alice, GetTaskRequest { id: Uuid::now_v7().to_string() }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);

        let status = f
            .rpc
            .get_task(as_user(&f.alice, GetTaskRequest { id: "nope".into() }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_update_transition_rules() {
        let f = fixture().await;
        let task = create(&f, &f.alice, "Ship").await;

        let done = UpdateTaskRequest {
            id: task.id.clone(),
            status: Some(ProtoStatus::Completed as i32),
            ..Default::default()
        };
        let updated = f
            .rpc
            .update_task(as_user(&f.alice, done))
            .await
            .unwrap()
            .into_inner()
            .task
            .unwrap();
        assert_eq!(updated.status, ProtoStatus::Completed as i32);

        let back = UpdateTaskRequest {
            id: task.id,
            status: Some(ProtoStatus::Pending as i32),
            ..Default::default()
        };
        let status = f.rpc.update_task(as_user(&f.alice, back)).await.unwrap_err();
        assert_eq!(status.code(), Code::FailedPrecondition);
    }

    #[tokio::test]
    async fn test_update_by_outsider_is_denied() {
        let f = fixture().await;
        let task = create(&f, &f.alice, "Private").await;

        let req = UpdateTaskRequest {
            id: task.id,
            title: Some("Mine now".into()),
            ..Default::default()
        };
        let status = f.rpc.update_task(as_user(&f.bob, req)).await.unwrap_err();
        assert_eq!(status.code(), Code::PermissionDenied);
    }

    #[tokio::test]
    async fn test_assign_then_assignee_updates() {
        let f = fixture().await;
        let task = create(&f, &f.alice, "Review").await;

        let assigned = f
            .rpc
            .assign_task(as_user(
                &f.alice,
                AssignTaskRequest {
                    task_id: task.id.clone(),
                    assignee_id: f.bob.id.to_string(),
                },
            ))
            .await
            .unwrap()
            .into_inner()
            .task
            .unwrap();
        assert_eq!(assigned.assigned_to, Some(f.bob.id.to_string()));
        assert_eq!(assigned.status, ProtoStatus::InProgress as i32);

        let req = UpdateTaskRequest {
            id: task.id,
            status: Some(ProtoStatus::Completed as i32),
            ..Default::default()
        };
        assert!(f.rpc.update_task(as_user(&f.bob, req)).await.is_ok());
    }

    #[tokio::test]
    async fn test_assign_unknown_user_is_not_found() {
        let f = fixture().await;
        let task = create(&f, &f.alice, "Review").await;

        let status = f
            .rpc
            .assign_task(as_user(
                &f.alice,
                AssignTaskRequest {
                    task_id: task.id,
                    assignee_id: Uuid::now_v7().to_string(),
                },
            ))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn test_delete_is_creator_only() {
        let f = fixture().await;
        let task = create(&f, &f.alice, "Temp").await;

        let status = f
            .rpc
            .delete_task(as_user(&f.bob, DeleteTaskRequest { id: task.id.clone() }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::PermissionDenied);

        let resp = f
            .rpc
            .delete_task(as_user(&f.alice, DeleteTaskRequest { id: task.id }))
            .await
            .unwrap()
            .into_inner();
        assert!(resp.success);
    }

    #[tokio::test]
    async fn test_list_filters_by_status_and_user() {
        let f = fixture().await;
        let first = create(&f, &f.alice, "One").await;
        create(&f, &f.bob, "Two").await;

        let req = UpdateTaskRequest {
            id: first.id.clone(),
            status: Some(ProtoStatus::InProgress as i32),
            ..Default::default()
        };
        f.rpc.update_task(as_user(&f.alice, req)).await.unwrap();

        let all = f
            .rpc
            .list_tasks(as_user(&f.alice, ListTasksRequest { status: 0 }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(all.tasks.len(), 2);

        let in_progress = f
            .rpc
            .list_tasks(as_user(
                &f.alice,
                ListTasksRequest {
                    status: ProtoStatus::InProgress as i32,
                },
            ))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(in_progress.tasks.len(), 1);
        assert_eq!(in_progress.tasks[0].id, first.id);

        let status = f
            .rpc
            .list_tasks(as_user(&f.alice, ListTasksRequest { status: 42 }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);

        let bobs = f
            .rpc
            .get_user_tasks(as_user(
                &f.alice,
                GetUserTasksRequest {
                    user_id: f.bob.id.to_string(),
                },
            ))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(bobs.tasks.len(), 1);
        assert_eq!(bobs.tasks[0].title, "Two");
    }
}
