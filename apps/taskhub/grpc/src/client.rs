//! Typed client for both taskhub services.
//!
//! Requests are built from domain types and responses come back as domain
//! types, so callers never touch the generated messages.
//!
//! ```ignore
//! let mut client = TaskhubClient::connect("http://127.0.0.1:50051").await?;
//! let token = client.login("alice", "secret1").await?;
//! client.set_auth_token(token.access_token);
//! let tasks = client.list_tasks(None).await?;
//! ```

use domain_tasks::conversions::{task_from_response, update_request};
use domain_tasks::{CreateTask, Task, TaskStatus, UpdateTask};
use domain_users::conversions::expires_at;
use domain_users::{RegisterUser, TokenResponse, UpdateUser, UserResponse};
use grpc_client::conversions::parse_uuid;
use grpc_client::{AuthInterceptor, GrpcResult, create_channel};
use rpc::taskhub::v1 as proto;
use rpc::taskhub::v1::task_service_client::TaskServiceClient;
use rpc::taskhub::v1::user_service_client::UserServiceClient;
use tonic::codec::CompressionEncoding;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;
use tonic::{Request, Status};
use uuid::Uuid;

type Intercepted = InterceptedService<Channel, AuthInterceptor>;

/// Result of `ValidateToken`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenValidation {
    pub valid: bool,
    pub user_id: Option<Uuid>,
    pub username: String,
}

#[derive(Clone, Debug)]
pub struct TaskhubClient {
    channel: Channel,
    auth_token: Option<String>,
    compression: bool,
}

impl TaskhubClient {
    pub async fn connect(addr: impl Into<String>) -> GrpcResult<Self> {
        Ok(Self::new(create_channel(addr).await?))
    }

    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            auth_token: None,
            compression: true,
        }
    }

    /// For servers started with `GRPC_COMPRESSION=false`.
    pub fn without_compression(mut self) -> Self {
        self.compression = false;
        self
    }

    /// Sent as a bearer token on every later call.
    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
    }

    pub fn clear_auth_token(&mut self) {
        self.auth_token = None;
    }

    fn interceptor(&self) -> AuthInterceptor {
        match &self.auth_token {
            Some(token) => AuthInterceptor::bearer(token.clone()),
            None => AuthInterceptor::anonymous(),
        }
    }

    fn tasks(&self) -> TaskServiceClient<Intercepted> {
        let client = TaskServiceClient::with_interceptor(self.channel.clone(), self.interceptor());
        if self.compression {
            client
                .send_compressed(CompressionEncoding::Zstd)
                .accept_compressed(CompressionEncoding::Zstd)
        } else {
            client
        }
    }

    fn users(&self) -> UserServiceClient<Intercepted> {
        let client = UserServiceClient::with_interceptor(self.channel.clone(), self.interceptor());
        if self.compression {
            client
                .send_compressed(CompressionEncoding::Zstd)
                .accept_compressed(CompressionEncoding::Zstd)
        } else {
            client
        }
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub async fn register(&self, input: RegisterUser) -> Result<UserResponse, Status> {
        let resp = self
            .users()
            .register(Request::new(proto::RegisterRequest {
                username: input.username,
                email: input.email,
                password: input.password,
                first_name: input.first_name,
                last_name: input.last_name,
            }))
            .await?
            .into_inner();
        user_from_response(resp)
    }

    pub async fn login(&self, login: &str, password: &str) -> Result<TokenResponse, Status> {
        let resp = self
            .users()
            .login(Request::new(proto::LoginRequest {
                login: login.to_string(),
                password: password.to_string(),
            }))
            .await?
            .into_inner();
        token_from_response(resp)
    }

    pub async fn refresh_token(&self, token: &str) -> Result<TokenResponse, Status> {
        let resp = self
            .users()
            .refresh_token(Request::new(proto::RefreshTokenRequest {
                token: token.to_string(),
            }))
            .await?
            .into_inner();
        token_from_response(resp)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<UserResponse, Status> {
        let resp = self
            .users()
            .get_user(Request::new(proto::GetUserRequest { id: id.to_string() }))
            .await?
            .into_inner();
        user_from_response(resp)
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> Result<UserResponse, Status> {
        let resp = self
            .users()
            .update_user(Request::new(proto::UpdateUserRequest {
                id: id.to_string(),
                email: input.email,
                first_name: input.first_name,
                last_name: input.last_name,
                password: input.password,
            }))
            .await?
            .into_inner();
        user_from_response(resp)
    }

    pub async fn validate_token(&self, token: &str) -> Result<TokenValidation, Status> {
        let resp = self
            .users()
            .validate_token(Request::new(proto::ValidateTokenRequest {
                token: token.to_string(),
            }))
            .await?
            .into_inner();

        let user_id = if resp.user_id.is_empty() {
            None
        } else {
            Some(parse_uuid("user_id", &resp.user_id)?)
        };
        Ok(TokenValidation {
            valid: resp.valid,
            user_id,
            username: resp.username,
        })
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    pub async fn create_task(&self, input: CreateTask) -> Result<Task, Status> {
        let resp = self
            .tasks()
            .create_task(Request::new(input.into()))
            .await?
            .into_inner();
        task_from_response(resp)
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task, Status> {
        let resp = self
            .tasks()
            .get_task(Request::new(proto::GetTaskRequest { id: id.to_string() }))
            .await?
            .into_inner();
        task_from_response(resp)
    }

    pub async fn update_task(&self, id: Uuid, input: UpdateTask) -> Result<Task, Status> {
        let resp = self
            .tasks()
            .update_task(Request::new(update_request(id, input)))
            .await?
            .into_inner();
        task_from_response(resp)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<bool, Status> {
        let resp = self
            .tasks()
            .delete_task(Request::new(proto::DeleteTaskRequest { id: id.to_string() }))
            .await?
            .into_inner();
        Ok(resp.success)
    }

    /// `None` lists every status.
    pub async fn list_tasks(&self, status: Option<TaskStatus>) -> Result<Vec<Task>, Status> {
        let status = status.map_or(proto::TaskStatus::Unspecified as i32, i32::from);
        let resp = self
            .tasks()
            .list_tasks(Request::new(proto::ListTasksRequest { status }))
            .await?
            .into_inner();
        tasks_from_response(resp)
    }

    pub async fn assign_task(&self, task_id: Uuid, assignee_id: Uuid) -> Result<Task, Status> {
        let resp = self
            .tasks()
            .assign_task(Request::new(proto::AssignTaskRequest {
                task_id: task_id.to_string(),
                assignee_id: assignee_id.to_string(),
            }))
            .await?
            .into_inner();
        task_from_response(resp)
    }

    pub async fn get_user_tasks(&self, user_id: Uuid) -> Result<Vec<Task>, Status> {
        let resp = self
            .tasks()
            .get_user_tasks(Request::new(proto::GetUserTasksRequest {
                user_id: user_id.to_string(),
            }))
            .await?
            .into_inner();
        tasks_from_response(resp)
    }
}

fn user_from_response(resp: proto::UserResponse) -> Result<UserResponse, Status> {
    resp.user
        .ok_or_else(|| Status::internal("response carried no user"))?
        .try_into()
}

fn token_from_response(resp: proto::TokenResponse) -> Result<TokenResponse, Status> {
    Ok(TokenResponse::bearer(
        resp.access_token.clone(),
        expires_at(&resp)?,
        parse_uuid("user_id", &resp.user_id)?,
        resp.username,
    ))
}

fn tasks_from_response(resp: proto::ListTasksResponse) -> Result<Vec<Task>, Status> {
    resp.tasks.into_iter().map(Task::try_from).collect()
}
