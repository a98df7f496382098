//! `taskhub.v1.UserService`.
//!
//! Registration, login, refresh and token validation are public. `GetUser` and
//! `UpdateUser` authenticate inline from the `authorization` metadata.

use domain_auth::{AuthService, authenticate_metadata, authorize_resource_access};
use domain_users::conversions::token_response;
use domain_users::{RegisterUser, UpdateUser, UserRepository, UserService};
use grpc_client::ToTonicResult;
use grpc_client::conversions::parse_uuid;
use rpc::taskhub::v1::{
    GetUserRequest, LoginRequest, RefreshTokenRequest, RegisterRequest, TokenResponse,
    UpdateUserRequest, UserResponse, ValidateTokenRequest, ValidateTokenResponse,
    user_service_server::UserService as UserRpc,
};
use tonic::{Request, Response, Status};
use tracing::{debug, error, instrument};

pub struct UserServiceImpl<R: UserRepository> {
    users: UserService<R>,
    auth: AuthService<UserService<R>>,
}

impl<R: UserRepository> UserServiceImpl<R> {
    pub fn new(users: UserService<R>, auth: AuthService<UserService<R>>) -> Self {
        Self { users, auth }
    }
}

#[tonic::async_trait]
impl<R: UserRepository> UserRpc for UserServiceImpl<R> {
    #[instrument(skip_all)]
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let input = RegisterUser::from(request.into_inner());
        let user = self.users.register(input).await.to_tonic()?;
        Ok(Response::new(user.into()))
    }

    #[instrument(skip_all)]
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<TokenResponse>, Status> {
        let req = request.into_inner();
        let (identity, issued) = self.auth.login(&req.login, &req.password).await.to_tonic()?;
        Ok(Response::new(token_response(identity, issued)))
    }

    #[instrument(skip_all)]
    async fn refresh_token(
        &self,
        request: Request<RefreshTokenRequest>,
    ) -> Result<Response<TokenResponse>, Status> {
        let (identity, issued) = self
            .auth
            .refresh_token(&request.get_ref().token)
            .await
            .to_tonic()?;
        Ok(Response::new(token_response(identity, issued)))
    }

    #[instrument(skip_all)]
    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        authenticate_metadata(self.auth.tokens(), request.metadata())?;
        let id = parse_uuid("id", &request.get_ref().id)?;

        let user = self.users.get_by_id(id).await.to_tonic()?;
        Ok(Response::new(user.into()))
    }

    #[instrument(skip_all)]
    async fn update_user(
        &self,
        request: Request<UpdateUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let caller = authenticate_metadata(self.auth.tokens(), request.metadata())?;
        let req = request.into_inner();
        let id = parse_uuid("id", &req.id)?;
        authorize_resource_access(caller.id, id, "user")?;

        let user = self.users.update(id, UpdateUser::from(req)).await.to_tonic()?;
        Ok(Response::new(user.into()))
    }

    /// A bad or expired token is a normal answer here, not an error.
    #[instrument(skip_all)]
    async fn validate_token(
        &self,
        request: Request<ValidateTokenRequest>,
    ) -> Result<Response<ValidateTokenResponse>, Status> {
        let token = request.get_ref().token.trim();
        if token.is_empty() {
            return Err(Status::invalid_argument("token is required"));
        }

        let user_id = match self.auth.tokens().validate_token(token) {
            Ok(id) => id,
            Err(e) => {
                debug!(error = %e, "token rejected");
                return Ok(Response::new(ValidateTokenResponse {
                    valid: false,
                    ..Default::default()
                }));
            }
        };

        let username = match self.users.get_by_id(user_id).await {
            Ok(user) => user.username,
            Err(e) => {
                error!(user_id = %user_id, error = %e, "token subject lookup failed");
                String::new()
            }
        };

        Ok(Response::new(ValidateTokenResponse {
            valid: true,
            user_id: user_id.to_string(),
            username,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_auth::{AuthConfig, TokenService};
    use domain_users::InMemoryUserRepository;
    use tonic::Code;
    use uuid::Uuid;

    const SECRET: &str = "grpc-users-test-secret-0123456789abcdef";

    fn rpc() -> UserServiceImpl<InMemoryUserRepository> {
        let users = UserService::new(InMemoryUserRepository::new());
        let tokens = TokenService::new(&AuthConfig::new(SECRET));
        let auth = AuthService::new(tokens, users.clone());
        UserServiceImpl::new(users, auth)
    }

    fn register_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "secret1".to_string(),
            first_name: None,
            last_name: None,
        }
    }

    fn with_token<T>(token: &str, message: T) -> Request<T> {
        let mut request = Request::new(message);
        request
            .metadata_mut()
            .insert("authorization", format!("Bearer {}", token).parse().unwrap());
        request
    }

    async fn register_and_login(rpc: &UserServiceImpl<InMemoryUserRepository>, name: &str) -> TokenResponse {
        rpc.register(Request::new(register_request(name))).await.unwrap();
        rpc.login(Request::new(LoginRequest {
            login: name.to_string(),
            password: "secret1".to_string(),
        }))
        .await
        .unwrap()
        .into_inner()
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let rpc = rpc();
        let user = rpc
            .register(Request::new(register_request("alice")))
            .await
            .unwrap()
            .into_inner()
            .user
            .unwrap();
        assert_eq!(user.email, "alice@example.com");

        let token = rpc
            .login(Request::new(LoginRequest {
                login: "alice@example.com".into(),
                password: "secret1".into(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(token.user_id, user.id);
        assert_eq!(token.username, "alice");
        assert!(!token.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_is_already_exists() {
        let rpc = rpc();
        rpc.register(Request::new(register_request("alice"))).await.unwrap();
        let status = rpc
            .register(Request::new(register_request("alice")))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::AlreadyExists);
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthenticated() {
        let rpc = rpc();
        rpc.register(Request::new(register_request("alice"))).await.unwrap();
        let status = rpc
            .login(Request::new(LoginRequest {
                login: "alice".into(),
                password: "nope".into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated);
    }

    #[tokio::test]
    async fn test_refresh_token() {
        let rpc = rpc();
        let issued = register_and_login(&rpc, "alice").await;

        let refreshed = rpc
            .refresh_token(Request::new(RefreshTokenRequest {
                token: issued.access_token,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(refreshed.user_id, issued.user_id);

        let status = rpc
            .refresh_token(Request::new(RefreshTokenRequest {
                token: "garbage".into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated);
    }

    #[tokio::test]
    async fn test_get_user_authenticates_inline() {
        let rpc = rpc();
        let alice = register_and_login(&rpc, "alice").await;

        let status = rpc
            .get_user(Request::new(GetUserRequest { id: alice.user_id.clone() }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::Unauthenticated);

        let user = rpc
            .get_user(with_token(&alice.access_token, GetUserRequest { id: alice.user_id.clone() }))
            .await
            .unwrap()
            .into_inner()
            .user
            .unwrap();
        assert_eq!(user.username, "alice");

        let status = rpc
            .get_user(with_token(
                &alice.access_token,
                GetUserRequest { id: Uuid::now_v7().to_string() },
            ))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn test_update_user_is_self_only() {
        let rpc = rpc();
        let alice = register_and_login(&rpc, "alice").await;
        let bob = register_and_login(&rpc, "bob").await;

        let status = rpc
            .update_user(with_token(
                &alice.access_token,
                UpdateUserRequest {
                    id: bob.user_id.clone(),
                    first_name: Some("Mallory".into()),
                    ..Default::default()
                },
            ))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::PermissionDenied);

        let user = rpc
            .update_user(with_token(
                &alice.access_token,
                UpdateUserRequest {
                    id: alice.user_id.clone(),
                    first_name: Some("Alice".into()),
                    ..Default::default()
                },
            ))
            .await
            .unwrap()
            .into_inner()
            .user
            .unwrap();
        assert_eq!(user.first_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_validate_token() {
        let rpc = rpc();
        let alice = register_and_login(&rpc, "alice").await;

        let resp = rpc
            .validate_token(Request::new(ValidateTokenRequest {
                token: alice.access_token.clone(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert!(resp.valid);
        assert_eq!(resp.user_id, alice.user_id);
        assert_eq!(resp.username, "alice");

        let resp = rpc
            .validate_token(Request::new(ValidateTokenRequest {
                token: "not-a-jwt".into(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert!(!resp.valid);
        assert!(resp.user_id.is_empty());

        let status = rpc
            .validate_token(Request::new(ValidateTokenRequest { token: "  ".into() }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn test_validate_token_for_deleted_user() {
        let rpc = rpc();
        let alice = register_and_login(&rpc, "alice").await;
        let id = Uuid::parse_str(&alice.user_id).unwrap();
        rpc.users.delete(id).await.unwrap();

        let resp = rpc
            .validate_token(Request::new(ValidateTokenRequest {
                token: alice.access_token,
            }))
            .await
            .unwrap()
            .into_inner();
        assert!(resp.valid);
        assert!(resp.username.is_empty());
    }
}
