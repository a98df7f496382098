use grpc_client::bearer_token;
use tonic::{Request, Status, metadata::MetadataMap};

use crate::middleware::AuthUser;
use crate::token::TokenService;

/// Authenticates the caller from `authorization` metadata.
///
/// Used inline by handlers that are only partly protected.
pub fn authenticate_metadata(tokens: &TokenService, metadata: &MetadataMap) -> Result<AuthUser, Status> {
    let token = bearer_token(metadata).ok_or_else(|| {
        tracing::debug!("no token in authorization metadata");
        Status::unauthenticated("Missing authorization token")
    })?;

    tokens
        .decode_claims(token)
        .and_then(AuthUser::from_claims)
        .map_err(Status::from)
}

/// Server interceptor that requires a valid token on every call and stores
/// the caller as an [`AuthUser`] extension.
///
/// ```ignore
/// let svc = TaskServiceServer::with_interceptor(tasks, BearerAuthInterceptor::new(tokens));
/// ```
#[derive(Clone, Debug)]
pub struct BearerAuthInterceptor {
    tokens: TokenService,
}

impl BearerAuthInterceptor {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }
}

impl tonic::service::Interceptor for BearerAuthInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        let user = authenticate_metadata(&self.tokens, request.metadata())?;
        request.extensions_mut().insert(user);
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use tonic::service::Interceptor;
    use uuid::Uuid;

    fn tokens() -> TokenService {
        TokenService::new(&AuthConfig::new("0123456789abcdef0123456789abcdef"))
    }

    fn with_auth(value: &str) -> Request<()> {
        let mut request = Request::new(());
        request
            .metadata_mut()
            .insert("authorization", value.parse().unwrap());
        request
    }

    #[test]
    fn test_bearer_prefix_accepted() {
        let tokens = tokens();
        let id = Uuid::now_v7();
        let issued = tokens.issue_token(id, "alice").unwrap();

        let mut interceptor = BearerAuthInterceptor::new(tokens);
        let request = interceptor
            .call(with_auth(&format!("Bearer {}", issued.token)))
            .unwrap();

        let user = AuthUser::from_request(&request).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_raw_token_accepted() {
        let tokens = tokens();
        let issued = tokens.issue_token(Uuid::now_v7(), "bob").unwrap();

        let mut interceptor = BearerAuthInterceptor::new(tokens);
        assert!(interceptor.call(with_auth(&issued.token)).is_ok());
    }

    #[test]
    fn test_missing_metadata_is_unauthenticated() {
        let mut interceptor = BearerAuthInterceptor::new(tokens());
        let status = interceptor.call(Request::new(())).unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }

    #[test]
    fn test_invalid_token_is_unauthenticated() {
        let mut interceptor = BearerAuthInterceptor::new(tokens());
        let status = interceptor.call(with_auth("Bearer garbage")).unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }

    #[test]
    fn test_from_request_without_interceptor() {
        let status = AuthUser::from_request(&Request::new(())).unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }
}
