//! The `authorization` metadata key in both directions.

use tonic::metadata::{AsciiMetadataValue, MetadataMap};
use tonic::{Request, Status};

pub const AUTHORIZATION: &str = "authorization";

/// Client interceptor that stamps every call with an `authorization` value.
#[derive(Clone, Debug)]
pub struct AuthInterceptor {
    header_value: Option<String>,
}

impl AuthInterceptor {
    /// No header until a token is supplied.
    pub fn anonymous() -> Self {
        Self { header_value: None }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            header_value: Some(format!("Bearer {}", token.into())),
        }
    }

    pub fn custom(value: impl Into<String>) -> Self {
        Self {
            header_value: Some(value.into()),
        }
    }
}

impl tonic::service::Interceptor for AuthInterceptor {
    fn call(&mut self, mut request: Request<()>) -> Result<Request<()>, Status> {
        if let Some(value) = &self.header_value {
            let value: AsciiMetadataValue = value
                .parse()
                .map_err(|_| Status::internal("Invalid auth header"))?;
            request.metadata_mut().insert(AUTHORIZATION, value);
        }
        Ok(request)
    }
}

/// Token carried in `authorization`, with or without a `Bearer ` prefix.
pub fn bearer_token(metadata: &MetadataMap) -> Option<&str> {
    let raw = metadata.get(AUTHORIZATION)?.to_str().ok()?.trim_start();
    let token = raw
        .strip_prefix("Bearer ")
        .or_else(|| raw.strip_prefix("bearer "))
        .unwrap_or(raw)
        .trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::service::Interceptor;

    #[test]
    fn test_bearer_token_header() {
        let mut auth = AuthInterceptor::bearer("test-token");
        let req = auth.call(Request::new(())).unwrap();
        assert_eq!(req.metadata().get(AUTHORIZATION).unwrap(), "Bearer test-token");
    }

    #[test]
    fn test_anonymous_sends_nothing() {
        let mut auth = AuthInterceptor::anonymous();
        let req = auth.call(Request::new(())).unwrap();
        assert!(req.metadata().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_invalid_header_value() {
        let mut auth = AuthInterceptor::custom("line\nbreak");
        assert_eq!(
            auth.call(Request::new(())).unwrap_err().code(),
            tonic::Code::Internal
        );
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut req = Request::new(());
        assert_eq!(bearer_token(req.metadata()), None);

        req
            .metadata_mut()
            .insert(AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(req.metadata()), Some("abc.def"));

        req
            .metadata_mut()
            .insert(AUTHORIZATION, "raw-token".parse().unwrap());
        assert_eq!(bearer_token(req.metadata()), Some("raw-token"));

        req
            .metadata_mut()
            .insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(req.metadata()), None);
    }
}
