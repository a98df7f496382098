//! HS256 bearer tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    /// Random per token, so two tokens minted in the same second still differ.
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> AuthResult<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

/// Mints and checks tokens. Cheap to clone; the keys sit behind an `Arc`.
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<Keys>,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp", "nbf", "sub"]);

        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(config.secret.as_bytes()),
                decoding: DecodingKey::from_secret(config.secret.as_bytes()),
                validation,
            }),
            ttl: config.token_ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue_token(&self, user_id: Uuid, username: &str) -> AuthResult<IssuedToken> {
        self.issue_token_with_ttl(user_id, username, self.ttl)
    }

    pub fn issue_token_with_ttl(
        &self,
        user_id: Uuid,
        username: &str,
        ttl: Duration,
    ) -> AuthResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Signing(format!("token lifetime {} is out of range", ttl)))?;

        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Checks signature, algorithm, `exp` and `nbf`, and returns the subject.
    pub fn validate_token(&self, token: &str) -> AuthResult<Uuid> {
        self.decode_claims(token)?.user_id()
    }

    pub fn decode_claims(&self, token: &str) -> AuthResult<Claims> {
        decode::<Claims>(token, &self.keys.decoding, &self.keys.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                AuthError::InvalidToken
            })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").field("ttl", &self.ttl).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn service() -> TokenService {
        TokenService::new(&AuthConfig::new(SECRET))
    }

    fn sign(header: Header, claims: &Claims, secret: &str) -> String {
        encode(&header, claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn claims_for(user_id: Uuid) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: user_id.to_string(),
            username: "alice".into(),
            iat: now,
            nbf: now,
            exp: now + 3600,
            jti: Uuid::new_v4().to_string(),
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let tokens = service();
        let user_id = Uuid::now_v7();

        let issued = tokens.issue_token(user_id, "alice").unwrap();
        assert_eq!(tokens.validate_token(&issued.token).unwrap(), user_id);

        let claims = tokens.decode_claims(&issued.token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(issued.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn test_unrepresentable_expiry_is_signing_error() {
        let ttl = Duration::try_hours(2_000_000_000_000).unwrap();
        let tokens = TokenService::new(&AuthConfig::new(SECRET).with_token_ttl(ttl));

        let err = tokens.issue_token(Uuid::now_v7(), "alice").unwrap_err();
        assert!(matches!(err, AuthError::Signing(_)));
    }

    #[test]
    fn test_two_tokens_differ_and_both_validate() {
        let tokens = service();
        let user_id = Uuid::now_v7();

        let first = tokens.issue_token(user_id, "alice").unwrap();
        let second = tokens.issue_token(user_id, "alice").unwrap();

        assert_ne!(first.token, second.token);
        assert_eq!(tokens.validate_token(&first.token).unwrap(), user_id);
        assert_eq!(tokens.validate_token(&second.token).unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_after_a_second() {
        let tokens = service();
        let issued = tokens
            .issue_token_with_ttl(Uuid::now_v7(), "alice", Duration::zero())
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        assert!(matches!(
            tokens.validate_token(&issued.token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let tokens = service();
        let token = sign(Header::new(Algorithm::HS512), &claims_for(Uuid::now_v7()), SECRET);

        assert!(matches!(tokens.validate_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_other_secret_rejected() {
        let tokens = service();
        let token = sign(
            Header::new(Algorithm::HS256),
            &claims_for(Uuid::now_v7()),
            "another-secret-that-is-also-32-chars",
        );

        assert!(matches!(tokens.validate_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_not_yet_valid_rejected() {
        let tokens = service();
        let mut claims = claims_for(Uuid::now_v7());
        claims.nbf += 600;
        let token = sign(Header::new(Algorithm::HS256), &claims, SECRET);

        assert!(matches!(tokens.validate_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_malformed_subject_rejected() {
        let tokens = service();
        let mut claims = claims_for(Uuid::now_v7());
        claims.sub = "not-a-uuid".into();
        let token = sign(Header::new(Algorithm::HS256), &claims, SECRET);

        assert!(tokens.decode_claims(&token).is_ok());
        assert!(matches!(tokens.validate_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_rejected() {
        let tokens = service();
        assert!(tokens.validate_token("").is_err());
        assert!(tokens.validate_token("a.b.c").is_err());
    }
}
