use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::token::{IssuedToken, TokenService};

/// What the auth layer needs to know about a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
}

/// Read access to the user directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityLookup: Send + Sync + 'static {
    async fn find_identity(&self, id: Uuid) -> AuthResult<Option<Identity>>;

    /// Fails with [`AuthError::InvalidCredentials`] for an unknown login and a wrong password alike.
    async fn verify_credentials(&self, login: &str, password: &str) -> AuthResult<Identity>;
}

/// Login and refresh on top of [`TokenService`].
pub struct AuthService<L: IdentityLookup> {
    tokens: TokenService,
    identities: Arc<L>,
}

impl<L: IdentityLookup> Clone for AuthService<L> {
    fn clone(&self) -> Self {
        Self {
            tokens: self.tokens.clone(),
            identities: Arc::clone(&self.identities),
        }
    }
}

impl<L: IdentityLookup> AuthService<L> {
    pub fn new(tokens: TokenService, identities: L) -> Self {
        Self::from_arc(tokens, Arc::new(identities))
    }

    pub fn from_arc(tokens: TokenService, identities: Arc<L>) -> Self {
        Self { tokens, identities }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, login: &str, password: &str) -> AuthResult<(Identity, IssuedToken)> {
        let identity = self.identities.verify_credentials(login, password).await?;
        let issued = self.tokens.issue_token(identity.id, &identity.username)?;

        tracing::info!(user_id = %identity.id, "user logged in");
        Ok((identity, issued))
    }

    /// Issues a fresh token for the subject of `token`, which must still be valid
    /// and still resolve to a user.
    #[instrument(skip_all)]
    pub async fn refresh_token(&self, token: &str) -> AuthResult<(Identity, IssuedToken)> {
        let user_id = self.tokens.validate_token(token)?;

        let identity = self
            .identities
            .find_identity(user_id)
            .await?
            .ok_or(AuthError::UserNotFound(user_id))?;

        let issued = self.tokens.issue_token(identity.id, &identity.username)?;
        Ok((identity, issued))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Task,
    User,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Task => "task",
            ResourceKind::User => "user",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(ResourceKind::Task),
            "user" => Ok(ResourceKind::User),
            other => Err(AuthError::UnknownResourceKind(other.to_string())),
        }
    }
}

/// Owner-equals-caller check. Task operations enforce their own richer rules;
/// this guards profile self-service.
pub fn authorize_resource_access(user_id: Uuid, owner_id: Uuid, resource_kind: &str) -> AuthResult<()> {
    let kind: ResourceKind = resource_kind.parse()?;

    if user_id != owner_id {
        tracing::debug!(%user_id, %owner_id, resource = %kind, "access denied");
        return Err(AuthError::Unauthorized(kind.to_string()));
    }

    Ok(())
}
