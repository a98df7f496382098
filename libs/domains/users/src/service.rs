use async_trait::async_trait;
use chrono::Utc;
use domain_auth::{AuthError, AuthResult, Identity, IdentityLookup, hash_password, verify_password};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

use crate::error::{UserError, UserResult};
use crate::models::{RegisterUser, UpdateUser, User};
use crate::repository::UserRepository;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterUser) -> UserResult<User> {
        let input = RegisterUser {
            username: input.username.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            ..input
        };
        input.validate()?;

        // Fast path; the repository's unique constraint is the real guard.
        if self.repository.find_by_username(&input.username).await?.is_some() {
            return Err(UserError::DuplicateUsername(input.username));
        }
        if self.repository.find_by_email(&input.email).await?.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let password_hash = hash_password(&input.password)?;
        let user = User::new(
            input.username,
            input.email,
            password_hash,
            non_empty(input.first_name),
            non_empty(input.last_name),
        );

        self.repository.create(user).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    pub async fn get_by_email(&self, email: &str) -> UserResult<User> {
        let email = email.trim().to_lowercase();
        self.repository
            .find_by_email(&email)
            .await?
            .ok_or(UserError::NotFound(email))
    }

    pub async fn get_by_username(&self, username: &str) -> UserResult<User> {
        self.repository
            .find_by_username(username.trim())
            .await?
            .ok_or_else(|| UserError::NotFound(username.to_string()))
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        let input = UpdateUser {
            email: input.email.map(|e| e.trim().to_lowercase()),
            ..input
        };
        input.validate()?;

        let mut user = self.get_by_id(id).await?;

        if let Some(email) = input.email {
            if email != user.email {
                if let Some(other) = self.repository.find_by_email(&email).await? {
                    if other.id != id {
                        return Err(UserError::DuplicateEmail(email));
                    }
                }
                user.email = email;
            }
        }
        if let Some(first_name) = input.first_name {
            user.first_name = non_empty(Some(first_name));
        }
        if let Some(last_name) = input.last_name {
            user.last_name = non_empty(Some(last_name));
        }
        if let Some(password) = input.password {
            user.password_hash = hash_password(&password)?;
        }
        user.updated_at = Utc::now();

        self.repository.update(user).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// `login` is looked up as an email when it looks like one, otherwise as a username.
    /// Unknown user and wrong password fail the same way.
    #[instrument(skip(self, password))]
    pub async fn validate_credentials(&self, login: &str, password: &str) -> UserResult<User> {
        let login = login.trim();
        let found = if login.validate_email() {
            self.repository.find_by_email(&login.to_lowercase()).await?
        } else {
            self.repository.find_by_username(login).await?
        };

        match found {
            Some(user) if verify_password(&user.password_hash, password) => Ok(user),
            _ => {
                tracing::debug!("credential check failed");
                Err(UserError::InvalidCredentials)
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn lookup_error(err: UserError) -> AuthError {
    match err {
        UserError::InvalidCredentials => AuthError::InvalidCredentials,
        UserError::Auth(inner) => inner,
        other => AuthError::Lookup(other.to_string()),
    }
}

#[async_trait]
impl<R: UserRepository> IdentityLookup for UserService<R> {
    async fn find_identity(&self, id: Uuid) -> AuthResult<Option<Identity>> {
        let user = self.repository.find_by_id(id).await.map_err(lookup_error)?;
        Ok(user.map(|u| Identity {
            id: u.id,
            username: u.username,
        }))
    }

    async fn verify_credentials(&self, login: &str, password: &str) -> AuthResult<Identity> {
        let user = self
            .validate_credentials(login, password)
            .await
            .map_err(lookup_error)?;
        Ok(Identity {
            id: user.id,
            username: user.username,
        })
    }
}
