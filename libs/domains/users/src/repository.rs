use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence.
///
/// Implementations enforce username and email uniqueness and report violations
/// as `DuplicateUsername` / `DuplicateEmail`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// `email` is expected lower-cased.
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>>;

    async fn create(&self, user: User) -> UserResult<User>;

    /// Replaces the stored user. `NotFound` if it does not exist.
    async fn update(&self, user: User) -> UserResult<User>;

    /// `false` if there was nothing to delete.
    async fn delete(&self, id: Uuid) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(users: &HashMap<Uuid, User>, user: &User) -> UserResult<()> {
        let others = users.values().filter(|u| u.id != user.id);
        for other in others {
            if other.username == user.username {
                return Err(UserError::DuplicateUsername(user.username.clone()));
            }
            if other.email == user.email {
                return Err(UserError::DuplicateEmail(user.email.clone()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;
        Self::check_unique(&users, &user)?;

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        Self::check_unique(&users, &user)?;

        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, email: &str) -> User {
        User::new(username.into(), email.into(), "hash".into(), None, None)
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("alice", "alice@example.com")).await.unwrap();

        assert_eq!(repo.find_by_id(created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(
            repo.find_by_email("alice@example.com").await.unwrap(),
            Some(created.clone())
        );
        assert_eq!(repo.find_by_username("alice").await.unwrap(), Some(created));
        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicates_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("alice", "alice@example.com")).await.unwrap();

        assert!(matches!(
            repo.create(user("alice", "other@example.com")).await,
            Err(UserError::DuplicateUsername(_))
        ));
        assert!(matches!(
            repo.create(user("alice2", "alice@example.com")).await,
            Err(UserError::DuplicateEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_update_checks_uniqueness_against_others_only() {
        let repo = InMemoryUserRepository::new();
        let mut alice = repo.create(user("alice", "alice@example.com")).await.unwrap();
        repo.create(user("bob", "bob@example.com")).await.unwrap();

        alice.first_name = Some("Alice".into());
        assert!(repo.update(alice.clone()).await.is_ok());

        alice.email = "bob@example.com".into();
        assert!(matches!(
            repo.update(alice).await,
            Err(UserError::DuplicateEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let repo = InMemoryUserRepository::new();
        assert!(matches!(
            repo.update(user("ghost", "ghost@example.com")).await,
            Err(UserError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("alice", "alice@example.com")).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    }
}
