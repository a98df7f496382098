//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use database::mongodb::{duplicate_key_index, is_duplicate_key};
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc, to_bson},
    options::IndexOptions,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

pub const COLLECTION: &str = "users";

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<User>(COLLECTION),
        }
    }

    /// Unique indexes on `email` and `username`. These are what actually keep
    /// two concurrent registrations from both succeeding.
    pub async fn ensure_indexes(&self) -> UserResult<()> {
        let unique = || IndexOptions::builder().unique(true).build();

        self.collection
            .create_indexes([
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique())
                    .build(),
                IndexModel::builder()
                    .keys(doc! { "username": 1 })
                    .options(unique())
                    .build(),
            ])
            .await?;

        tracing::info!(collection = COLLECTION, "indexes ensured");
        Ok(())
    }

    fn by_id(id: Uuid) -> Document {
        doc! { "_id": to_bson(&id).unwrap_or(Bson::Null) }
    }

    /// Maps a unique-index violation to the matching domain error.
    fn map_write_error(err: mongodb::error::Error, user: &User) -> UserError {
        if !is_duplicate_key(&err) {
            return err.into();
        }
        match duplicate_key_index(&err) {
            Some(index) if index.starts_with("username") => {
                UserError::DuplicateUsername(user.username.clone())
            }
            _ => UserError::DuplicateEmail(user.email.clone()),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(Self::by_id(id)).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "username": username }).await?)
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: User) -> UserResult<User> {
        self.collection
            .insert_one(&user)
            .await
            .map_err(|e| Self::map_write_error(e, &user))?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: User) -> UserResult<User> {
        let result = self
            .collection
            .replace_one(Self::by_id(user.id), &user)
            .await
            .map_err(|e| Self::map_write_error(e, &user))?;

        if result.matched_count == 0 {
            return Err(UserError::NotFound(user.id.to_string()));
        }

        tracing::info!("User updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = self.collection.delete_one(Self::by_id(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(user_id = %id, "User deleted");
        }
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::mongodb::{MongoConfig, connect};

    #[test]
    fn test_by_id_filter_uses_object_key() {
        let filter = MongoUserRepository::by_id(Uuid::now_v7());
        assert!(filter.contains_key("_id"));
        assert_ne!(filter.get("_id"), Some(&Bson::Null));
    }

    async fn repository() -> MongoUserRepository {
        let url = std::env::var("MONGODB_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());
        let config = MongoConfig::new(url, format!("taskhub_test_{}", Uuid::now_v7().simple()));
        let client = connect(&config).await.unwrap();
        let repo = MongoUserRepository::new(&client.database(&config.database));
        repo.ensure_indexes().await.unwrap();
        repo
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB"]
    async fn test_unique_indexes_map_to_duplicate_errors() {
        let repo = repository().await;
        let alice = User::new("alice".into(), "alice@example.com".into(), "h".into(), None, None);
        repo.create(alice).await.unwrap();

        let same_name = User::new("alice".into(), "other@example.com".into(), "h".into(), None, None);
        assert!(matches!(
            repo.create(same_name).await,
            Err(UserError::DuplicateUsername(_))
        ));

        let same_email = User::new("alice2".into(), "alice@example.com".into(), "h".into(), None, None);
        assert!(matches!(
            repo.create(same_email).await,
            Err(UserError::DuplicateEmail(_))
        ));
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB"]
    async fn test_round_trip_and_delete() {
        let repo = repository().await;
        let alice = User::new("alice".into(), "alice@example.com".into(), "h".into(), None, None);
        let id = alice.id;
        repo.create(alice).await.unwrap();

        let found = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
    }
}
