//! Shared application state.

use domain_auth::{AuthConfig, AuthService, TokenService};
use domain_tasks::{MongoTaskRepository, TaskRepository, TaskService};
use domain_users::{MongoUserRepository, UserRepository, UserService};
use mongodb::{Client, Database};

/// The wired service graph. Generic over repositories so tests can run the
/// full router against in-memory stores.
pub struct Services<U: UserRepository, T: TaskRepository> {
    pub users: UserService<U>,
    pub auth: AuthService<UserService<U>>,
    pub tasks: TaskService<T, U>,
    pub tokens: TokenService,
}

impl<U: UserRepository, T: TaskRepository> Services<U, T> {
    pub fn new(user_repository: U, task_repository: T, auth: &AuthConfig) -> Self {
        let users = UserService::new(user_repository);
        let tokens = TokenService::new(auth);

        Self {
            auth: AuthService::new(tokens.clone(), users.clone()),
            tasks: TaskService::new(task_repository, users.clone()),
            users,
            tokens,
        }
    }
}

impl<U: UserRepository, T: TaskRepository> Clone for Services<U, T> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            auth: self.auth.clone(),
            tasks: self.tasks.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

pub type MongoServices = Services<MongoUserRepository, MongoTaskRepository>;

/// Cloned into handlers; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Shares the underlying connection pool
    pub mongo_client: Client,
    pub db: Database,
    pub services: MongoServices,
}

impl AppState {
    /// Builds the Mongo-backed services and makes sure their indexes exist.
    pub async fn new(
        config: crate::config::Config,
        mongo_client: Client,
    ) -> eyre::Result<Self> {
        let db = mongo_client.database(&config.mongodb.database);

        let users = MongoUserRepository::new(&db);
        users.ensure_indexes().await?;
        let tasks = MongoTaskRepository::new(&db);
        tasks.ensure_indexes().await?;

        let services = Services::new(users, tasks, &config.auth);

        Ok(Self {
            config,
            mongo_client,
            db,
            services,
        })
    }
}
