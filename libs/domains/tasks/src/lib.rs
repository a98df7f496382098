//! Tasks Domain
//!
//! Task lifecycle: creation, partial updates with status transitions,
//! assignment, and listings ordered by due date.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (REST) / conversions (gRPC)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Ownership rules, transitions, ordering
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory and MongoDB implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs, enums
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_tasks::{handlers, InMemoryTaskRepository, TaskService};
//! use domain_users::{InMemoryUserRepository, UserService};
//!
//! let users = UserService::new(InMemoryUserRepository::new());
//! let service = TaskService::new(InMemoryTaskRepository::new(), users);
//! let router = handlers::router(service);
//! ```

pub mod conversions;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{TaskError, TaskResult};
pub use handlers::ApiDoc;
pub use models::{AssignTask, CreateTask, Task, TaskFilter, TaskStatus, UpdateTask};
pub use self::mongodb::MongoTaskRepository;
pub use repository::{InMemoryTaskRepository, TaskRepository};
pub use service::TaskService;
