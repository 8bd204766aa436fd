//! SQLite persistence for the task tracker
//!
//! Implements [`TaskRepository`] on top of an sqlx connection pool. The
//! schema lives in `migrations/sqlite` and is applied with
//! [`SqliteTaskRepository::migrate`].
//!
//! - File databases run in WAL mode with a busy timeout
//! - `sqlite::memory:` keeps a single pinned connection so the data outlives
//!   individual queries
//!
//! # Usage
//!
//! ```rust
//! use database::SqliteTaskRepository;
//! use task_core::repository::TaskRepository;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = SqliteTaskRepository::new("sqlite::memory:").await?;
//!     repo.migrate().await?;
//!
//!     repo.health_check().await?;
//!     assert!(repo.list_all().await?.is_empty());
//!     Ok(())
//! }
//! ```

mod common;
mod sqlite;

pub use sqlite::{SqliteTaskRepository, DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_CONNECTIONS};

// Re-export commonly used types from task-core for convenience
pub use task_core::{
    error::{Result, TaskError},
    models::{NewTask, Status, Task},
    repository::TaskRepository,
};
