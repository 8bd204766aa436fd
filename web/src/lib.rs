//! HTTP interface for the task tracker
//!
//! Exposes the task operations over axum:
//!
//! - `GET /tasks`, `GET /tasks/create`, `POST /tasks`
//! - `GET /tasks/{id}`, `GET|POST /tasks/{id}/edit`, `GET|POST /tasks/{id}/delete`
//! - `GET /health`
//!
//! Write routes take url-encoded forms and answer `302 Found` pointing at
//! `/tasks`. Everything else answers JSON.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use task_web::TaskServer;
//!
//! # async fn start() -> anyhow::Result<()> {
//! let repository = Arc::new(database::SqliteTaskRepository::new("sqlite::memory:").await?);
//! repository.migrate().await?;
//!
//! TaskServer::new(repository)
//!     .serve("127.0.0.1:3000", async { let _ = tokio::signal::ctrl_c().await; })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod request_logger;
pub mod serialization;
pub mod server;

// Re-export key types for easier usage
pub use error::ApiError;
pub use handlers::{AppState, TASKS_PATH};
pub use serialization::*;
pub use server::TaskServer;

// Re-export core types for external consumers
pub use task_core::{NewTask, Status, Task, TaskInput, TaskRepository, TaskService};
