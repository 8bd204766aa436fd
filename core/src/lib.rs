//! Task Core Library
//!
//! Domain model, business rules and the storage trait for the task tracker.
//! The database, web and server crates all build on the types defined here.
//!
//! # Architecture
//!
//! - [`models`] - Task, Status and the form/transfer types
//! - [`error`] - Error taxonomy and result alias
//! - [`repository`] - Storage trait with optimistic concurrency
//! - [`validation`] - Form validation
//! - [`service`] - Task operations and the completion timestamp rule
//! - [`seed`] - Default tasks for an empty store
//!
//! # Example
//!
//! ```rust
//! use task_core::{models::TaskInput, validation::TaskValidator};
//!
//! let input = TaskInput {
//!     name: Some("Write docs".to_string()),
//!     due: Some("2024-01-01".to_string()),
//!     ..Default::default()
//! };
//!
//! let new_task = TaskValidator::validate_create(&input).unwrap();
//! assert_eq!(new_task.name, "Write docs");
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod seed;
pub mod service;
pub mod validation;

// Re-export commonly used types at the crate root for convenience
pub use error::{FieldError, Result, TaskError, ValidationErrors};
pub use models::{default_due_date, NewTask, Status, Task, TaskEdit, TaskInput};
pub use repository::TaskRepository;
pub use seed::{default_tasks, seed_if_empty};
pub use service::{completion_timestamp, TaskService};
pub use validation::TaskValidator;

/// Current version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_crate_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(CRATE_NAME, "task-core");
    }

    #[test]
    fn test_re_exports() {
        use crate::{Status, TaskError};

        let status = Status::InProgress;
        assert_eq!(format!("{status}"), "InProgress");

        let error = TaskError::not_found_id(1);
        assert!(error.is_not_found());
    }
}
