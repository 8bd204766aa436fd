use async_trait::async_trait;

use crate::{
    error::Result,
    models::{NewTask, Task},
};

/// Repository trait for task persistence and retrieval operations
///
/// This trait defines the interface for all task data operations.
/// Implementations must be thread-safe and support concurrent access.
/// Cross-request consistency relies on the `version` column: `update`
/// only writes when the stored version still matches.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// List every task in insertion (id) order
    ///
    /// # Returns
    /// * `Ok(Vec<Task>)` - All tasks (may be empty)
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn list_all(&self) -> Result<Vec<Task>>;

    /// Get a task by its numeric ID
    ///
    /// # Returns
    /// * `Ok(Some(Task))` - The task if found
    /// * `Ok(None)` - If no task exists with that ID
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn get_by_id(&self, id: i64) -> Result<Option<Task>>;

    /// Create a new task
    ///
    /// # Arguments
    /// * `task` - The new task data; `task.id` is honoured when present
    ///
    /// # Returns
    /// * `Ok(Task)` - The created task with assigned ID and version 1
    /// * `Err(TaskError::Validation)` - If required fields are missing
    /// * `Err(TaskError::DuplicateId)` - If an explicit ID is already used
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn create(&self, task: NewTask) -> Result<Task>;

    /// Replace the stored row matching `task.id`
    ///
    /// The write only happens when the stored version equals `task.version`;
    /// on success the returned task carries the incremented version.
    ///
    /// # Returns
    /// * `Ok(Task)` - The stored task after the write
    /// * `Err(TaskError::Concurrency)` - If no row matched id and version,
    ///   either because another write won or because the row is gone.
    ///   Callers use [`TaskRepository::exists`] to tell the two apart.
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn update(&self, task: Task) -> Result<Task>;

    /// Delete a task
    ///
    /// # Returns
    /// * `Ok(())` - The row was removed
    /// * `Err(TaskError::NotFound)` - If the task doesn't exist
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn delete(&self, id: i64) -> Result<()>;

    /// Check whether a task with this ID exists
    async fn exists(&self, id: i64) -> Result<bool>;

    /// Get repository health status for monitoring
    ///
    /// # Returns
    /// * `Ok(())` - Repository is healthy and connected
    /// * `Err(TaskError::Database)` - Repository is unhealthy
    async fn health_check(&self) -> Result<()>;
}
