//! Task service
//!
//! Orchestrates the five task operations on top of a [`TaskRepository`]
//! and owns the one business rule of the system: the completion timestamp
//! follows the status.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    error::{Result, TaskError},
    models::{NewTask, Status, Task, TaskEdit, TaskInput},
    repository::TaskRepository,
    validation::TaskValidator,
};

/// Completion timestamp a task should carry after being saved with `status`.
///
/// - Completed, previously unset: stamped with `now`
/// - Completed, previously set: unchanged
/// - any other status: cleared
pub fn completion_timestamp(
    previous: Option<DateTime<Utc>>,
    status: Status,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (status, previous) {
        (Status::Completed, Some(completed)) => Some(completed),
        (Status::Completed, None) => Some(now),
        _ => None,
    }
}

/// Task operations exposed to the web layer
pub struct TaskService<R> {
    repository: Arc<R>,
}

impl<R> Clone for TaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> TaskService<R> {
    /// Create a service over the given repository
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Get a clone of the repository Arc
    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    /// Blank create form values: due tomorrow, not started
    pub fn create_template(&self) -> NewTask {
        NewTask::default()
    }
}

impl<R: TaskRepository> TaskService<R> {
    /// All tasks
    pub async fn list(&self) -> Result<Vec<Task>> {
        self.repository.list_all().await
    }

    /// One task; an absent id is not found without touching the store
    pub async fn get(&self, id: Option<i64>) -> Result<Task> {
        let id = id.ok_or_else(TaskError::missing_id)?;
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| TaskError::not_found_id(id))
    }

    /// Validate a create form and persist it
    pub async fn create(&self, input: &TaskInput) -> Result<Task> {
        let new_task = TaskValidator::validate_create(input)?;
        let task = self.repository.create(new_task).await?;
        info!(task_id = task.id, status = %task.status, "Task created");
        Ok(task)
    }

    /// Validate an edit form submitted for `id` and apply it
    pub async fn edit(&self, id: i64, input: &TaskInput) -> Result<Task> {
        let edit = TaskValidator::validate_edit(input)?;
        self.apply_edit(id, edit).await
    }

    /// Apply a validated edit to the task stored under `existing_id`.
    ///
    /// # Returns
    /// * `Err(TaskError::Validation)` - `edit.id` differs from `existing_id`
    /// * `Err(TaskError::NotFound)` - the task is absent, or vanished while
    ///   the write was in flight
    /// * `Err(TaskError::Concurrency)` - the task still exists but another
    ///   write got there first
    pub async fn apply_edit(&self, existing_id: i64, edit: TaskEdit) -> Result<Task> {
        if edit.id != existing_id {
            return Err(TaskError::invalid_field(
                "id",
                format!("Task id {} does not match route id {existing_id}", edit.id),
            ));
        }

        let stored = self
            .repository
            .get_by_id(existing_id)
            .await?
            .ok_or_else(|| TaskError::not_found_id(existing_id))?;

        let completed = completion_timestamp(stored.completed, edit.status, Utc::now());
        let updated = Task {
            id: existing_id,
            name: edit.name,
            description: edit.description,
            due: edit.due,
            completed,
            status: edit.status,
            version: edit.version.unwrap_or(stored.version),
        };

        match self.repository.update(updated).await {
            Ok(task) => {
                info!(task_id = task.id, status = %task.status, version = task.version, "Task updated");
                Ok(task)
            }
            Err(TaskError::Concurrency(message)) => {
                if self.repository.exists(existing_id).await? {
                    warn!(task_id = existing_id, "Edit lost a write conflict");
                    Err(TaskError::Concurrency(message))
                } else {
                    debug!(task_id = existing_id, "Task deleted during edit");
                    Err(TaskError::not_found_id(existing_id))
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Delete a task, returning the row as it was before removal
    pub async fn delete(&self, id: Option<i64>) -> Result<Task> {
        let task = self.get(id).await?;
        self.repository.delete(task.id).await?;
        info!(task_id = task.id, "Task deleted");
        Ok(task)
    }

    /// Probe the underlying store
    pub async fn health_check(&self) -> Result<()> {
        self.repository.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};
    use mockall::predicate::eq;
    use proptest::prelude::*;

    mockall::mock! {
        Repo {}

        #[async_trait]
        impl TaskRepository for Repo {
            async fn list_all(&self) -> Result<Vec<Task>>;
            async fn get_by_id(&self, id: i64) -> Result<Option<Task>>;
            async fn create(&self, task: NewTask) -> Result<Task>;
            async fn update(&self, task: Task) -> Result<Task>;
            async fn delete(&self, id: i64) -> Result<()>;
            async fn exists(&self, id: i64) -> Result<bool>;
            async fn health_check(&self) -> Result<()>;
        }
    }

    fn stored(status: Status, completed: Option<DateTime<Utc>>) -> Task {
        Task {
            id: 1,
            name: "A".to_string(),
            description: String::new(),
            due: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            completed,
            status,
            version: 3,
        }
    }

    fn edit_to(status: Status) -> TaskEdit {
        TaskEdit {
            id: 1,
            name: "A".to_string(),
            description: "edited".to_string(),
            due: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status,
            version: None,
        }
    }

    fn repo_returning(existing: Task) -> MockRepo {
        let mut repo = MockRepo::new();
        repo.expect_get_by_id()
            .with(eq(1))
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_update().returning(|task| {
            Ok(Task {
                version: task.version + 1,
                ..task
            })
        });
        repo
    }

    #[test]
    fn test_completion_timestamp_rule() {
        let now = Utc::now();
        let earlier = now - Duration::days(2);

        assert_eq!(completion_timestamp(None, Status::Completed, now), Some(now));
        assert_eq!(completion_timestamp(Some(earlier), Status::Completed, now), Some(earlier));
        assert_eq!(completion_timestamp(Some(earlier), Status::InProgress, now), None);
        assert_eq!(completion_timestamp(None, Status::Cancelled, now), None);
    }

    proptest! {
        #[test]
        fn prop_completion_tracks_status(
            previous in proptest::option::of(0i64..2_000_000_000),
            status in prop::sample::select(Status::ALL.to_vec()),
            now in 0i64..2_000_000_000,
        ) {
            let previous = previous.and_then(|s| DateTime::<Utc>::from_timestamp(s, 0));
            let now = DateTime::<Utc>::from_timestamp(now, 0).unwrap();
            let result = completion_timestamp(previous, status, now);

            // Set exactly when Completed
            prop_assert_eq!(result.is_some(), status == Status::Completed);
            // Never overwritten while already completed
            if status == Status::Completed && previous.is_some() {
                prop_assert_eq!(result, previous);
            }
        }
    }

    #[tokio::test]
    async fn test_edit_to_completed_stamps_timestamp() {
        let service = TaskService::new(Arc::new(repo_returning(stored(Status::InProgress, None))));
        let before = Utc::now();

        let task = service.apply_edit(1, edit_to(Status::Completed)).await.unwrap();

        assert_eq!(task.status, Status::Completed);
        assert!(task.completed.unwrap() >= before);
        assert_eq!(task.description, "edited");
        // Stored version used as the expected one, then bumped by the store
        assert_eq!(task.version, 4);
    }

    #[tokio::test]
    async fn test_resaving_completed_task_keeps_timestamp() {
        let original = Utc::now() - Duration::hours(5);
        let service = TaskService::new(Arc::new(repo_returning(stored(
            Status::Completed,
            Some(original),
        ))));

        let task = service.apply_edit(1, edit_to(Status::Completed)).await.unwrap();
        assert_eq!(task.completed, Some(original));
    }

    #[tokio::test]
    async fn test_leaving_completed_clears_timestamp() {
        let service = TaskService::new(Arc::new(repo_returning(stored(
            Status::Completed,
            Some(Utc::now()),
        ))));

        let task = service.apply_edit(1, edit_to(Status::InReview)).await.unwrap();
        assert!(task.completed.is_none());
    }

    #[tokio::test]
    async fn test_id_mismatch_is_validation_error() {
        // No expectations: any repository call would panic
        let service = TaskService::new(Arc::new(MockRepo::new()));

        let err = service.apply_edit(2, edit_to(Status::NotStarted)).await.unwrap_err();
        assert!(err.field_errors().unwrap().has_field("id"));
    }

    #[tokio::test]
    async fn test_edit_of_missing_task_is_not_found() {
        let mut repo = MockRepo::new();
        repo.expect_get_by_id().returning(|_| Ok(None));
        let service = TaskService::new(Arc::new(repo));

        let err = service.apply_edit(1, edit_to(Status::NotStarted)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_conflict_on_deleted_row_maps_to_not_found() {
        let mut repo = MockRepo::new();
        repo.expect_get_by_id()
            .returning(|_| Ok(Some(stored(Status::NotStarted, None))));
        repo.expect_update()
            .times(1)
            .returning(|task| Err(TaskError::concurrency(task.id)));
        repo.expect_exists().with(eq(1)).times(1).returning(|_| Ok(false));
        let service = TaskService::new(Arc::new(repo));

        let err = service.apply_edit(1, edit_to(Status::Completed)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_conflict_on_live_row_is_propagated() {
        let mut repo = MockRepo::new();
        repo.expect_get_by_id()
            .returning(|_| Ok(Some(stored(Status::NotStarted, None))));
        repo.expect_update()
            .times(1)
            .returning(|task| Err(TaskError::concurrency(task.id)));
        repo.expect_exists().with(eq(1)).returning(|_| Ok(true));
        let service = TaskService::new(Arc::new(repo));

        let err = service.apply_edit(1, edit_to(Status::Completed)).await.unwrap_err();
        assert!(err.is_concurrency());
    }

    #[tokio::test]
    async fn test_client_version_is_forwarded_to_store() {
        let mut repo = MockRepo::new();
        repo.expect_get_by_id()
            .returning(|_| Ok(Some(stored(Status::NotStarted, None))));
        repo.expect_update()
            .withf(|task| task.version == 1)
            .returning(|task| Err(TaskError::concurrency(task.id)));
        repo.expect_exists().returning(|_| Ok(true));
        let service = TaskService::new(Arc::new(repo));

        let mut edit = edit_to(Status::InProgress);
        edit.version = Some(1);
        let err = service.apply_edit(1, edit).await.unwrap_err();
        assert!(err.is_concurrency());
    }

    #[tokio::test]
    async fn test_get_without_id_skips_store() {
        let service = TaskService::new(Arc::new(MockRepo::new()));
        assert!(service.get(None).await.unwrap_err().is_not_found());
        assert!(service.delete(None).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_looks_up_before_removing() {
        let mut repo = MockRepo::new();
        repo.expect_get_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(stored(Status::NotStarted, None))));
        repo.expect_delete().with(eq(1)).times(1).returning(|_| Ok(()));
        repo.expect_get_by_id().with(eq(9)).returning(|_| Ok(None));
        let service = TaskService::new(Arc::new(repo));

        assert_eq!(service.delete(Some(1)).await.unwrap().id, 1);
        assert!(service.delete(Some(9)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_before_store() {
        let service = TaskService::new(Arc::new(MockRepo::new()));
        let err = service.create(&TaskInput::default()).await.unwrap_err();
        assert!(err.is_validation());
    }
}
