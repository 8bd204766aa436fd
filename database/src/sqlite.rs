use crate::common::{
    is_unique_violation, row_to_task, sqlx_error_to_task_error, status_to_string, TASK_COLUMNS,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Row, SqlitePool,
};
use std::time::Duration;
use task_core::{
    error::{Result, TaskError},
    models::{NewTask, Task},
    repository::TaskRepository,
    validation::TaskValidator,
};

/// Pool size used by [`SqliteTaskRepository::new`] for file databases
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// How long a query waits for a free pooled connection
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// SQLite implementation of the TaskRepository trait
///
/// Optimistic concurrency is enforced in SQL: an update only matches the row
/// when both `id` and `version` agree, and bumps `version` as it writes.
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

impl SqliteTaskRepository {
    /// Create a new SQLite repository with the given database URL
    ///
    /// # Arguments
    /// * `database_url` - `sqlite://path`, a bare file path, or `sqlite::memory:`
    ///
    /// # Returns
    /// * `Ok(SqliteTaskRepository)` - Successfully connected repository
    /// * `Err(TaskError::Database)` - If connection fails
    ///
    /// # Examples
    /// ```rust,no_run
    /// use database::SqliteTaskRepository;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// // In-memory database for testing
    /// let repo = SqliteTaskRepository::new("sqlite::memory:").await?;
    ///
    /// // File-based database
    /// let repo = SqliteTaskRepository::new("sqlite:///tmp/tasks.sqlite").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_pool_options(database_url, DEFAULT_MAX_CONNECTIONS, DEFAULT_ACQUIRE_TIMEOUT)
            .await
    }

    /// Create a repository with explicit pool sizing.
    ///
    /// In-memory databases ignore `max_connections`: each SQLite connection
    /// would otherwise see its own empty database.
    pub async fn with_pool_options(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = if is_memory_url(database_url) {
            let connect_options = "sqlite::memory:"
                .parse::<SqliteConnectOptions>()
                .map_err(sqlx_error_to_task_error)?
                .foreign_keys(true);

            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .acquire_timeout(acquire_timeout)
                .connect_with(connect_options)
                .await
                .map_err(sqlx_error_to_task_error)?
        } else {
            let path = database_url
                .strip_prefix("sqlite://")
                .or_else(|| database_url.strip_prefix("sqlite:"))
                .unwrap_or(database_url);

            let connect_options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(5))
                .foreign_keys(true);

            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .acquire_timeout(acquire_timeout)
                .connect_with(connect_options)
                .await
                .map_err(|e| {
                    tracing::error!("Error opening database {}: {}", path, e);
                    sqlx_error_to_task_error(e)
                })?
        };

        tracing::debug!(database_url, "Database pool ready");
        Ok(Self { pool })
    }

    /// Run database migrations
    ///
    /// This method applies all pending migrations to bring the database schema
    /// up to date. It should be called after creating a new repository instance.
    ///
    /// # Returns
    /// * `Ok(())` - Migrations completed successfully
    /// * `Err(TaskError::Database)` - If migration fails
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| TaskError::Database(format!("Migration failed: {e}")))?;

        tracing::info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get access to the underlying database pool for custom operations
    ///
    /// This method is primarily intended for testing scenarios where
    /// direct SQL execution is needed.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn list_all(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM Task ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        rows.iter().map(row_to_task).collect()
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Task>> {
        let result = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM Task WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        match result {
            Some(row) => Ok(Some(row_to_task(&row)?)),
            None => Ok(None),
        }
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        TaskValidator::validate_new_task(&task)?;

        let completed = task.initial_completed(Utc::now());

        // A NULL id lets SQLite assign the next rowid
        let row = sqlx::query(&format!(
            "INSERT INTO Task (id, name, description, due, completed, status, version) \
             VALUES (?, ?, ?, ?, ?, ?, 1) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id)
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.due)
        .bind(completed)
        .bind(status_to_string(task.status))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match task.id {
            Some(id) if is_unique_violation(&e) => TaskError::DuplicateId(id),
            _ => sqlx_error_to_task_error(e),
        })?;

        row_to_task(&row)
    }

    async fn update(&self, task: Task) -> Result<Task> {
        TaskValidator::validate_task_name(&task.name)
            .map_err(|e| TaskError::Validation(e.into()))?;

        let row = sqlx::query(&format!(
            "UPDATE Task \
             SET name = ?, description = ?, due = ?, completed = ?, status = ?, version = version + 1 \
             WHERE id = ? AND version = ? \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.due)
        .bind(task.completed)
        .bind(status_to_string(task.status))
        .bind(task.id)
        .bind(task.version)
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_error_to_task_error)?;

        match row {
            Some(row) => row_to_task(&row),
            None => {
                tracing::debug!(task_id = task.id, version = task.version, "Update matched no row");
                Err(TaskError::concurrency(task.id))
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM Task WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        if result.rows_affected() == 0 {
            return Err(TaskError::not_found_id(id));
        }
        Ok(())
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM Task WHERE id = ?) AS present")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        let present: i64 = row.try_get("present").map_err(sqlx_error_to_task_error)?;
        Ok(present != 0)
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use task_core::models::Status;

    async fn create_test_repository() -> SqliteTaskRepository {
        let repo = SqliteTaskRepository::new("sqlite::memory:").await.unwrap();
        repo.migrate().await.unwrap();
        repo
    }

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[tokio::test]
    async fn test_repository_creation() {
        let repo = create_test_repository().await;
        let result = repo.health_check().await;
        assert!(result.is_ok());
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_task() {
        let repo = create_test_repository().await;

        let task = repo
            .create(NewTask::new("Test Task", "A test task").with_due(due()))
            .await
            .unwrap();

        assert!(task.id > 0);
        assert_eq!(task.name, "Test Task");
        assert_eq!(task.due, due());
        assert_eq!(task.status, Status::NotStarted);
        assert_eq!(task.version, 1);
        assert!(task.completed.is_none());
    }

    #[tokio::test]
    async fn test_create_completed_task_is_stamped() {
        let repo = create_test_repository().await;

        let task = repo
            .create(NewTask::new("Done", "").with_status(Status::Completed))
            .await
            .unwrap();
        assert!(task.completed.is_some());
    }

    #[tokio::test]
    async fn test_explicit_and_duplicate_ids() {
        let repo = create_test_repository().await;

        let task = repo.create(NewTask::new("Pinned", "").with_id(50)).await.unwrap();
        assert_eq!(task.id, 50);

        // Autoincrement continues after the explicit id
        let next = repo.create(NewTask::new("Next", "")).await.unwrap();
        assert!(next.id > 50);

        match repo.create(NewTask::new("Again", "").with_id(50)).await {
            Err(TaskError::DuplicateId(50)) => {}
            other => panic!("Expected DuplicateId(50), got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = create_test_repository().await;
        let created = repo.create(NewTask::new("Find me", "")).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));

        assert!(repo.get_by_id(99999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let repo = create_test_repository().await;
        let created = repo.create(NewTask::new("Original", "")).await.unwrap();

        let updated = repo
            .update(Task {
                name: "Renamed".to_string(),
                status: Status::InProgress,
                ..created.clone()
            })
            .await
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.status, Status::InProgress);
        assert_eq!(updated.version, created.version + 1);
    }

    #[tokio::test]
    async fn test_stale_update_is_rejected() {
        let repo = create_test_repository().await;
        let created = repo.create(NewTask::new("Contested", "")).await.unwrap();

        repo.update(Task {
            description: "first writer".to_string(),
            ..created.clone()
        })
        .await
        .unwrap();

        let err = repo
            .update(Task {
                description: "second writer".to_string(),
                ..created.clone()
            })
            .await
            .unwrap_err();
        assert!(err.is_concurrency());

        let stored = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.description, "first writer");
    }

    #[tokio::test]
    async fn test_update_of_deleted_row_is_a_conflict() {
        let repo = create_test_repository().await;
        let created = repo.create(NewTask::new("Gone", "")).await.unwrap();
        repo.delete(created.id).await.unwrap();

        let err = repo.update(created.clone()).await.unwrap_err();
        assert!(err.is_concurrency());
        assert!(!repo.exists(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = create_test_repository().await;
        let created = repo.create(NewTask::new("Delete me", "")).await.unwrap();

        assert!(repo.exists(created.id).await.unwrap());
        repo.delete(created.id).await.unwrap();
        assert!(!repo.exists(created.id).await.unwrap());

        match repo.delete(created.id).await {
            Err(TaskError::NotFound(_)) => {}
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let repo = create_test_repository().await;

        let err = repo.create(NewTask::new("  ", "")).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_list_all_orders_by_id() {
        let repo = create_test_repository().await;
        for name in ["one", "two", "three"] {
            repo.create(NewTask::new(name, "")).await.unwrap();
        }

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["one", "two", "three"]);
    }

    #[test]
    fn test_memory_url_detection() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://file:db?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite:///var/lib/tasks.sqlite"));
    }
}
