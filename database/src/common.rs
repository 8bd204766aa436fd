use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use task_core::{
    error::{Result, TaskError},
    models::{Status, Task},
};

/// Column list shared by every query returning whole tasks
pub const TASK_COLUMNS: &str = "id, name, description, due, completed, status, version";

/// Convert Status enum to string for database storage
pub fn status_to_string(status: Status) -> &'static str {
    status.as_str()
}

/// Convert string from database to Status enum
pub fn string_to_status(s: &str) -> Result<Status> {
    s.parse::<Status>()
        .map_err(|_| TaskError::Database(format!("Invalid task status in database: {s}")))
}

/// Convert SQLite row to Task model
pub fn row_to_task(row: &SqliteRow) -> Result<Task> {
    let status_str: String = row.try_get("status").map_err(sqlx_error_to_task_error)?;
    let status = string_to_status(&status_str)?;

    let due: NaiveDate = row.try_get("due").map_err(sqlx_error_to_task_error)?;
    let completed: Option<DateTime<Utc>> =
        row.try_get("completed").map_err(sqlx_error_to_task_error)?;

    Ok(Task {
        id: row.try_get("id").map_err(sqlx_error_to_task_error)?,
        name: row.try_get("name").map_err(sqlx_error_to_task_error)?,
        description: row.try_get("description").map_err(sqlx_error_to_task_error)?,
        due,
        completed,
        status,
        version: row.try_get("version").map_err(sqlx_error_to_task_error)?,
    })
}

/// Whether the error is a primary key or UNIQUE constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            // 1555: SQLITE_CONSTRAINT_PRIMARYKEY, 2067: SQLITE_CONSTRAINT_UNIQUE
            let code = db_err.code().unwrap_or_default();
            code == "1555" || code == "2067" || db_err.message().contains("UNIQUE constraint failed")
        }
        _ => false,
    }
}

/// Convert SQLx error to TaskError
pub fn sqlx_error_to_task_error(err: sqlx::Error) -> TaskError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message();
            if message.contains("CHECK constraint failed") {
                TaskError::Database(format!("Rejected by schema constraint: {message}"))
            } else {
                TaskError::Database(format!("Database constraint error: {message}"))
            }
        }
        sqlx::Error::RowNotFound => {
            // Absent rows are handled with fetch_optional, so this is unexpected
            TaskError::Database("Unexpected RowNotFound error".to_string())
        }
        sqlx::Error::PoolTimedOut => TaskError::Database("Connection pool timeout".to_string()),
        sqlx::Error::Io(io_err) => TaskError::Database(format!("Database I/O error: {io_err}")),
        _ => TaskError::Database(format!("Database operation failed: {err}")),
    }
}
