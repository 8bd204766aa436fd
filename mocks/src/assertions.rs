//! Custom assertion helpers for testing
//!
//! Provides specialized assertions for:
//! - Task equality with clear error messages
//! - The completion timestamp rule
//! - Error classification

use chrono::{DateTime, Utc};
use task_core::{Status, Task, TaskError};

/// Assert tasks are equal ignoring completion timestamp and version
pub fn assert_task_equals(actual: &Task, expected: &Task) {
    assert_eq!(actual.id, expected.id, "Task IDs don't match");
    assert_eq!(actual.name, expected.name, "Task names don't match");
    assert_eq!(actual.description, expected.description, "Task descriptions don't match");
    assert_eq!(actual.due, expected.due, "Task due dates don't match");
    assert_eq!(actual.status, expected.status, "Task statuses don't match");
}

/// Assert tasks are equal including exact timestamps
pub fn assert_task_equals_exact(actual: &Task, expected: &Task) {
    assert_eq!(actual, expected, "Tasks are not exactly equal");
}

/// Assert `completed` is set exactly when the task is Completed
pub fn assert_completion_consistent(task: &Task) {
    assert_eq!(
        task.completed.is_some(),
        task.status == Status::Completed,
        "Task {} has status {} but completed = {:?}",
        task.id,
        task.status,
        task.completed
    );
}

/// Assert the task was stamped no earlier than `not_before`
pub fn assert_completed_since(task: &Task, not_before: DateTime<Utc>) {
    match task.completed {
        Some(completed) => assert!(
            completed >= not_before,
            "Task {} completed at {completed}, expected at or after {not_before}",
            task.id
        ),
        None => panic!("Task {} has no completion timestamp", task.id),
    }
}

/// Assert tasks are listed in ascending id order
pub fn assert_sorted_by_id(tasks: &[Task]) {
    assert!(
        tasks.windows(2).all(|pair| pair[0].id < pair[1].id),
        "Tasks are not sorted by id: {:?}",
        tasks.iter().map(|t| t.id).collect::<Vec<_>>()
    );
}

/// Assert the result is a validation failure naming `field`
pub fn assert_validation_error_on<T: std::fmt::Debug>(
    result: &Result<T, TaskError>,
    field: &str,
) {
    match result {
        Err(TaskError::Validation(errors)) => assert!(
            errors.has_field(field),
            "Expected a validation error on '{field}', got: {errors}"
        ),
        other => panic!("Expected validation error on '{field}', got {other:?}"),
    }
}

/// Assert the result is a not found failure
pub fn assert_not_found<T: std::fmt::Debug>(result: &Result<T, TaskError>) {
    assert!(
        matches!(result, Err(TaskError::NotFound(_))),
        "Expected NotFound, got {result:?}"
    );
}

/// Assert the result is a write conflict
pub fn assert_concurrency_conflict<T: std::fmt::Debug>(result: &Result<T, TaskError>) {
    assert!(
        matches!(result, Err(TaskError::Concurrency(_))),
        "Expected Concurrency, got {result:?}"
    );
}
