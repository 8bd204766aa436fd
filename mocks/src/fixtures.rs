//! Standard test fixtures for consistent testing
//!
//! Provides pre-built test data including:
//! - Standard tasks in each status
//! - Bulk task generators
//! - Ready-made form submissions

use chrono::Utc;
use task_core::{NewTask, Status, Task, TaskInput};

use crate::builders::{test_due_date, NewTaskBuilder, TaskBuilder, TaskInputBuilder};

/// Create a basic test task with sensible defaults
pub fn create_test_task() -> Task {
    TaskBuilder::new()
        .with_description("A standard test task with default values")
        .build()
}

/// Create task with specific status
pub fn create_test_task_with_status(status: Status) -> Task {
    TaskBuilder::new().with_status(status).build()
}

/// Create multiple unique tasks
pub fn create_test_tasks(count: usize) -> Vec<Task> {
    (1..=count)
        .map(|i| {
            let status = Status::ALL[i % Status::ALL.len()];
            TaskBuilder::new()
                .with_id(i as i64)
                .with_name(format!("Test Task {i}"))
                .with_description(format!("Test task number {i} for bulk testing"))
                .with_status(status)
                .build()
        })
        .collect()
}

/// Create one task in each possible status
pub fn create_tasks_in_all_statuses() -> Vec<Task> {
    let now = Utc::now();
    Status::ALL
        .iter()
        .enumerate()
        .map(|(i, &status)| Task {
            id: i as i64 + 1,
            name: format!("{status} Task"),
            description: format!("Task in {status} status"),
            due: test_due_date(),
            completed: (status == Status::Completed).then_some(now),
            status,
            version: 1,
        })
        .collect()
}

/// Create a standard NewTask
pub fn create_new_task() -> NewTask {
    NewTaskBuilder::new().build()
}

/// Create a NewTask with a unique name
pub fn create_unique_new_task(suffix: &str) -> NewTask {
    NewTaskBuilder::new()
        .with_name(format!("New Test Task {suffix}"))
        .build()
}

/// A create form that passes validation
pub fn create_valid_input() -> TaskInput {
    TaskInputBuilder::new().build()
}

/// A create form missing both required fields
pub fn create_empty_input() -> TaskInput {
    TaskInputBuilder::new().without_name().without_due().build()
}
