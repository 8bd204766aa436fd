//! Builder pattern implementations for easy test data construction
//!
//! Provides fluent builders for:
//! - Task construction with sensible defaults
//! - NewTask payloads
//! - Raw form submissions

use chrono::{DateTime, NaiveDate, Utc};
use task_core::{NewTask, Status, Task, TaskInput};

/// Due date used by builders and fixtures unless overridden
pub fn test_due_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 15).unwrap_or_default()
}

/// Builder for constructing Task instances in tests
pub struct TaskBuilder {
    task: Task,
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBuilder {
    /// Create new builder with default values
    pub fn new() -> Self {
        Self {
            task: Task {
                id: 1,
                name: "Test Task".to_string(),
                description: "A test task".to_string(),
                due: test_due_date(),
                completed: None,
                status: Status::NotStarted,
                version: 1,
            },
        }
    }

    /// Set task ID
    pub fn with_id(mut self, id: i64) -> Self {
        self.task.id = id;
        self
    }

    /// Set task name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.task.name = name.into();
        self
    }

    /// Set task description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.task.description = description.into();
        self
    }

    /// Set due date
    pub fn with_due(mut self, due: NaiveDate) -> Self {
        self.task.due = due;
        self
    }

    /// Set task status
    pub fn with_status(mut self, status: Status) -> Self {
        self.task.status = status;
        // Keep the completion timestamp consistent with the status
        if status == Status::Completed && self.task.completed.is_none() {
            self.task.completed = Some(Utc::now());
        } else if status != Status::Completed {
            self.task.completed = None;
        }
        self
    }

    /// Set completion timestamp
    pub fn with_completed(mut self, completed: Option<DateTime<Utc>>) -> Self {
        self.task.completed = completed;
        self
    }

    /// Set row version
    pub fn with_version(mut self, version: i64) -> Self {
        self.task.version = version;
        self
    }

    /// Build the final Task
    pub fn build(self) -> Task {
        self.task
    }
}

/// Builder for constructing NewTask instances in tests
pub struct NewTaskBuilder {
    new_task: NewTask,
}

impl Default for NewTaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewTaskBuilder {
    /// Create new builder with default values
    pub fn new() -> Self {
        Self {
            new_task: NewTask::new("New Test Task", "A new test task").with_due(test_due_date()),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.new_task.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.new_task.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.new_task.description = description.into();
        self
    }

    pub fn with_due(mut self, due: NaiveDate) -> Self {
        self.new_task.due = due;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.new_task.status = status;
        self
    }

    /// Build the final NewTask
    pub fn build(self) -> NewTask {
        self.new_task
    }
}

/// Builder for raw form submissions
pub struct TaskInputBuilder {
    input: TaskInput,
}

impl Default for TaskInputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskInputBuilder {
    /// A valid create submission
    pub fn new() -> Self {
        Self {
            input: TaskInput {
                id: None,
                name: Some("Form Task".to_string()),
                description: Some("Submitted through a form".to_string()),
                due: Some(test_due_date().format("%Y-%m-%d").to_string()),
                status: None,
                version: None,
            },
        }
    }

    /// An edit submission carrying the current state of `task`
    pub fn from_task(task: &Task) -> Self {
        Self {
            input: TaskInput {
                id: Some(task.id),
                name: Some(task.name.clone()),
                description: Some(task.description.clone()),
                due: Some(task.due.format("%Y-%m-%d").to_string()),
                status: Some(task.status.to_string()),
                version: Some(task.version),
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.input.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.input.name = Some(name.into());
        self
    }

    pub fn without_name(mut self) -> Self {
        self.input.name = None;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.input.description = Some(description.into());
        self
    }

    /// Set the raw due string, valid or not
    pub fn with_due(mut self, due: impl Into<String>) -> Self {
        self.input.due = Some(due.into());
        self
    }

    pub fn without_due(mut self) -> Self {
        self.input.due = None;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.input.status = Some(status.into());
        self
    }

    pub fn with_version(mut self, version: i64) -> Self {
        self.input.version = Some(version);
        self
    }

    pub fn without_version(mut self) -> Self {
        self.input.version = None;
        self
    }

    /// Build the final TaskInput
    pub fn build(self) -> TaskInput {
        self.input
    }
}
