//! Serialization utilities for HTTP responses
//!
//! Handles conversion between internal task types and their JSON format.

use serde_json::{json, Value};
use task_core::{NewTask, Status, Task};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Serialize task for an HTTP response
pub fn serialize_task(task: &Task) -> Value {
    json!({
        "id": task.id,
        "name": task.name,
        "description": task.description,
        "due": task.due.format(DATE_FORMAT).to_string(),
        "completed": task.completed.map(|dt| dt.to_rfc3339()),
        "status": task.status.as_str(),
        "version": task.version,
    })
}

/// Serialize a list of tasks
pub fn serialize_tasks(tasks: &[Task]) -> Value {
    Value::Array(tasks.iter().map(serialize_task).collect())
}

/// Blank create form: template values plus the selectable statuses
pub fn serialize_create_template(template: &NewTask) -> Value {
    json!({
        "task": {
            "name": template.name,
            "description": template.description,
            "due": template.due.format(DATE_FORMAT).to_string(),
            "status": template.status.as_str(),
        },
        "statuses": status_names(),
    })
}

/// Every status name, in display order
pub fn status_names() -> Vec<&'static str> {
    Status::ALL.iter().map(Status::as_str).collect()
}
