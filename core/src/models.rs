use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{FieldError, TaskError};

/// Core task representation in the task tracking system.
///
/// A task is a named piece of work with a due date and a progress status.
/// The `completed` timestamp is owned by the edit workflow: it is stamped the
/// moment the task becomes [`Status::Completed`] and cleared when it leaves
/// that status.
///
/// # Examples
///
/// ```rust
/// use task_core::models::{Status, Task};
/// use chrono::NaiveDate;
///
/// let task = Task {
///     id: 1,
///     name: "Write release notes".to_string(),
///     description: String::new(),
///     due: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     completed: None,
///     status: Status::NotStarted,
///     version: 1,
/// };
///
/// assert!(!task.is_completed());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Auto-increment primary key
    pub id: i64,
    /// Display name for the task
    pub name: String,
    /// Any additional notes or details
    pub description: String,
    /// When the task is due
    pub due: NaiveDate,
    /// When the task was last moved into the Completed status
    pub completed: Option<DateTime<Utc>>,
    /// Progress state of the task
    pub status: Status,
    /// Row version used for optimistic concurrency checks
    pub version: i64,
}

/// Progress states a task can be in.
///
/// Any status may be set from any other status; the only behaviour tied to
/// a transition is the completion timestamp (see
/// [`crate::service::completion_timestamp`]).
#[derive(Debug, Clone, Copy, Hash, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Status {
    /// The task has not been started yet
    #[default]
    NotStarted,
    /// The task is being worked on
    InProgress,
    /// The task is currently under review
    InReview,
    /// The task has been cancelled
    Cancelled,
    /// The task has been completed
    Completed,
}

impl Status {
    /// Every status, in display order
    pub const ALL: [Status; 5] = [
        Status::NotStarted,
        Status::InProgress,
        Status::InReview,
        Status::Cancelled,
        Status::Completed,
    ];

    /// Stable name used for storage and wire formats
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotStarted => "NotStarted",
            Status::InProgress => "InProgress",
            Status::InReview => "InReview",
            Status::Cancelled => "Cancelled",
            Status::Completed => "Completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                TaskError::invalid_field("status", format!("Unknown status '{s}'"))
            })
    }
}

/// Data transfer object for creating new tasks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTask {
    /// Externally supplied id; the store assigns one when `None`
    #[serde(default)]
    pub id: Option<i64>,
    /// Display name for the task
    pub name: String,
    /// Any additional notes or details
    #[serde(default)]
    pub description: String,
    /// When the task is due
    #[serde(default = "default_due_date")]
    pub due: NaiveDate,
    /// Initial status
    #[serde(default)]
    pub status: Status,
}

/// Default due date for tasks constructed without one: tomorrow, UTC.
pub fn default_due_date() -> NaiveDate {
    (Utc::now() + Duration::days(1)).date_naive()
}

impl NewTask {
    /// Create a not-started task due tomorrow
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            due: default_due_date(),
            status: Status::NotStarted,
        }
    }

    /// Set the due date
    pub fn with_due(mut self, due: NaiveDate) -> Self {
        self.due = due;
        self
    }

    /// Set the initial status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Request a specific id instead of a generated one
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Completion timestamp a freshly created task should carry
    pub fn initial_completed(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        (self.status == Status::Completed).then_some(now)
    }
}

impl Default for NewTask {
    fn default() -> Self {
        Self::new(String::new(), String::new())
    }
}

/// Raw task form submission before validation.
///
/// Every field is optional so that a missing field can be reported as a
/// field error instead of a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskInput {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Due date as `YYYY-MM-DD`
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Version the client last saw; enables conflict detection across reads
    #[serde(default, deserialize_with = "blank_as_none")]
    pub version: Option<i64>,
}

/// Numeric form fields arrive as strings from url-encoded bodies and as
/// numbers from JSON. A blank string means the field was left empty.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<i64>,
    <T as FromStr>::Err: fmt::Display,
    <T as TryFrom<i64>>::Error: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => T::try_from(n).map(Some).map_err(de::Error::custom),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => text.trim().parse().map(Some).map_err(de::Error::custom),
    }
}

/// Validated edit of an existing task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub due: NaiveDate,
    pub status: Status,
    /// Expected stored version; the freshly read version is used when absent
    pub version: Option<i64>,
}

impl Task {
    /// Whether the task is in the Completed status
    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    /// Build a stored task from a creation payload
    pub fn from_new(id: i64, new_task: NewTask, now: DateTime<Utc>) -> Self {
        let completed = new_task.initial_completed(now);
        Self {
            id,
            name: new_task.name,
            description: new_task.description,
            due: new_task.due,
            completed,
            status: new_task.status,
            version: 1,
        }
    }
}

/// Parse a `YYYY-MM-DD` due date, reporting failures against the `due` field
pub(crate) fn parse_due_date(raw: &str) -> Result<NaiveDate, FieldError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| FieldError::new("due", format!("'{raw}' is not a valid date (YYYY-MM-DD)")))
}
