use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for task operations
pub type Result<T> = std::result::Result<T, TaskError>;

/// A single invalid or missing form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field as submitted
    pub field: String,
    /// Human-readable explanation
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field error found while validating one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any error was reported against `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected, otherwise a validation error
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(TaskError::Validation(self))
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

/// Error types for the task tracking system.
///
/// Each variant maps to an HTTP status code so the web layer can translate
/// failures without inspecting messages.
///
/// # Examples
///
/// ```rust
/// use task_core::error::TaskError;
///
/// let not_found = TaskError::not_found_id(42);
/// assert!(not_found.is_not_found());
/// assert_eq!(not_found.status_code(), 404);
///
/// let conflict = TaskError::concurrency(42);
/// assert_eq!(conflict.status_code(), 409);
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task not found by the given identifier
    #[error("Task not found: {0}")]
    NotFound(String),

    /// One or more submitted fields are missing or invalid
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// The row changed or disappeared between read and write
    #[error("Concurrency conflict: {0}")]
    Concurrency(String),

    /// An explicitly supplied id is already taken
    #[error("Task id already exists: {0}")]
    DuplicateId(i64),

    /// Database operation error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal system error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskError {
    /// Create a not found error for a task ID
    pub fn not_found_id(id: i64) -> Self {
        Self::NotFound(format!("Task with ID {id} not found"))
    }

    /// Not found error for a request that carried no usable id
    pub fn missing_id() -> Self {
        Self::NotFound("No task ID supplied".to_string())
    }

    /// Create a write conflict error for a task ID
    pub fn concurrency(id: i64) -> Self {
        Self::Concurrency(format!("Task with ID {id} was modified by another request"))
    }

    /// Validation error for a single field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(FieldError::new(field, message).into())
    }

    /// Create a validation error for empty field
    pub fn empty_field(field: &str) -> Self {
        Self::invalid_field(field, format!("Field '{field}' cannot be empty"))
    }

    /// Check if this error indicates a not found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskError::NotFound(_))
    }

    /// Check if this error indicates a validation problem
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::Validation(_))
    }

    /// Check if this error indicates a write conflict
    pub fn is_concurrency(&self) -> bool {
        matches!(self, TaskError::Concurrency(_))
    }

    /// Check if this error indicates a database problem
    pub fn is_database(&self) -> bool {
        matches!(self, TaskError::Database(_))
    }

    /// Field errors carried by a validation failure
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            TaskError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Convert to appropriate HTTP status code equivalent
    pub fn status_code(&self) -> u16 {
        match self {
            TaskError::NotFound(_) => 404,
            TaskError::Validation(_) => 400,
            TaskError::Concurrency(_) => 409,
            TaskError::DuplicateId(_) => 409,
            TaskError::Database(_) => 500,
            TaskError::Configuration(_) => 500,
            TaskError::Internal(_) => 500,
        }
    }
}
