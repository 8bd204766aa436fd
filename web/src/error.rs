//! Error handling for the HTTP layer
//!
//! Maps task errors to HTTP status codes and JSON error bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use task_core::{TaskError, TaskInput, ValidationErrors};
use thiserror::Error;

/// Errors returned by HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Task not found: {0}")]
    NotFound(String),

    /// Field errors, with the submission echoed back when there was one
    #[error("Validation error: {errors}")]
    Validation {
        errors: ValidationErrors,
        input: Option<TaskInput>,
    },

    #[error("Malformed request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation { .. } | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Attach the rejected submission to a validation error
    pub fn with_input(self, input: TaskInput) -> Self {
        match self {
            ApiError::Validation { errors, .. } => ApiError::Validation {
                errors,
                input: Some(input),
            },
            other => other,
        }
    }

    /// JSON body sent to the client
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation { errors, input } => json!({
                "error": "Validation failed",
                "errors": errors,
                "input": input,
            }),
            // Internal details stay in the log
            ApiError::Internal(_) => json!({ "error": "Internal server error" }),
            ApiError::Unavailable(_) => json!({ "error": "Service unavailable" }),
            other => json!({ "error": other.to_string() }),
        }
    }
}

/// Convert from TaskError to ApiError
impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(msg) => ApiError::NotFound(msg),
            TaskError::Validation(errors) => ApiError::Validation {
                errors,
                input: None,
            },
            TaskError::Concurrency(msg) => ApiError::Conflict(msg),
            TaskError::DuplicateId(id) => {
                ApiError::Conflict(format!("A task with id {id} already exists"))
            }
            TaskError::Database(msg) => ApiError::Internal(format!("Database error: {msg}")),
            TaskError::Configuration(msg) => {
                ApiError::Internal(format!("Configuration error: {msg}"))
            }
            TaskError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        }
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use task_core::FieldError;

    #[test]
    fn test_task_error_mapping() {
        let cases = [
            (TaskError::not_found_id(1), StatusCode::NOT_FOUND),
            (TaskError::empty_field("name"), StatusCode::BAD_REQUEST),
            (TaskError::concurrency(1), StatusCode::CONFLICT),
            (TaskError::DuplicateId(1), StatusCode::CONFLICT),
            (TaskError::Database("locked".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
            (TaskError::Internal("bug".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (task_error, expected) in cases {
            assert_eq!(ApiError::from(task_error).status_code(), expected);
        }
    }

    #[test]
    fn test_validation_body_lists_fields_and_input() {
        let input = TaskInput {
            name: Some(String::new()),
            ..Default::default()
        };
        let error = ApiError::from(TaskError::Validation(
            FieldError::new("name", "The Name field is required").into(),
        ))
        .with_input(input);

        let body = error.to_json();
        assert_eq!(body["errors"][0]["field"], "name");
        assert_eq!(body["input"]["name"], "");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let error = ApiError::from(TaskError::Database("secret path /var/db".to_string()));
        let body = error.to_json();
        assert_eq!(body["error"], "Internal server error");
    }

    #[test]
    fn test_unavailable_details_are_hidden() {
        let error = ApiError::Unavailable("Database error: connection refused".to_string());
        assert_eq!(error.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error.to_json(), json!({ "error": "Service unavailable" }));
    }

    #[test]
    fn test_with_input_ignores_other_errors() {
        let error = ApiError::from(TaskError::not_found_id(3)).with_input(TaskInput::default());
        assert!(matches!(error, ApiError::NotFound(_)));
    }
}
