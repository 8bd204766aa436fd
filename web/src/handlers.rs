//! HTTP handlers for the task routes
//!
//! Reads return JSON; successful writes redirect back to the task list.

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use task_core::{TaskInput, TaskRepository, TaskService};

use crate::{
    error::ApiError,
    serialization::{serialize_create_template, serialize_task, serialize_tasks},
};

/// Where every successful write sends the client
pub const TASKS_PATH: &str = "/tasks";

/// Shared state for handlers
pub struct AppState<R> {
    pub service: TaskService<R>,
}

impl<R> AppState<R> {
    pub fn new(service: TaskService<R>) -> Self {
        Self { service }
    }
}

type SharedState<R> = State<Arc<AppState<R>>>;

/// Path ids that are not integers are treated as missing
fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

fn redirect_to_index() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, TASKS_PATH)]).into_response()
}

fn form_input(form: Result<Form<TaskInput>, FormRejection>) -> Result<TaskInput, ApiError> {
    form.map(|Form(input)| input)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// GET /tasks
pub async fn list_tasks<R: TaskRepository>(
    State(state): SharedState<R>,
) -> Result<Json<Value>, ApiError> {
    let tasks = state.service.list().await?;
    Ok(Json(serialize_tasks(&tasks)))
}

/// GET /tasks/create
pub async fn create_form<R: TaskRepository>(State(state): SharedState<R>) -> Json<Value> {
    Json(serialize_create_template(&state.service.create_template()))
}

/// POST /tasks
pub async fn create_task<R: TaskRepository>(
    State(state): SharedState<R>,
    form: Result<Form<TaskInput>, FormRejection>,
) -> Result<Response, ApiError> {
    let input = form_input(form)?;
    match state.service.create(&input).await {
        Ok(_) => Ok(redirect_to_index()),
        Err(e) => Err(ApiError::from(e).with_input(input)),
    }
}

/// GET /tasks/{id}, also serves the edit form and delete confirmation
pub async fn show_task<R: TaskRepository>(
    State(state): SharedState<R>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let task = state.service.get(parse_id(&id)).await?;
    Ok(Json(serialize_task(&task)))
}

/// POST /tasks/{id}/edit
pub async fn edit_task<R: TaskRepository>(
    State(state): SharedState<R>,
    Path(id): Path<String>,
    form: Result<Form<TaskInput>, FormRejection>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id).ok_or_else(|| ApiError::NotFound("No task ID supplied".to_string()))?;
    let input = form_input(form)?;

    match state.service.edit(id, &input).await {
        Ok(_) => Ok(redirect_to_index()),
        Err(e) => Err(ApiError::from(e).with_input(input)),
    }
}

/// POST /tasks/{id}/delete
pub async fn delete_task<R: TaskRepository>(
    State(state): SharedState<R>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    state.service.delete(parse_id(&id)).await?;
    Ok(redirect_to_index())
}

/// GET /health
pub async fn health<R: TaskRepository>(State(state): SharedState<R>) -> Result<Json<Value>, ApiError> {
    state
        .service
        .health_check()
        .await
        .map_err(|e| ApiError::Unavailable(e.to_string()))?;

    Ok(Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12"), Some(12));
        assert_eq!(parse_id(" 7 "), Some(7));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("1.5"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn test_redirect_points_at_index() {
        let response = redirect_to_index();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], TASKS_PATH);
    }
}
