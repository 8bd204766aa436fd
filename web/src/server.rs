//! HTTP server wiring
//!
//! Builds the axum router over a [`TaskService`] and runs it with graceful
//! shutdown.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::{future::Future, net::SocketAddr, sync::Arc};
use task_core::{TaskRepository, TaskService};
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    handlers::{self, AppState},
    request_logger::request_logging_middleware,
};

/// Task tracking HTTP server
pub struct TaskServer<R> {
    service: TaskService<R>,
}

impl<R: TaskRepository + 'static> TaskServer<R> {
    /// Create a server over the given repository
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            service: TaskService::new(repository),
        }
    }

    /// Create the router with all endpoints
    pub fn router(&self) -> Router {
        let state = Arc::new(AppState::new(self.service.clone()));

        Router::new()
            .route("/tasks", get(handlers::list_tasks::<R>).post(handlers::create_task::<R>))
            .route("/tasks/create", get(handlers::create_form::<R>))
            .route("/tasks/:id", get(handlers::show_task::<R>))
            .route(
                "/tasks/:id/edit",
                get(handlers::show_task::<R>).post(handlers::edit_task::<R>),
            )
            .route(
                "/tasks/:id/delete",
                get(handlers::show_task::<R>).post(handlers::delete_task::<R>),
            )
            .route("/health", get(handlers::health::<R>))
            .layer(middleware::from_fn(request_logging_middleware))
            .with_state(state)
    }

    /// Bind `addr` and serve until `shutdown` resolves
    pub async fn serve<F>(self, addr: &str, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid address '{addr}': {e}"))?;

        let listener = TcpListener::bind(socket_addr).await?;
        self.serve_listener(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve_listener<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting task server on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Task server stopped");
        Ok(())
    }
}
