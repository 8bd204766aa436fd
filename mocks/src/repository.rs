//! Mock implementation of TaskRepository trait
//!
//! Provides a thread-safe mock repository with:
//! - Error injection capabilities
//! - Call tracking for verification
//! - The same version check the SQLite store performs

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};
use task_core::{NewTask, Result, Task, TaskError, TaskRepository, TaskValidator};

/// Mock implementation of TaskRepository for testing
///
/// Features:
/// - Thread-safe concurrent access
/// - Error injection for failure testing
/// - Call history tracking for verification
/// - Version-checked updates
pub struct MockTaskRepository {
    tasks: Arc<Mutex<HashMap<i64, Task>>>,
    /// Highest id ever handed out, like SQLite's AUTOINCREMENT sequence
    last_id: Arc<AtomicI64>,
    error_injection: Arc<Mutex<Option<TaskError>>>,
    call_history: Arc<Mutex<Vec<String>>>,
}

impl Default for MockTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTaskRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::with_next_id(1)
    }

    /// Create mock repository with pre-populated tasks
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let max_id = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        let task_map = tasks.into_iter().map(|t| (t.id, t)).collect();

        Self {
            tasks: Arc::new(Mutex::new(task_map)),
            last_id: Arc::new(AtomicI64::new(max_id)),
            error_injection: Arc::new(Mutex::new(None)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create mock repository with specific starting ID
    pub fn with_next_id(next_id: i64) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(HashMap::new())),
            last_id: Arc::new(AtomicI64::new(next_id.saturating_sub(1))),
            error_injection: Arc::new(Mutex::new(None)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Inject error for next operation
    pub fn inject_error(&self, error: TaskError) {
        *self.error_injection.lock() = Some(error);
    }

    /// Clear error injection
    pub fn clear_error(&self) {
        *self.error_injection.lock() = None;
    }

    /// Remove a task behind the caller's back, without recording a call
    pub fn remove_silently(&self, id: i64) -> Option<Task> {
        self.tasks.lock().remove(&id)
    }

    /// Number of stored tasks
    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    /// Get history of called methods
    pub fn call_history(&self) -> Vec<String> {
        self.call_history.lock().clone()
    }

    /// Clear call history
    pub fn clear_history(&self) {
        self.call_history.lock().clear();
    }

    /// Assert method was called
    pub fn assert_called(&self, method: &str) {
        let history = self.call_history.lock();
        assert!(
            history.iter().any(|call| call.contains(method)),
            "Method '{}' was not called. Call history: {:?}",
            method,
            *history
        );
    }

    /// Assert method was never called
    pub fn assert_not_called(&self, method: &str) {
        let history = self.call_history.lock();
        assert!(
            !history.iter().any(|call| call.starts_with(method)),
            "Method '{}' was called unexpectedly. Call history: {:?}",
            method,
            *history
        );
    }

    /// Check if an error should be injected, consuming it if so
    fn check_error_injection(&self) -> Result<()> {
        let mut error_opt = self.error_injection.lock();
        if let Some(error) = error_opt.take() {
            return Err(error);
        }
        Ok(())
    }

    /// Record method call in history
    fn record_call(&self, method: &str) {
        self.call_history.lock().push(format!("{method}()"));
    }

    /// Record method call with parameters in history
    fn record_call_with_params(&self, method: &str, params: &str) {
        self.call_history.lock().push(format!("{method}({params})"));
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn list_all(&self) -> Result<Vec<Task>> {
        self.record_call("list_all");
        self.check_error_injection()?;

        let mut tasks: Vec<Task> = self.tasks.lock().values().cloned().collect();
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Task>> {
        self.record_call_with_params("get_by_id", &format!("id={id}"));
        self.check_error_injection()?;

        Ok(self.tasks.lock().get(&id).cloned())
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        self.record_call_with_params("create", &format!("name={}", task.name));
        self.check_error_injection()?;
        TaskValidator::validate_new_task(&task)?;

        // Allocation happens under the map lock, so plain load/store is enough
        let mut tasks = self.tasks.lock();
        let last_id = self.last_id.load(Ordering::SeqCst);
        let id = match task.id {
            Some(id) if tasks.contains_key(&id) => return Err(TaskError::DuplicateId(id)),
            Some(id) => id,
            None => last_id.checked_add(1).ok_or_else(|| {
                TaskError::Database("database or disk is full: no task ids left".to_string())
            })?,
        };
        self.last_id.store(last_id.max(id), Ordering::SeqCst);

        let created = Task::from_new(id, task, Utc::now());
        tasks.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, task: Task) -> Result<Task> {
        self.record_call_with_params(
            "update",
            &format!("id={}, version={}", task.id, task.version),
        );
        self.check_error_injection()?;

        let mut tasks = self.tasks.lock();
        match tasks.get_mut(&task.id) {
            Some(stored) if stored.version == task.version => {
                *stored = Task {
                    version: task.version + 1,
                    ..task
                };
                Ok(stored.clone())
            }
            _ => Err(TaskError::concurrency(task.id)),
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.record_call_with_params("delete", &format!("id={id}"));
        self.check_error_injection()?;

        self.tasks
            .lock()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| TaskError::not_found_id(id))
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        self.record_call_with_params("exists", &format!("id={id}"));
        self.check_error_injection()?;

        Ok(self.tasks.lock().contains_key(&id))
    }

    async fn health_check(&self) -> Result<()> {
        self.record_call("health_check");
        self.check_error_injection()?;

        // Mock always reports healthy
        Ok(())
    }
}
