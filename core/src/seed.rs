//! Initial data for an empty store.

use chrono::NaiveDate;
use tracing::info;

use crate::{
    error::{Result, TaskError},
    models::{NewTask, Status},
    repository::TaskRepository,
};

/// The three tasks inserted into an empty store on first start
pub fn default_tasks() -> Result<Vec<NewTask>> {
    let due = NaiveDate::from_ymd_opt(2021, 8, 29)
        .ok_or_else(|| TaskError::Internal("invalid seed due date".to_string()))?;

    Ok(vec![
        NewTask::new(
            "Initialize Github Repo for Priority Tasks",
            "Create a repository for my ASP.Net Core task management web application for the Priority1 technical interview.",
        ),
        NewTask::new(
            "Initialize ASP.Net Core Web Application",
            "Initialize the project solution for Priority Tasks.",
        ),
        NewTask::new(
            "Create Task Model and Context",
            "Create the model class, and database context for Entity Framework for tasks.",
        ),
    ]
    .into_iter()
    .map(|task| task.with_due(due).with_status(Status::NotStarted))
    .collect())
}

/// Insert [`default_tasks`] when the store holds no tasks at all.
///
/// Returns how many tasks were inserted; zero when the store already had
/// data. Running it twice never duplicates the seed set.
pub async fn seed_if_empty<R>(repository: &R) -> Result<usize>
where
    R: TaskRepository + ?Sized,
{
    if !repository.list_all().await?.is_empty() {
        info!("Task store already populated, skipping seed");
        return Ok(0);
    }

    let tasks = default_tasks()?;
    let count = tasks.len();
    for task in tasks {
        repository.create(task).await?;
    }

    info!(count, "Seeded task store");
    Ok(count)
}
