use database::{NewTask, SqliteTaskRepository, Status, Task, TaskError, TaskRepository};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

async fn create_file_repository(dir: &TempDir) -> SqliteTaskRepository {
    let path = dir.path().join("tasks.sqlite");
    let url = format!("sqlite://{}", path.display());
    let repo = SqliteTaskRepository::new(&url).await.unwrap();
    repo.migrate().await.unwrap();
    repo
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let created = {
        let repo = create_file_repository(&dir).await;
        let task = repo
            .create(NewTask::new("Persistent", "kept on disk").with_status(Status::Completed))
            .await
            .unwrap();
        repo.close().await;
        task
    };

    let repo = create_file_repository(&dir).await;
    let reloaded = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(reloaded.name, "Persistent");
    assert_eq!(reloaded.status, Status::Completed);
    assert_eq!(
        reloaded.completed.map(|c| c.timestamp_micros()),
        created.completed.map(|c| c.timestamp_micros())
    );
}

#[tokio::test]
async fn test_migrations_are_rerunnable() {
    let dir = TempDir::new().unwrap();
    let repo = create_file_repository(&dir).await;
    repo.migrate().await.unwrap();
    assert!(repo.health_check().await.is_ok());
}

#[tokio::test]
async fn test_concurrent_writers_one_wins() {
    let dir = TempDir::new().unwrap();
    let repo = Arc::new(create_file_repository(&dir).await);
    let created = repo.create(NewTask::new("Contested", "")).await.unwrap();

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let repo = Arc::clone(&repo);
            let task = Task {
                description: format!("writer {i}"),
                ..created.clone()
            };
            tokio::spawn(async move { repo.update(task).await })
        })
        .collect();

    let results = futures::future::join_all(handles).await;
    let (won, lost): (Vec<_>, Vec<_>) = results
        .into_iter()
        .map(|r| r.unwrap())
        .partition(|r| r.is_ok());

    assert_eq!(won.len(), 1, "exactly one writer should succeed");
    for result in lost {
        assert!(matches!(result, Err(TaskError::Concurrency(_))));
    }

    let stored = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(stored.version, created.version + 1);
}

#[tokio::test]
async fn test_pool_options_are_applied() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("small.sqlite").display());

    let repo = SqliteTaskRepository::with_pool_options(&url, 2, Duration::from_secs(2))
        .await
        .unwrap();
    repo.migrate().await.unwrap();

    assert!(repo.pool().options().get_max_connections() == 2);
}

#[tokio::test]
async fn test_memory_database_keeps_data_between_queries() {
    let repo = SqliteTaskRepository::new("sqlite::memory:").await.unwrap();
    repo.migrate().await.unwrap();

    for i in 0..3 {
        repo.create(NewTask::new(format!("Task {i}"), "")).await.unwrap();
    }
    assert_eq!(repo.list_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_seeding_file_database_once() {
    let dir = TempDir::new().unwrap();
    let repo = create_file_repository(&dir).await;

    assert_eq!(task_core::seed_if_empty(&repo).await.unwrap(), 3);
    assert_eq!(task_core::seed_if_empty(&repo).await.unwrap(), 0);

    let ids: Vec<i64> = repo.list_all().await.unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, [1, 2, 3]);
}
