//! Contract test helpers for validating trait implementations
//!
//! Provides standardized tests that any implementation of core traits
//! should pass, ensuring the in-memory mock and the SQLite store agree on
//! behavior.

use crate::{assert_sorted_by_id, create_unique_new_task, NewTaskBuilder};
use task_core::{Status, Task, TaskError, TaskRepository};

/// Test any TaskRepository implementation with comprehensive contract tests
///
/// The checks share one repository, so none of them assume it starts empty.
pub async fn test_repository_contract<R: TaskRepository>(repo: &R) {
    test_health_check_contract(repo).await;
    test_create_contract(repo).await;
    test_explicit_id_contract(repo).await;
    test_get_contract(repo).await;
    test_update_contract(repo).await;
    test_stale_update_contract(repo).await;
    test_delete_contract(repo).await;
    test_list_contract(repo).await;
    test_validation_contract(repo).await;
}

/// Test task creation contract
pub async fn test_create_contract<R: TaskRepository>(repo: &R) {
    let new_task = create_unique_new_task("create");
    let task = repo
        .create(new_task.clone())
        .await
        .expect("Create should succeed");

    assert!(task.id > 0, "Created task should have positive ID");
    assert_eq!(task.name, new_task.name, "Created task should preserve name");
    assert_eq!(task.due, new_task.due, "Created task should preserve due date");
    assert_eq!(task.status, Status::NotStarted, "Default status should be NotStarted");
    assert!(task.completed.is_none(), "New task should not be completed");
    assert_eq!(task.version, 1, "New task should start at version 1");

    let completed = repo
        .create(
            NewTaskBuilder::new()
                .with_name("Created completed")
                .with_status(Status::Completed)
                .build(),
        )
        .await
        .expect("Create completed should succeed");
    assert!(
        completed.completed.is_some(),
        "Task created as Completed should carry a timestamp"
    );
}

/// Test explicit id handling
pub async fn test_explicit_id_contract<R: TaskRepository>(repo: &R) {
    let id = 90_000;
    let task = repo
        .create(NewTaskBuilder::new().with_id(id).build())
        .await
        .expect("Create with explicit id should succeed");
    assert_eq!(task.id, id, "Explicit id should be honoured");

    match repo.create(NewTaskBuilder::new().with_id(id).build()).await {
        Err(TaskError::DuplicateId(dup)) => assert_eq!(dup, id),
        other => panic!("Expected DuplicateId, got {other:?}"),
    }
}

/// Test task retrieval contract
pub async fn test_get_contract<R: TaskRepository>(repo: &R) {
    let created = repo
        .create(create_unique_new_task("get"))
        .await
        .expect("Create should succeed");

    let retrieved = repo
        .get_by_id(created.id)
        .await
        .expect("Get should succeed");
    assert_eq!(retrieved.as_ref(), Some(&created), "Should retrieve the created task");

    let missing = repo.get_by_id(-1).await.expect("Get should not fail for missing id");
    assert!(missing.is_none(), "Missing id should return None");

    assert!(repo.exists(created.id).await.expect("Exists should succeed"));
    assert!(!repo.exists(-1).await.expect("Exists should succeed"));
}

/// Test task update contract
pub async fn test_update_contract<R: TaskRepository>(repo: &R) {
    let created = repo
        .create(create_unique_new_task("update"))
        .await
        .expect("Create should succeed");

    let updated = repo
        .update(Task {
            name: "Updated Name".to_string(),
            description: "Updated description".to_string(),
            status: Status::InReview,
            ..created.clone()
        })
        .await
        .expect("Update should succeed");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Updated Name");
    assert_eq!(updated.status, Status::InReview);
    assert_eq!(updated.version, created.version + 1, "Update should bump version");

    let stored = repo.get_by_id(created.id).await.expect("Get should succeed");
    assert_eq!(stored, Some(updated), "Stored row should match returned task");
}

/// Test that writes based on an old version are refused
pub async fn test_stale_update_contract<R: TaskRepository>(repo: &R) {
    let created = repo
        .create(create_unique_new_task("stale"))
        .await
        .expect("Create should succeed");

    repo.update(created.clone())
        .await
        .expect("First update should succeed");

    match repo.update(created.clone()).await {
        Err(TaskError::Concurrency(_)) => {}
        other => panic!("Expected Concurrency for stale version, got {other:?}"),
    }

    repo.delete(created.id).await.expect("Delete should succeed");
    match repo.update(created).await {
        Err(TaskError::Concurrency(_)) => {}
        other => panic!("Expected Concurrency for deleted row, got {other:?}"),
    }
}

/// Test task deletion contract
pub async fn test_delete_contract<R: TaskRepository>(repo: &R) {
    let created = repo
        .create(create_unique_new_task("delete"))
        .await
        .expect("Create should succeed");

    repo.delete(created.id).await.expect("Delete should succeed");
    assert!(
        repo.get_by_id(created.id).await.expect("Get should succeed").is_none(),
        "Deleted task should be gone"
    );

    match repo.delete(created.id).await {
        Err(TaskError::NotFound(_)) => {}
        other => panic!("Expected NotFound for second delete, got {other:?}"),
    }
}

/// Test task listing contract
pub async fn test_list_contract<R: TaskRepository>(repo: &R) {
    let first = repo
        .create(create_unique_new_task("list-1"))
        .await
        .expect("Create should succeed");
    let second = repo
        .create(create_unique_new_task("list-2"))
        .await
        .expect("Create should succeed");

    let tasks = repo.list_all().await.expect("List should succeed");
    assert!(tasks.iter().any(|t| t.id == first.id));
    assert!(tasks.iter().any(|t| t.id == second.id));
    assert_sorted_by_id(&tasks);
}

/// Test that stores refuse tasks without a usable name
pub async fn test_validation_contract<R: TaskRepository>(repo: &R) {
    match repo.create(NewTaskBuilder::new().with_name("   ").build()).await {
        Err(TaskError::Validation(errors)) => assert!(errors.has_field("name")),
        other => panic!("Expected validation error, got {other:?}"),
    }
}

/// Test health check contract
pub async fn test_health_check_contract<R: TaskRepository>(repo: &R) {
    repo.health_check()
        .await
        .expect("Health check should succeed for a working repository");
}

/// Test ids at the top of the integer range.
///
/// Exhausts the id space, so run it on a repository of its own.
pub async fn test_id_ceiling_contract<R: TaskRepository>(repo: &R) {
    let pinned = i64::from(i32::MAX);
    repo.create(NewTaskBuilder::new().with_name("Pinned").with_id(pinned).build())
        .await
        .expect("Create with a large explicit id should succeed");

    let next = repo
        .create(create_unique_new_task("after-pinned"))
        .await
        .expect("Create after a large explicit id should succeed");
    assert_eq!(next.id, pinned + 1, "Generated ids continue past the largest id");

    let tasks = repo.list_all().await.expect("List should succeed");
    assert_eq!(tasks.len(), 2);
    assert_sorted_by_id(&tasks);

    repo.create(NewTaskBuilder::new().with_name("Last").with_id(i64::MAX).build())
        .await
        .expect("Create with the largest possible id should succeed");

    match repo.create(create_unique_new_task("exhausted")).await {
        Err(TaskError::Database(_)) => {}
        other => panic!("Expected a database error once ids run out, got {other:?}"),
    }

    // Running out of ids must not damage what is stored
    let tasks = repo.list_all().await.expect("List should still succeed");
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks.last().map(|t| t.id), Some(i64::MAX));
    assert!(repo.get_by_id(pinned).await.expect("Get should succeed").is_some());
}
