//! Concurrent edits through the HTTP layer against the mock store

use futures_util::future::join_all;
use mocks::{MockTaskRepository, TaskInputBuilder};
use reqwest::{redirect, Client, StatusCode};
use std::sync::Arc;
use task_core::TaskRepository;
use task_web::TaskServer;
use tokio::net::TcpListener;

#[tokio::test]
async fn test_parallel_edits_with_same_version() {
    let repository = Arc::new(MockTaskRepository::new());
    let created = repository.create(mocks::create_new_task()).await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(
        TaskServer::new(Arc::clone(&repository)).serve_listener(listener, std::future::pending()),
    );

    let client = Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .unwrap();

    let requests = (0..8).map(|i| {
        let client = client.clone();
        let url = format!("http://{addr}/tasks/{}/edit", created.id);
        let input = TaskInputBuilder::from_task(&created)
            .with_description(format!("writer {i}"))
            .build();
        async move { client.post(url).form(&input).send().await.unwrap().status() }
    });

    let statuses = join_all(requests).await;
    let won = statuses.iter().filter(|s| **s == StatusCode::FOUND).count();
    let conflicted = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();

    assert_eq!(won, 1);
    assert_eq!(conflicted, statuses.len() - 1);
    repository.assert_called("update");
}
