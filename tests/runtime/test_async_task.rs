//! Tests for async task runtime primitives.

use partial_proxy::runtime::AsyncTask;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::runtime::Handle;

#[tokio::test]
async fn test_async_task_spawn_on() {
    let task = AsyncTask::spawn_on(&Handle::current(), || 42);
    let result = task.await.unwrap();
    assert_eq!(result, 42);
}

#[tokio::test]
async fn test_async_task_spawn_async_on() {
    let task = AsyncTask::spawn_async_on(&Handle::current(), async { 42 });
    let result = task.await.unwrap();
    assert_eq!(result, 42);
}

#[tokio::test]
async fn test_async_task_runs_without_being_awaited() {
    let runs = Arc::new(AtomicUsize::new(0));
    let (done_tx, done_rx) = tokio::sync::oneshot::channel();

    let counter = Arc::clone(&runs);
    let task = AsyncTask::spawn_async_on(&Handle::current(), async move {
        counter.fetch_add(1, Ordering::SeqCst);
        let _ = done_tx.send(());
    });
    drop(task);

    done_rx.await.unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_shared_task_runs_once_for_many_waiters() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let shared = AsyncTask::spawn_async_on(&Handle::current(), async move {
        counter.fetch_add(1, Ordering::SeqCst);
        "done".to_string()
    })
    .shared();

    let results = futures::future::join_all((0..5).map(|_| shared.clone())).await;

    for result in results {
        assert_eq!(result.unwrap(), "done");
    }
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_async_task_reports_panicked_job() {
    let task = AsyncTask::<u8>::spawn_async_on(&Handle::current(), async {
        panic!("job failed")
    });
    assert!(task.await.is_err());
}
