use rbldns_jobs::{AutoreloadJob, FastlistExpiryJob, FastlistPersistJob, JobRunner};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

mod helpers;
use helpers::{MockFastlistPort, MockReloadable};

#[tokio::test]
async fn test_job_runner_empty_starts_cleanly() {
    JobRunner::new().start().await;
}

#[tokio::test]
async fn test_job_runner_counts_jobs() {
    let dataset = Arc::new(MockReloadable::new());
    let port = Arc::new(MockFastlistPort::new("127.0.0.1:8053"));

    let runner = JobRunner::new()
        .with_autoreload(AutoreloadJob::new(dataset.clone()))
        .with_autoreload(AutoreloadJob::new(dataset))
        .with_fastlist_expiry(FastlistExpiryJob::new(port.clone()))
        .with_fastlist_persist(FastlistPersistJob::new(port));

    assert_eq!(runner.job_count(), 4);
}

#[tokio::test]
async fn test_job_runner_starts_every_autoreload_job() {
    let first = Arc::new(MockReloadable::new());
    let second = Arc::new(MockReloadable::new());
    first.touch();
    second.touch();

    JobRunner::new()
        .with_autoreload(AutoreloadJob::new(first.clone()).with_interval(1))
        .with_autoreload(AutoreloadJob::new(second.clone()).with_interval(1))
        .start()
        .await;
    sleep(Duration::from_millis(100)).await;

    assert_eq!(first.reload_count(), 1);
    assert_eq!(second.reload_count(), 1);
}

#[tokio::test]
async fn test_job_runner_shutdown_token_stops_jobs() {
    let port = Arc::new(MockFastlistPort::new("127.0.0.1:8053"));
    let token = CancellationToken::new();

    JobRunner::new()
        .with_fastlist_expiry(FastlistExpiryJob::new(port.clone()).with_interval(1))
        .with_shutdown_token(token.clone())
        .start()
        .await;
    sleep(Duration::from_millis(100)).await;
    token.cancel();
    sleep(Duration::from_millis(50)).await;

    let calls = port.expire_calls();
    sleep(Duration::from_millis(1100)).await;

    assert_eq!(calls, 1);
    assert_eq!(port.expire_calls(), calls);
}
