use crate::{AutoreloadJob, FastlistExpiryJob, FastlistListenerJob, FastlistPersistJob};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub trait SpawnableJob: Send + 'static {
    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn start_job(self: Arc<Self>) -> tokio::task::JoinHandle<()>;
}

macro_rules! impl_spawnable_job {
    ($t:ty) => {
        impl SpawnableJob for $t {
            fn with_cancellation(self, token: CancellationToken) -> Self {
                self.with_cancellation(token)
            }

            fn start_job(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
                tokio::spawn(async move { self.start().await })
            }
        }
    };
}

impl_spawnable_job!(AutoreloadJob);
impl_spawnable_job!(FastlistListenerJob);
impl_spawnable_job!(FastlistExpiryJob);
impl_spawnable_job!(FastlistPersistJob);

fn spawn_job<J: SpawnableJob>(job: Option<J>, shutdown: &Option<CancellationToken>) {
    if let Some(job) = job {
        let job = match shutdown {
            Some(token) => job.with_cancellation(token.clone()),
            None => job,
        };
        Arc::new(job).start_job();
    }
}

fn spawn_all<J: SpawnableJob>(jobs: Vec<J>, shutdown: &Option<CancellationToken>) {
    for job in jobs {
        spawn_job(Some(job), shutdown);
    }
}

/// Starts every background worker with one shared shutdown token.
pub struct JobRunner {
    autoreload: Vec<AutoreloadJob>,
    fastlist_listeners: Vec<FastlistListenerJob>,
    fastlist_expiry: Vec<FastlistExpiryJob>,
    fastlist_persist: Vec<FastlistPersistJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            autoreload: Vec::new(),
            fastlist_listeners: Vec::new(),
            fastlist_expiry: Vec::new(),
            fastlist_persist: Vec::new(),
            shutdown: None,
        }
    }

    pub fn with_autoreload(mut self, job: AutoreloadJob) -> Self {
        self.autoreload.push(job);
        self
    }

    pub fn with_fastlist_listener(mut self, job: FastlistListenerJob) -> Self {
        self.fastlist_listeners.push(job);
        self
    }

    pub fn with_fastlist_expiry(mut self, job: FastlistExpiryJob) -> Self {
        self.fastlist_expiry.push(job);
        self
    }

    pub fn with_fastlist_persist(mut self, job: FastlistPersistJob) -> Self {
        self.fastlist_persist.push(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub fn job_count(&self) -> usize {
        self.autoreload.len()
            + self.fastlist_listeners.len()
            + self.fastlist_expiry.len()
            + self.fastlist_persist.len()
    }

    pub async fn start(self) {
        info!(jobs = self.job_count(), "Starting background job runner");

        spawn_all(self.autoreload, &self.shutdown);
        spawn_all(self.fastlist_listeners, &self.shutdown);
        spawn_all(self.fastlist_expiry, &self.shutdown);
        spawn_all(self.fastlist_persist, &self.shutdown);

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
