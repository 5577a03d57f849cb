use rbldns_application::ports::{Dataset, ReloadOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const DEFAULT_CHECK_INTERVAL_SECS: u64 = 60;

/// Polls one dataset's source and reloads it when the file changes.
pub struct AutoreloadJob {
    dataset: Arc<dyn Dataset>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl AutoreloadJob {
    pub fn new(dataset: Arc<dyn Dataset>) -> Self {
        Self {
            dataset,
            interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, secs: u64) -> Self {
        self.interval_secs = secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            source = self.dataset.source(),
            interval_secs = self.interval_secs,
            "Starting autoreload job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!(source = self.dataset.source(), "AutoreloadJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        if self.dataset.is_shut_down() {
                            info!(source = self.dataset.source(), "AutoreloadJob: dataset shut down");
                            break;
                        }
                        if self.dataset.has_changed() {
                            self.reload().await;
                        }
                    }
                }
            }
        });
    }

    async fn reload(&self) {
        let dataset = Arc::clone(&self.dataset);
        // parsing is blocking and runs to completion even if shutdown fires meanwhile
        match tokio::task::spawn_blocking(move || dataset.reload()).await {
            Ok(Ok(ReloadOutcome::Reloaded(stats))) => {
                debug!(
                    source = self.dataset.source(),
                    count = stats.count,
                    "Autoreload picked up source change"
                );
            }
            Ok(Ok(ReloadOutcome::Skipped)) => {}
            Ok(Err(e)) => {
                error!(source = self.dataset.source(), error = %e, "Autoreload failed");
            }
            Err(e) => {
                error!(source = self.dataset.source(), error = %e, "Autoreload task panicked");
            }
        }
    }
}
