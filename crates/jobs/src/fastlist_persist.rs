use rbldns_application::ports::FastlistPort;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const DEFAULT_PERSIST_INTERVAL_SECS: u64 = 60;

/// Writes the fastlist snapshot on a fixed interval. Failures are logged and retried next tick.
pub struct FastlistPersistJob {
    port: Arc<dyn FastlistPort>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl FastlistPersistJob {
    pub fn new(port: Arc<dyn FastlistPort>) -> Self {
        Self {
            port,
            interval_secs: DEFAULT_PERSIST_INTERVAL_SECS,
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
        info!(listen = %self.port.listen_addr(), "Starting fastlist persist job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick fires immediately; nothing has changed yet
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("FastlistPersistJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let port = Arc::clone(&self.port);
                        match tokio::task::spawn_blocking(move || port.persist()).await {
                            Ok(Ok(count)) => debug!(count, "Fastlist snapshot written"),
                            Ok(Err(e)) => error!(error = %e, "Fastlist snapshot failed"),
                            Err(e) => error!(error = %e, "Fastlist snapshot task panicked"),
                        }
                    }
                }
            }
        });
    }
}
