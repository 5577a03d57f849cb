use rbldns_application::ports::FastlistPort;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const DEFAULT_EXPIRE_INTERVAL_SECS: u64 = 20;

/// Periodically drops fastlist entries whose expiry has passed.
pub struct FastlistExpiryJob {
    port: Arc<dyn FastlistPort>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl FastlistExpiryJob {
    pub fn new(port: Arc<dyn FastlistPort>) -> Self {
        Self {
            port,
            interval_secs: DEFAULT_EXPIRE_INTERVAL_SECS,
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
        info!(listen = %self.port.listen_addr(), "Starting fastlist expiry job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("FastlistExpiryJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let now = SystemTime::now()
                            .duration_since(UNIX_EPOCH)
                            .unwrap_or_default()
                            .as_secs();
                        let removed = self.port.expire(now);
                        if removed > 0 {
                            debug!(listen = %self.port.listen_addr(), removed, "Expiry sweep");
                        }
                    }
                }
            }
        });
    }
}
