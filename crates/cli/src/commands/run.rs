use anyhow::Context;
use rbldns_application::ports::{Dataset, FastlistPort};
use rbldns_domain::Config;
use rbldns_jobs::{
    AutoreloadJob, FastlistExpiryJob, FastlistListenerJob, FastlistPersistJob, JobRunner,
};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::bootstrap::load_zones;

/// Loads every zone, keeps the datasets fresh in the background until Ctrl+C.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let zones = load_zones(config)?;
    let shutdown = CancellationToken::new();

    let mut runner = JobRunner::new().with_shutdown_token(shutdown.clone());
    for handle in &zones.registry.datasets {
        runner = match &handle.fastlist {
            Some(port) => runner
                .with_fastlist_listener(
                    FastlistListenerJob::bind_with_recv_buffer(
                        port.clone(),
                        config.fastlist.recv_buffer_bytes,
                    )
                    .with_context(|| {
                        format!("failed to bind fastlist listener on {}", port.listen_addr())
                    })?,
                )
                .with_fastlist_expiry(
                    FastlistExpiryJob::new(port.clone())
                        .with_interval(config.fastlist.expire_interval_secs),
                )
                .with_fastlist_persist(
                    FastlistPersistJob::new(port.clone())
                        .with_interval(config.fastlist.persist_interval_secs),
                ),
            None => runner.with_autoreload(
                AutoreloadJob::new(handle.dataset.clone())
                    .with_interval(config.reload.check_interval_secs),
            ),
        };
    }
    runner.start().await;

    for zone in zones.lookup.zones() {
        info!(zone = zone.name(), datasets = zone.datasets().len(), "Serving zone");
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    shutdown.cancel();

    let datasets = zones.registry.datasets;
    tokio::task::spawn_blocking(move || {
        for handle in &datasets {
            handle.dataset.shutdown();
        }
    })
    .await?;

    info!("Shutdown complete");
    Ok(())
}
