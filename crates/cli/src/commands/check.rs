use anyhow::Context;
use futures::future::join_all;
use rbldns_application::ports::{Dataset, ReloadOutcome};
use rbldns_domain::{Config, DatasetStatus, ReloadStats};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::bootstrap::build_registry;

#[derive(Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
enum ReloadReport {
    Reloaded { stats: ReloadStats },
    Skipped,
    Failed { error: String },
}

#[derive(Serialize)]
struct DatasetReport {
    source: Arc<str>,
    #[serde(flatten)]
    reload: ReloadReport,
}

#[derive(Serialize)]
struct ZoneReport {
    zone: String,
    available: bool,
    datasets: Vec<DatasetReport>,
}

#[derive(Serialize)]
struct CheckReport {
    zones: Vec<ZoneReport>,
    status: Vec<DatasetStatus>,
}

/// Reloads every zone once and prints a JSON report. Returns false if any dataset failed.
pub async fn check(config: &Config) -> anyhow::Result<bool> {
    let registry = build_registry(config)?;

    let reloads = registry.zones.iter().map(|zone| {
        let zone = Arc::clone(zone);
        tokio::task::spawn_blocking(move || {
            let outcomes = zone.reload_all();
            ZoneReport {
                zone: zone.name().to_string(),
                available: zone.is_available(),
                datasets: outcomes
                    .into_iter()
                    .map(|(source, outcome)| DatasetReport {
                        source,
                        reload: match outcome {
                            Ok(ReloadOutcome::Reloaded(stats)) => ReloadReport::Reloaded { stats },
                            Ok(ReloadOutcome::Skipped) => ReloadReport::Skipped,
                            Err(e) => ReloadReport::Failed {
                                error: e.to_string(),
                            },
                        },
                    })
                    .collect(),
            }
        })
    });

    let mut zones = Vec::with_capacity(registry.zones.len());
    for report in join_all(reloads).await {
        zones.push(report.context("Zone reload task panicked")?);
    }

    let healthy = zones
        .iter()
        .flat_map(|z| &z.datasets)
        .all(|d| !matches!(d.reload, ReloadReport::Failed { .. }));

    let report = CheckReport {
        zones,
        status: registry.datasets.iter().map(|h| h.dataset.status()).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    info!(healthy, "Check finished");
    Ok(healthy)
}
