use anyhow::Context;
use rbldns_application::ports::Dataset;
use rbldns_application::services::LookupService;
use rbldns_domain::Config;
use rbldns_infrastructure::{DatasetFactory, ZoneRegistry};
use tracing::info;

pub struct LoadedZones {
    pub registry: ZoneRegistry,
    pub lookup: LookupService,
}

pub fn build_registry(config: &Config) -> anyhow::Result<ZoneRegistry> {
    let factory = DatasetFactory::new(config.fastlist.clone());
    factory
        .build_zones(&config.zones)
        .context("Failed to build zones")
}

/// Builds every zone and performs the initial load of each dataset.
///
/// A dataset that cannot be loaded at startup is fatal.
pub fn load_zones(config: &Config) -> anyhow::Result<LoadedZones> {
    let registry = build_registry(config)?;

    for handle in &registry.datasets {
        let dataset = &handle.dataset;
        dataset
            .reload()
            .with_context(|| format!("Initial load of {} failed", dataset.source()))?;
    }

    info!(
        zones = registry.zones.len(),
        datasets = registry.datasets.len(),
        "All datasets loaded"
    );

    let lookup = LookupService::new(registry.zones.clone());
    Ok(LoadedZones { registry, lookup })
}
