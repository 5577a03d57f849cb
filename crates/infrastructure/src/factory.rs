use rbldns_application::ports::{Dataset, FastlistPort};
use rbldns_application::services::Zone;
use rbldns_domain::config::{FastlistConfig, ZoneConfig};
use rbldns_domain::{DatasetKind, DomainError};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{error, info};

use crate::dataset::{FastlistDataset, FileDataset};

/// A constructed dataset plus its fastlist side, if it has one.
#[derive(Clone)]
pub struct DatasetHandle {
    pub dataset: Arc<dyn Dataset>,
    pub fastlist: Option<Arc<dyn FastlistPort>>,
}

/// Every zone and every distinct dataset built from one configuration.
#[derive(Default)]
pub struct ZoneRegistry {
    pub zones: Vec<Arc<Zone>>,
    pub datasets: Vec<DatasetHandle>,
}

impl ZoneRegistry {
    pub fn fastlists(&self) -> impl Iterator<Item = &Arc<dyn FastlistPort>> {
        self.datasets.iter().filter_map(|h| h.fastlist.as_ref())
    }
}

/// Maps configured type names onto concrete datasets.
pub struct DatasetFactory {
    fastlist: FastlistConfig,
}

impl DatasetFactory {
    pub fn new(fastlist: FastlistConfig) -> Self {
        Self { fastlist }
    }

    pub fn create(&self, kind: &str, source: &str) -> Result<DatasetHandle, DomainError> {
        let kind: DatasetKind = kind.parse()?;
        if kind.is_file_backed() {
            return Ok(DatasetHandle {
                dataset: Arc::new(FileDataset::new(kind, source)?),
                fastlist: None,
            });
        }

        let mut dataset = FastlistDataset::new(source, &self.fastlist.snapshot_dir())?;
        dataset.apply_config(&self.fastlist);
        let dataset = Arc::new(dataset);
        Ok(DatasetHandle {
            dataset: dataset.clone(),
            fastlist: Some(dataset),
        })
    }

    /// Builds all zones, sharing datasets that name the same source.
    ///
    /// Unknown dataset types are logged and left out; any other construction
    /// error aborts, since a zone must not start with a dataset it cannot read.
    pub fn build_zones(&self, configs: &[ZoneConfig]) -> Result<ZoneRegistry, DomainError> {
        let mut registry = ZoneRegistry::default();
        let mut by_source: FxHashMap<(String, String), usize> = FxHashMap::default();

        for config in configs {
            let mut zone = Zone::new(&config.name);

            for ds in &config.datasets {
                let key = (ds.kind.to_ascii_lowercase(), ds.source.clone());
                let handle = match by_source.get(&key) {
                    Some(&idx) => registry.datasets[idx].clone(),
                    None => match self.create(&ds.kind, &ds.source) {
                        Ok(handle) => {
                            by_source.insert(key, registry.datasets.len());
                            registry.datasets.push(handle.clone());
                            handle
                        }
                        Err(e @ DomainError::UnknownDatasetType(_)) => {
                            error!(zone = %config.name, source = %ds.source, error = %e, "Skipping dataset");
                            continue;
                        }
                        Err(e) => return Err(e),
                    },
                };
                zone.add_dataset(handle.dataset);
            }

            info!(zone = zone.name(), datasets = zone.datasets().len(), "Zone configured");
            registry.zones.push(Arc::new(zone));
        }

        Ok(registry)
    }
}
