use rbldns_domain::{DomainError, LookupResult};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::ports::{Dataset, ReloadOutcome};

/// A DNS zone backed by an ordered list of datasets.
///
/// Datasets are shared references; the zone never drives their lifecycle
/// beyond [`Zone::reload_all`].
pub struct Zone {
    name: Arc<str>,
    datasets: Vec<Arc<dyn Dataset>>,
}

impl Zone {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name.trim_end_matches('.').to_ascii_lowercase()),
            datasets: Vec::new(),
        }
    }

    pub fn with_dataset(mut self, dataset: Arc<dyn Dataset>) -> Self {
        self.datasets.push(dataset);
        self
    }

    pub fn add_dataset(&mut self, dataset: Arc<dyn Dataset>) {
        self.datasets.push(dataset);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn datasets(&self) -> &[Arc<dyn Dataset>] {
        &self.datasets
    }

    /// Merges SOA, NS and per-dataset answers for `key`, the part of the
    /// query left of the zone name. An empty key is the zone apex.
    pub fn lookup(&self, key: &str) -> LookupResult {
        let mut result = LookupResult::default();
        let mut ns_seen = false;

        for dataset in &self.datasets {
            if result.soa.is_none() {
                if let Some(soa) = dataset.soa() {
                    result.soa_ttl = Some(soa.ttl);
                    result.soa = Some(soa);
                }
            }

            if !ns_seen {
                if let Some(ns) = dataset.ns() {
                    ns_seen = true;
                    if ns.ttl != 0 {
                        result.ns_ttl = Some(ns.ttl);
                    }
                    result.ns = ns.hosts;
                }
            }

            if !key.is_empty() {
                result.results.push(dataset.lookup(key));
            }
        }

        debug!(
            zone = %self.name,
            key,
            listed = result.is_listed(),
            "Zone lookup"
        );
        result
    }

    pub fn is_available(&self) -> bool {
        self.datasets.iter().all(|d| d.is_available())
    }

    pub fn is_reloading(&self) -> bool {
        self.datasets.iter().any(|d| d.is_reloading())
    }

    /// Reloads every member dataset in order. One failure does not stop the others.
    pub fn reload_all(&self) -> Vec<(Arc<str>, Result<ReloadOutcome, DomainError>)> {
        self.datasets
            .iter()
            .map(|dataset| {
                let outcome = dataset.reload();
                if let Err(e) = &outcome {
                    warn!(zone = %self.name, source = dataset.source(), error = %e, "Reload failed");
                }
                (Arc::from(dataset.source()), outcome)
            })
            .collect()
    }
}
