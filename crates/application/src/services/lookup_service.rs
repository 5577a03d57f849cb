use arc_swap::ArcSwap;
use rbldns_domain::{DomainError, LookupResult};
use std::sync::Arc;
use tracing::{debug, info};

use super::Zone;

/// Zones ordered by name length, longest first, so the first suffix hit is
/// the most specific one.
struct ZoneTable {
    zones: Vec<Arc<Zone>>,
}

impl ZoneTable {
    fn new(mut zones: Vec<Arc<Zone>>) -> Self {
        zones.sort_by(|a, b| b.name().len().cmp(&a.name().len()));
        Self { zones }
    }

    fn select<'q>(&self, query: &'q str) -> Option<(&Arc<Zone>, &'q str)> {
        self.zones.iter().find_map(|zone| {
            let name = zone.name();
            if query.len() == name.len() {
                return (query == name).then_some((zone, ""));
            }
            let head = query.strip_suffix(name)?;
            head.strip_suffix('.').map(|key| (zone, key))
        })
    }
}

/// Entry point for the protocol layer: full query name in, merged zone answer out.
///
/// The zone table is replaced wholesale; lookups in flight keep the table
/// they started with.
pub struct LookupService {
    table: ArcSwap<ZoneTable>,
}

impl LookupService {
    pub fn new(zones: Vec<Arc<Zone>>) -> Self {
        Self {
            table: ArcSwap::from_pointee(ZoneTable::new(zones)),
        }
    }

    pub fn replace_zones(&self, zones: Vec<Arc<Zone>>) {
        let count = zones.len();
        self.table.store(Arc::new(ZoneTable::new(zones)));
        info!(zones = count, "Zone table replaced");
    }

    pub fn zones(&self) -> Vec<Arc<Zone>> {
        self.table.load().zones.clone()
    }

    /// Resolves `query` against the most specific configured zone.
    ///
    /// Returns an empty result when no zone matches and
    /// [`DomainError::ZoneUnavailable`] when the matching zone has a dataset
    /// that is not loaded yet.
    pub fn lookup(&self, query: &str) -> Result<LookupResult, DomainError> {
        let query = query.strip_suffix('.').unwrap_or(query).to_ascii_lowercase();
        let table = self.table.load();

        let Some((zone, key)) = table.select(&query) else {
            debug!(query = %query, "No zone for query");
            return Ok(LookupResult::default());
        };

        if !zone.is_available() {
            return Err(DomainError::ZoneUnavailable(zone.name().to_string()));
        }

        Ok(zone.lookup(key))
    }
}
