use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use compact_str::CompactString;
use rbldns_application::ports::{Dataset, FastlistPort, ReloadOutcome};
use rbldns_domain::config::FastlistConfig;
use rbldns_domain::{
    expand_txt, Answer, DatasetKind, DatasetStatus, DomainError, NameServers, Record,
    ReloadScope, ReloadStats, Soa,
};
use rustc_hash::FxHashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::datagram::{parse_datagram, FastlistCommand, FastlistDefaults};
use super::snapshot::{load_snapshot, write_snapshot, SnapshotEntry};
use crate::dataset::clock::now_secs;

type NameMap = FxHashMap<CompactString, Record>;

/// Name map fed by UDP datagrams instead of a zone file.
///
/// Every access, lookups included, goes through the one map mutex; entries
/// are replaced in place, so there is no published snapshot to read from.
pub struct FastlistDataset {
    source: Arc<str>,
    listen_addr: SocketAddr,
    snapshot_path: PathBuf,
    defaults: FastlistDefaults,
    scope: ReloadScope,
    map: Mutex<NameMap>,
    started: AtomicBool,
    available: AtomicBool,
    shut_down: AtomicBool,
    active_since: ArcSwapOption<DateTime<Utc>>,
    last_stats: ArcSwapOption<ReloadStats>,
}

impl FastlistDataset {
    /// `source` is `address/port`, e.g. `127.0.0.1/8053`.
    pub fn new(source: &str, snapshot_dir: &Path) -> Result<Self, DomainError> {
        let listen_addr = parse_listen_source(source)?;
        let snapshot_path = snapshot_dir.join(format!("fastlist-{}.snapshot", listen_addr.port()));

        info!(source, snapshot = %snapshot_path.display(), "Initializing fastlist dataset");

        Ok(Self {
            source: Arc::from(source),
            listen_addr,
            snapshot_path,
            defaults: FastlistDefaults::default(),
            scope: ReloadScope::default(),
            map: Mutex::new(NameMap::default()),
            started: AtomicBool::new(false),
            available: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
            active_since: ArcSwapOption::empty(),
            last_stats: ArcSwapOption::empty(),
        })
    }

    /// Picks up the per-port overrides for this dataset's listen port.
    pub fn apply_config(&mut self, config: &FastlistConfig) {
        if let Some(port) = config.port_overrides(self.listen_addr.port()) {
            self.defaults.apply(port);
            debug!(source = %self.source, defaults = ?self.defaults, "Fastlist defaults applied");
        }
    }

    pub fn defaults(&self) -> &FastlistDefaults {
        &self.defaults
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    fn map(&self) -> MutexGuard<'_, NameMap> {
        // every critical section leaves the map consistent
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records stats for a mutation; callers hold the map guard so the
    /// stored `(count, delta)` follows the order of map states.
    fn touch(&self, count: usize, delta: i64) {
        let stats = ReloadStats {
            duration: Duration::ZERO,
            count,
            delta,
        };
        self.last_stats.store(Some(Arc::new(stats)));
        self.active_since.store(Some(Arc::new(Utc::now())));
    }

    /// Inserts or replaces `name`.
    pub fn apply(&self, name: &str, record: Record) {
        let name = CompactString::from(name.trim_end_matches('.').to_ascii_lowercase());
        let mut map = self.map();
        let added = map.insert(name, record).is_none();
        self.touch(map.len(), i64::from(added));
    }

    /// Removes `name`; returns false (and warns) when it was not listed.
    pub fn remove(&self, name: &str) -> bool {
        let name = name.trim_end_matches('.').to_ascii_lowercase();
        let removed = {
            let mut map = self.map();
            let removed = map.remove(name.as_str()).is_some();
            if removed {
                self.touch(map.len(), -1);
            }
            removed
        };

        if removed {
            info!(source = %self.source, name = %name, "De-listed");
        } else {
            warn!(source = %self.source, name = %name, "De-listing failed: not found");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.map().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn restore(&self) {
        match load_snapshot(&self.snapshot_path) {
            Ok(Some(entries)) => {
                let count = entries.len();
                *self.map() = entries.into_iter().collect();
                info!(source = %self.source, count, "Fastlist restored from snapshot");
            }
            Ok(None) => {
                info!(source = %self.source, "No fastlist snapshot found, starting empty");
            }
            Err(e) => {
                error!(
                    source = %self.source,
                    path = %self.snapshot_path.display(),
                    error = %e,
                    "Failed to load fastlist snapshot, starting empty"
                );
            }
        }
    }
}

fn parse_listen_source(source: &str) -> Result<SocketAddr, DomainError> {
    let invalid = || DomainError::InvalidAddress(format!("fastlist source {source}"));
    let (ip, port) = source.rsplit_once('/').ok_or_else(invalid)?;
    let ip = ip.parse().map_err(|_| invalid())?;
    let port = port.parse().map_err(|_| invalid())?;
    Ok(SocketAddr::new(ip, port))
}

impl Dataset for FastlistDataset {
    fn source(&self) -> &str {
        &self.source
    }

    fn kind(&self) -> DatasetKind {
        DatasetKind::Fastlist
    }

    fn lookup(&self, query: &str) -> Option<Answer> {
        let name = query.trim_end_matches('.').to_ascii_lowercase();
        let map = self.map();
        let record = map.get(name.as_str()).filter(|r| !r.excluded)?;
        Some(Answer {
            a: record.a.clone(),
            txt: expand_txt(record.txt.as_deref(), &name, &self.scope),
            ttl: record.ttl,
        })
    }

    fn soa(&self) -> Option<Soa> {
        None
    }

    fn ns(&self) -> Option<NameServers> {
        None
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    fn is_reloading(&self) -> bool {
        false
    }

    /// The first call restores the snapshot and marks the dataset ready;
    /// later calls have nothing to reload.
    fn reload(&self) -> Result<ReloadOutcome, DomainError> {
        if self.started.swap(true, Ordering::AcqRel) {
            debug!(source = %self.source, "Fastlist already started");
            return Ok(ReloadOutcome::Skipped);
        }

        let started = Instant::now();
        self.restore();
        let count = self.len();
        let stats = ReloadStats::new(started.elapsed(), count, 0);
        self.last_stats.store(Some(Arc::new(stats)));
        self.active_since.store(Some(Arc::new(Utc::now())));
        self.available.store(true, Ordering::Release);

        info!(source = %self.source, count, "Fastlist dataset ready");
        Ok(ReloadOutcome::Reloaded(stats))
    }

    fn has_changed(&self) -> bool {
        false
    }

    fn status(&self) -> DatasetStatus {
        DatasetStatus {
            source: self.source.clone(),
            kind: DatasetKind::Fastlist,
            available: self.is_available(),
            reloading: false,
            record_count: self.len(),
            active_since: self.active_since.load_full().map(|t| *t),
            last_reload: self.last_stats.load_full().map(|s| *s),
        }
    }

    fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Err(e) = self.persist() {
            error!(source = %self.source, error = %e, "Final fastlist save failed");
        }
    }

    fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }
}

impl FastlistPort for FastlistDataset {
    fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
    }

    fn handle_datagram(&self, payload: &[u8], peer: SocketAddr) -> Result<(), DomainError> {
        debug!(source = %self.source, peer = %peer, bytes = payload.len(), "Fastlist datagram");

        match parse_datagram(payload, &self.defaults, now_secs())? {
            FastlistCommand::Add { name, record } => {
                info!(source = %self.source, name = %name, peer = %peer, "Fastlisted");
                self.apply(&name, record);
            }
            FastlistCommand::Delete { name } => {
                self.remove(&name);
            }
        }
        Ok(())
    }

    fn expire(&self, now_secs: u64) -> usize {
        let (removed, count) = {
            let mut map = self.map();
            let before = map.len();
            map.retain(|_, record| !record.is_expired(now_secs));
            let removed = before - map.len();
            if removed > 0 {
                self.touch(map.len(), -(removed as i64));
            }
            (removed, map.len())
        };

        if removed > 0 {
            info!(source = %self.source, removed, count, "Expired fastlist entries");
        }
        removed
    }

    fn persist(&self) -> Result<usize, DomainError> {
        if !self.started.load(Ordering::Acquire) {
            // never overwrite a snapshot that has not been restored yet
            return Ok(0);
        }
        let entries: Vec<SnapshotEntry> = self
            .map()
            .iter()
            .map(|(name, record)| (name.clone(), record.clone()))
            .collect();

        write_snapshot(&self.snapshot_path, &entries)?;
        debug!(
            source = %self.source,
            path = %self.snapshot_path.display(),
            count = entries.len(),
            "Fastlist snapshot saved"
        );
        Ok(entries.len())
    }
}
