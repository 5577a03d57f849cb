use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use rbldns_application::ports::{Dataset, LookupKey, MatchStore, ReloadOutcome};
use rbldns_domain::{
    expand_txt, unreverse_ipv4, Answer, DatasetKind, DatasetStatus, DomainError, NameServers,
    ReloadScope, ReloadStats, Soa,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::clock::{now_micros, unix_micros};
use crate::stores::new_builder;
use crate::zonefile::{ParsedZone, ZoneFileParser};

/// Store and scope from the same parse pass, always swapped together.
struct Published {
    store: Arc<dyn MatchStore>,
    scope: Arc<ReloadScope>,
}

/// A dataset rebuilt from a zone file on every reload.
///
/// Lookups read the published pair through an `ArcSwap` and never wait on a
/// reload; reloads build into a fresh store and swap it in at the end.
pub struct FileDataset {
    source: Arc<str>,
    path: PathBuf,
    kind: DatasetKind,
    published: ArcSwapOption<Published>,
    reload_lock: Mutex<()>,
    available: AtomicBool,
    reloading: AtomicBool,
    shut_down: AtomicBool,
    last_reload_micros: AtomicU64,
    active_since: ArcSwapOption<DateTime<Utc>>,
    last_stats: ArcSwapOption<ReloadStats>,
}

impl FileDataset {
    /// Fails when the backend for `kind` is unavailable or the file does not exist.
    pub fn new(kind: DatasetKind, path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();
        // surfaces BackendUnavailable at construction rather than first reload
        new_builder(kind)?;

        if !path.is_file() {
            return Err(DomainError::SourceMissing(path.display().to_string()));
        }

        Ok(Self {
            source: Arc::from(path.display().to_string()),
            path,
            kind,
            published: ArcSwapOption::empty(),
            reload_lock: Mutex::new(()),
            available: AtomicBool::new(false),
            reloading: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
            last_reload_micros: AtomicU64::new(0),
            active_since: ArcSwapOption::empty(),
            last_stats: ArcSwapOption::empty(),
        })
    }

    fn record_count(&self) -> usize {
        self.published
            .load()
            .as_ref()
            .map_or(0, |p| p.store.count())
    }

    fn parse_source(&self) -> Result<ParsedZone, DomainError> {
        let read_error = |e: std::io::Error| DomainError::SourceRead {
            source_id: self.source.to_string(),
            reason: e.to_string(),
        };

        let file = File::open(&self.path).map_err(read_error)?;
        let mtime = file
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .map(|t| unix_micros(t) / 1_000_000);

        ZoneFileParser::new(&self.source, new_builder(self.kind)?)
            .parse_reader(BufReader::new(file), mtime)
    }

    fn answer(&self, published: &Published, query: &str) -> Option<Answer> {
        let (record, token) = if self.kind.is_ip4() {
            let addr = unreverse_ipv4(query)?;
            let record = published.store.lookup(&LookupKey::Ipv4(u32::from(addr)))?;
            (record, addr.to_string())
        } else {
            let name = query.trim_end_matches('.').to_ascii_lowercase();
            let record = published.store.lookup(&LookupKey::Name(&name))?;
            (record, name)
        };

        Some(Answer {
            a: record.a.clone(),
            txt: expand_txt(record.txt.as_deref(), &token, &published.scope),
            ttl: record.ttl,
        })
    }
}

impl Dataset for FileDataset {
    fn source(&self) -> &str {
        &self.source
    }

    fn kind(&self) -> DatasetKind {
        self.kind
    }

    fn lookup(&self, query: &str) -> Option<Answer> {
        let guard = self.published.load();
        let published = guard.as_ref()?;
        self.answer(published, query)
    }

    fn soa(&self) -> Option<Soa> {
        self.published
            .load()
            .as_ref()
            .and_then(|p| p.scope.soa().cloned())
    }

    fn ns(&self) -> Option<NameServers> {
        self.published
            .load()
            .as_ref()
            .and_then(|p| p.scope.ns().cloned())
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    fn is_reloading(&self) -> bool {
        self.reloading.load(Ordering::Acquire)
    }

    fn reload(&self) -> Result<ReloadOutcome, DomainError> {
        let Ok(_guard) = self.reload_lock.try_lock() else {
            warn!(source = %self.source, "Dataset is already being reloaded, skipping");
            return Ok(ReloadOutcome::Skipped);
        };

        let started = Instant::now();
        let previous = self.record_count();
        self.reloading.store(true, Ordering::Release);
        self.last_reload_micros.store(now_micros(), Ordering::Release);

        let parsed = self.parse_source();
        self.reloading.store(false, Ordering::Release);
        let parsed = parsed?;

        let count = parsed.store.count();
        self.published.store(Some(Arc::new(Published {
            store: parsed.store,
            scope: parsed.scope,
        })));
        self.available.store(true, Ordering::Release);
        self.active_since.store(Some(Arc::new(Utc::now())));

        let stats = ReloadStats::new(started.elapsed(), count, previous);
        self.last_stats.store(Some(Arc::new(stats)));

        info!(
            source = %self.source,
            kind = %self.kind,
            count,
            delta = stats.delta,
            rejected = parsed.rejected,
            duration_ms = stats.duration.as_millis() as u64,
            "Dataset reloaded"
        );
        Ok(ReloadOutcome::Reloaded(stats))
    }

    fn has_changed(&self) -> bool {
        match std::fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => unix_micros(modified) > self.last_reload_micros.load(Ordering::Acquire),
            Err(e) => {
                debug!(source = %self.source, error = %e, "Cannot stat dataset source");
                false
            }
        }
    }

    fn status(&self) -> DatasetStatus {
        DatasetStatus {
            source: self.source.clone(),
            kind: self.kind,
            available: self.is_available(),
            reloading: self.is_reloading(),
            record_count: self.record_count(),
            active_since: self.active_since.load_full().map(|t| *t),
            last_reload: self.last_stats.load_full().map(|s| *s),
        }
    }

    fn shutdown(&self) {
        self.shut_down.store(true, Ordering::Release);
    }

    fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }
}
