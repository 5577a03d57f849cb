#![allow(dead_code)]

use rbldns_application::ports::{Dataset, FastlistPort, ReloadOutcome};
use rbldns_domain::{
    Answer, DatasetKind, DatasetStatus, DomainError, NameServers, ReloadStats, Soa,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Dataset whose source "changes" whenever the test says so.
pub struct MockReloadable {
    changed: AtomicBool,
    fail_reload: AtomicBool,
    shut_down: AtomicBool,
    reloads: AtomicUsize,
    change_checks: AtomicUsize,
}

impl MockReloadable {
    pub fn new() -> Self {
        Self {
            changed: AtomicBool::new(false),
            fail_reload: AtomicBool::new(false),
            shut_down: AtomicBool::new(false),
            reloads: AtomicUsize::new(0),
            change_checks: AtomicUsize::new(0),
        }
    }

    pub fn touch(&self) {
        self.changed.store(true, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.fail_reload.store(fail, Ordering::SeqCst);
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    pub fn change_checks(&self) -> usize {
        self.change_checks.load(Ordering::SeqCst)
    }
}

impl Dataset for MockReloadable {
    fn source(&self) -> &str {
        "mock.rbldns"
    }

    fn kind(&self) -> DatasetKind {
        DatasetKind::IntervalIndex
    }

    fn lookup(&self, _query: &str) -> Option<Answer> {
        None
    }

    fn soa(&self) -> Option<Soa> {
        None
    }

    fn ns(&self) -> Option<NameServers> {
        None
    }

    fn is_available(&self) -> bool {
        true
    }

    fn is_reloading(&self) -> bool {
        false
    }

    fn reload(&self) -> Result<ReloadOutcome, DomainError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        self.changed.store(false, Ordering::SeqCst);
        if self.fail_reload.load(Ordering::SeqCst) {
            return Err(DomainError::SourceRead {
                source_id: "mock.rbldns".to_string(),
                reason: "mock failure".to_string(),
            });
        }
        Ok(ReloadOutcome::Reloaded(ReloadStats::new(
            Duration::ZERO,
            1,
            1,
        )))
    }

    fn has_changed(&self) -> bool {
        self.change_checks.fetch_add(1, Ordering::SeqCst);
        self.changed.load(Ordering::SeqCst)
    }

    fn status(&self) -> DatasetStatus {
        DatasetStatus {
            source: Arc::from("mock.rbldns"),
            kind: DatasetKind::IntervalIndex,
            available: true,
            reloading: false,
            record_count: 1,
            active_since: None,
            last_reload: None,
        }
    }

    fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
    }

    fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }
}

/// Records every call the fastlist workers make.
pub struct MockFastlistPort {
    listen_addr: SocketAddr,
    datagrams: Mutex<Vec<(Vec<u8>, SocketAddr)>>,
    expire_calls: AtomicUsize,
    last_expire_now: AtomicU64,
    persist_calls: AtomicUsize,
    fail_persist: AtomicBool,
}

impl MockFastlistPort {
    pub fn new(listen_addr: &str) -> Self {
        Self {
            listen_addr: listen_addr.parse().unwrap(),
            datagrams: Mutex::new(Vec::new()),
            expire_calls: AtomicUsize::new(0),
            last_expire_now: AtomicU64::new(0),
            persist_calls: AtomicUsize::new(0),
            fail_persist: AtomicBool::new(false),
        }
    }

    pub fn datagrams(&self) -> Vec<Vec<u8>> {
        self.datagrams
            .lock()
            .unwrap()
            .iter()
            .map(|(payload, _)| payload.clone())
            .collect()
    }

    pub fn expire_calls(&self) -> usize {
        self.expire_calls.load(Ordering::SeqCst)
    }

    pub fn last_expire_now(&self) -> u64 {
        self.last_expire_now.load(Ordering::SeqCst)
    }

    pub fn persist_calls(&self) -> usize {
        self.persist_calls.load(Ordering::SeqCst)
    }

    pub fn set_should_fail_persist(&self, fail: bool) {
        self.fail_persist.store(fail, Ordering::SeqCst);
    }
}

impl FastlistPort for MockFastlistPort {
    fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
    }

    fn handle_datagram(&self, payload: &[u8], peer: SocketAddr) -> Result<(), DomainError> {
        if payload.starts_with(b"bad") {
            return Err(DomainError::InvalidDatagram("mock rejection".to_string()));
        }
        self.datagrams
            .lock()
            .unwrap()
            .push((payload.to_vec(), peer));
        Ok(())
    }

    fn expire(&self, now_secs: u64) -> usize {
        self.expire_calls.fetch_add(1, Ordering::SeqCst);
        self.last_expire_now.store(now_secs, Ordering::SeqCst);
        0
    }

    fn persist(&self) -> Result<usize, DomainError> {
        self.persist_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_persist.load(Ordering::SeqCst) {
            return Err(DomainError::IoError("mock persist failure".to_string()));
        }
        Ok(0)
    }
}
