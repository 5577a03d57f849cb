#![allow(dead_code)]

use rbldns_application::ports::{Dataset, ReloadOutcome};
use rbldns_domain::{
    Answer, DatasetKind, DatasetStatus, DomainError, NameServers, ReloadStats, Soa,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub struct MockDataset {
    source: String,
    answers: Mutex<HashMap<String, Answer>>,
    soa: Option<Soa>,
    ns: Option<NameServers>,
    available: AtomicBool,
    reloading: AtomicBool,
    fail_reload: AtomicBool,
    reloads: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockDataset {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            answers: Mutex::new(HashMap::new()),
            soa: None,
            ns: None,
            available: AtomicBool::new(true),
            reloading: AtomicBool::new(false),
            fail_reload: AtomicBool::new(false),
            reloads: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_soa(mut self, line: &str) -> Self {
        self.soa = Some(Soa::parse(line).unwrap());
        self
    }

    pub fn with_ns(mut self, line: &str) -> Self {
        self.ns = Some(NameServers::parse(line).unwrap());
        self
    }

    pub fn with_answer(self, key: &str, a: &str, txt: Option<&str>) -> Self {
        self.answers.lock().unwrap().insert(
            key.to_string(),
            Answer {
                a: Arc::from(a),
                txt: txt.map(str::to_string),
                ttl: None,
            },
        );
        self
    }

    pub fn unavailable(self) -> Self {
        self.available.store(false, Ordering::SeqCst);
        self
    }

    pub fn failing_reload(self) -> Self {
        self.fail_reload.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_reloading(&self, reloading: bool) {
        self.reloading.store(reloading, Ordering::SeqCst);
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl Dataset for MockDataset {
    fn source(&self) -> &str {
        &self.source
    }

    fn kind(&self) -> DatasetKind {
        DatasetKind::ExactMap
    }

    fn lookup(&self, query: &str) -> Option<Answer> {
        self.queries.lock().unwrap().push(query.to_string());
        self.answers.lock().unwrap().get(query).cloned()
    }

    fn soa(&self) -> Option<Soa> {
        self.soa.clone()
    }

    fn ns(&self) -> Option<NameServers> {
        self.ns.clone()
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn is_reloading(&self) -> bool {
        self.reloading.load(Ordering::SeqCst)
    }

    fn reload(&self) -> Result<ReloadOutcome, DomainError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reload.load(Ordering::SeqCst) {
            return Err(DomainError::SourceMissing(self.source.clone()));
        }
        self.available.store(true, Ordering::SeqCst);
        let count = self.answers.lock().unwrap().len();
        Ok(ReloadOutcome::Reloaded(ReloadStats::new(
            Duration::from_millis(1),
            count,
            count,
        )))
    }

    fn has_changed(&self) -> bool {
        false
    }

    fn status(&self) -> DatasetStatus {
        DatasetStatus {
            source: Arc::from(self.source.as_str()),
            kind: self.kind(),
            available: self.is_available(),
            reloading: self.is_reloading(),
            record_count: self.answers.lock().unwrap().len(),
            active_since: None,
            last_reload: None,
        }
    }

    fn shutdown(&self) {}

    fn is_shut_down(&self) -> bool {
        false
    }
}
