use rbldns_application::ports::{LookupKey, MatchStore, MatchStoreBuilder};
use rbldns_domain::{DomainError, Record, ReloadScope};
use rustc_hash::FxHashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Plain set of single addresses. Every member answers with the same
/// dataset-wide record taken from the scope defaults.
pub struct ExactSet {
    addrs: FxHashSet<u32>,
    record: Record,
}

impl MatchStore for ExactSet {
    #[inline]
    fn lookup(&self, key: &LookupKey<'_>) -> Option<&Record> {
        match key {
            LookupKey::Ipv4(addr) if self.addrs.contains(addr) => Some(&self.record),
            _ => None,
        }
    }

    fn count(&self) -> usize {
        self.addrs.len()
    }
}

#[derive(Default)]
pub struct ExactSetBuilder {
    addrs: FxHashSet<u32>,
}

impl ExactSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStoreBuilder for ExactSetBuilder {
    fn insert(
        &mut self,
        key: &str,
        record: Record,
        _maxrange4: Option<u64>,
    ) -> Result<(), DomainError> {
        if record.excluded {
            return Err(DomainError::InvalidRecordLine(format!(
                "exclusions are not supported in ip4tset: !{key}"
            )));
        }
        let addr: Ipv4Addr = key
            .parse()
            .map_err(|_| DomainError::InvalidAddress(key.to_string()))?;
        self.addrs.insert(u32::from(addr));
        Ok(())
    }

    fn len(&self) -> usize {
        self.addrs.len()
    }

    fn finish(self: Box<Self>, scope: &ReloadScope) -> Arc<dyn MatchStore> {
        let record = Record::new(scope.default_a().clone())
            .with_txt(scope.default_txt().cloned())
            .with_ttl(scope.ttl());
        let Self { addrs } = *self;
        Arc::new(ExactSet { addrs, record })
    }
}
