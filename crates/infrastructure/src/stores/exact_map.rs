use compact_str::CompactString;
use rbldns_application::ports::{LookupKey, MatchStore, MatchStoreBuilder};
use rbldns_domain::{DomainError, Record, ReloadScope};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Case-folded domain names, exact match only.
pub struct ExactMap {
    names: FxHashMap<CompactString, Record>,
}

impl ExactMap {
    pub fn from_map(names: FxHashMap<CompactString, Record>) -> Self {
        Self { names }
    }
}

impl MatchStore for ExactMap {
    #[inline]
    fn lookup(&self, key: &LookupKey<'_>) -> Option<&Record> {
        let LookupKey::Name(name) = key else {
            return None;
        };
        self.names.get(*name).filter(|rec| !rec.excluded)
    }

    fn count(&self) -> usize {
        self.names.len()
    }
}

#[derive(Default)]
pub struct ExactMapBuilder {
    names: FxHashMap<CompactString, Record>,
}

impl ExactMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStoreBuilder for ExactMapBuilder {
    fn insert(
        &mut self,
        key: &str,
        record: Record,
        _maxrange4: Option<u64>,
    ) -> Result<(), DomainError> {
        let name = key.trim_end_matches('.');
        if name.is_empty() {
            return Err(DomainError::InvalidRecordLine(key.to_string()));
        }
        self.names
            .insert(CompactString::from(name.to_ascii_lowercase()), record);
        Ok(())
    }

    fn len(&self) -> usize {
        self.names.len()
    }

    fn finish(self: Box<Self>, _scope: &ReloadScope) -> Arc<dyn MatchStore> {
        let Self { mut names } = *self;
        names.shrink_to_fit();
        Arc::new(ExactMap::from_map(names))
    }
}
