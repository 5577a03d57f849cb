use crate::record::Answer;
use crate::reload_scope::Soa;
use serde::Serialize;
use std::sync::Arc;

/// Merged answer of a zone for one query. Built per query, never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    pub soa: Option<Soa>,
    pub soa_ttl: Option<u32>,
    pub ns: Vec<Arc<str>>,
    pub ns_ttl: Option<u32>,
    /// One entry per member dataset, in zone order; `None` where the dataset had no match.
    pub results: Vec<Option<Answer>>,
}

impl LookupResult {
    /// True when nothing at all was produced (no zone matched the query).
    pub fn is_empty(&self) -> bool {
        self.soa.is_none() && self.ns.is_empty() && self.results.is_empty()
    }

    /// First positive answer across the member datasets.
    pub fn first_answer(&self) -> Option<&Answer> {
        self.results.iter().flatten().next()
    }

    pub fn is_listed(&self) -> bool {
        self.first_answer().is_some()
    }
}
