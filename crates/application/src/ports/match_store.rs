use rbldns_domain::{DomainError, Record, ReloadScope};
use std::sync::Arc;

/// Normalised query key handed to a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey<'a> {
    /// Host-order IPv4 address, already un-reversed.
    Ipv4(u32),
    /// Case-folded domain label.
    Name(&'a str),
}

/// A finished, read-only record store. Never mutated once published.
pub trait MatchStore: Send + Sync {
    /// Returns the matching record, or `None` on a miss or an exclusion hit.
    fn lookup(&self, key: &LookupKey<'_>) -> Option<&Record>;
    fn count(&self) -> usize;
}

/// Mutable side of a store, filled by the zone-file parser during a reload.
pub trait MatchStoreBuilder: Send {
    /// Adds one entry. Range backends reject entries wider than `maxrange4`
    /// hosts with [`DomainError::MaxRangeExceeded`].
    fn insert(&mut self, key: &str, record: Record, maxrange4: Option<u64>)
        -> Result<(), DomainError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seals the builder. `scope` is the frozen scope of the same parse pass.
    fn finish(self: Box<Self>, scope: &ReloadScope) -> Arc<dyn MatchStore>;
}
