//! Record store backends behind the `MatchStore` port.
//!
//! Each backend has a builder filled during a reload and a frozen store
//! that is published once the parse pass is over.
mod exact_map;
mod exact_set;
mod interval_index;
#[cfg(feature = "ip4trie")]
mod prefix_trie;

pub use exact_map::{ExactMap, ExactMapBuilder};
pub use exact_set::{ExactSet, ExactSetBuilder};
pub use interval_index::{IntervalIndex, IntervalIndexBuilder};
#[cfg(feature = "ip4trie")]
pub use prefix_trie::{PrefixTrie, PrefixTrieBuilder};

use rbldns_application::ports::MatchStoreBuilder;
use rbldns_domain::{DatasetKind, DomainError};

/// Returns a fresh, empty builder for the backend of `kind`.
///
/// Fails with [`DomainError::BackendUnavailable`] when the backend was not
/// compiled in, and for kinds that are not file-backed.
pub fn new_builder(kind: DatasetKind) -> Result<Box<dyn MatchStoreBuilder>, DomainError> {
    match kind {
        DatasetKind::ExactSet => Ok(Box::new(ExactSetBuilder::new())),
        DatasetKind::IntervalIndex => Ok(Box::new(IntervalIndexBuilder::new())),
        DatasetKind::ExactMap => Ok(Box::new(ExactMapBuilder::new())),
        DatasetKind::PrefixTrie => prefix_trie_builder(),
        DatasetKind::Fastlist => Err(DomainError::BackendUnavailable(format!(
            "{} has no file store",
            kind
        ))),
    }
}

#[cfg(feature = "ip4trie")]
fn prefix_trie_builder() -> Result<Box<dyn MatchStoreBuilder>, DomainError> {
    Ok(Box::new(PrefixTrieBuilder::new()))
}

#[cfg(not(feature = "ip4trie"))]
fn prefix_trie_builder() -> Result<Box<dyn MatchStoreBuilder>, DomainError> {
    Err(DomainError::BackendUnavailable(
        "ip4trie support not compiled in".to_string(),
    ))
}

fn check_maxrange(
    entry: &str,
    hosts: u64,
    maxrange4: Option<u64>,
) -> Result<(), DomainError> {
    match maxrange4 {
        Some(limit) if hosts > limit => Err(DomainError::MaxRangeExceeded {
            entry: entry.to_string(),
            hosts,
            limit,
        }),
        _ => Ok(()),
    }
}
