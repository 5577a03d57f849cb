mod dataset;
mod fastlist;
mod match_store;

pub use dataset::{Dataset, ReloadOutcome};
pub use fastlist::FastlistPort;
pub use match_store::{LookupKey, MatchStore, MatchStoreBuilder};

// Re-export for convenience
pub use rbldns_domain::{Answer, Record};
