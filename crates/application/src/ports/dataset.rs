use rbldns_domain::{
    Answer, DatasetKind, DatasetStatus, DomainError, NameServers, ReloadStats, Soa,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Reloaded(ReloadStats),
    /// Another reload held the lock; this trigger was dropped.
    Skipped,
}

/// One data source with its own store and reload lifecycle.
///
/// `lookup` must be callable concurrently with `reload` and only ever see a
/// fully published store.
pub trait Dataset: Send + Sync {
    fn source(&self) -> &str;
    fn kind(&self) -> DatasetKind;

    /// `query` is the label left of the zone name: a reversed IPv4 address or a domain.
    fn lookup(&self, query: &str) -> Option<Answer>;

    fn soa(&self) -> Option<Soa>;
    fn ns(&self) -> Option<NameServers>;

    fn is_available(&self) -> bool;
    fn is_reloading(&self) -> bool;

    fn reload(&self) -> Result<ReloadOutcome, DomainError>;

    /// Whether the source changed since the last reload started.
    fn has_changed(&self) -> bool;

    fn status(&self) -> DatasetStatus;

    fn shutdown(&self);
    fn is_shut_down(&self) -> bool;
}
