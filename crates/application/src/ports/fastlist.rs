use rbldns_domain::DomainError;
use std::net::SocketAddr;

/// Network-fed side of a fastlist dataset, driven by the fastlist workers.
pub trait FastlistPort: Send + Sync {
    fn listen_addr(&self) -> SocketAddr;

    /// Applies one datagram. Errors mean the datagram was discarded.
    fn handle_datagram(&self, payload: &[u8], peer: SocketAddr) -> Result<(), DomainError>;

    /// Removes every entry expired at `now_secs`; returns how many went.
    fn expire(&self, now_secs: u64) -> usize;

    /// Writes a snapshot of the current map; returns the number of entries written.
    fn persist(&self) -> Result<usize, DomainError>;
}
