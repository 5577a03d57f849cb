use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid IPv4 address: {0}")]
    InvalidAddress(String),

    #[error("Invalid IPv4 range: {0}")]
    InvalidRange(String),

    #[error("Invalid record line: {0}")]
    InvalidRecordLine(String),

    #[error("Invalid directive: {0}")]
    InvalidDirective(String),

    #[error("Invalid time value: {0}")]
    InvalidTimeValue(String),

    #[error("Range {entry} covers {hosts} hosts, MAXRANGE4 allows {limit}")]
    MaxRangeExceeded { entry: String, hosts: u64, limit: u64 },

    #[error("Unknown dataset type: {0}")]
    UnknownDatasetType(String),

    #[error("Dataset backend not available: {0}")]
    BackendUnavailable(String),

    #[error("Dataset source does not exist: {0}")]
    SourceMissing(String),

    #[error("Failed to read dataset source {source_id}: {reason}")]
    SourceRead { source_id: String, reason: String },

    #[error("Zone {0} unavailable")]
    ZoneUnavailable(String),

    #[error("Invalid fastlist datagram: {0}")]
    InvalidDatagram(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
