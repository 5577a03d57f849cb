mod datagram;
mod dataset;
mod snapshot;

pub use datagram::{parse_datagram, FastlistCommand, FastlistDefaults};
pub use dataset::FastlistDataset;
pub use snapshot::{decode_snapshot, encode_snapshot, load_snapshot, write_snapshot, SnapshotEntry};
