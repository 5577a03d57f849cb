mod clock;
mod fastlist;
mod file_dataset;

pub use fastlist::{
    decode_snapshot, encode_snapshot, load_snapshot, parse_datagram, write_snapshot,
    FastlistCommand, FastlistDataset, FastlistDefaults, SnapshotEntry,
};
pub use file_dataset::FileDataset;
