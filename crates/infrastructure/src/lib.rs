//! rbldns infrastructure: record store backends, the zone-file parser, and
//! the file-backed and fastlist dataset implementations.
pub mod dataset;
pub mod factory;
pub mod stores;
pub mod zonefile;

pub use dataset::{FastlistDataset, FastlistDefaults, FileDataset};
pub use factory::{DatasetFactory, DatasetHandle, ZoneRegistry};
