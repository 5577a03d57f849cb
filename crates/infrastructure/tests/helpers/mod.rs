#![allow(dead_code)]

pub mod zone_files;

pub use zone_files::*;
