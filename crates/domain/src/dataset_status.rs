use crate::dataset_kind::DatasetKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReloadStats {
    pub duration: Duration,
    pub count: usize,
    pub delta: i64,
}

impl ReloadStats {
    pub fn new(duration: Duration, count: usize, previous: usize) -> Self {
        Self {
            duration,
            count,
            delta: count as i64 - previous as i64,
        }
    }
}

/// Point-in-time view of a dataset, for status output.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetStatus {
    pub source: Arc<str>,
    pub kind: DatasetKind,
    pub available: bool,
    pub reloading: bool,
    pub record_count: usize,
    pub active_since: Option<DateTime<Utc>>,
    pub last_reload: Option<ReloadStats>,
}
