use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FastlistConfig {
    /// Directory holding `fastlist-<port>.snapshot` files. Defaults to the system temp dir.
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,

    #[serde(default = "default_expire_interval_secs")]
    pub expire_interval_secs: u64,

    #[serde(default = "default_persist_interval_secs")]
    pub persist_interval_secs: u64,

    #[serde(default = "default_recv_buffer_bytes")]
    pub recv_buffer_bytes: usize,

    /// Per-listener overrides, keyed by listen port.
    #[serde(default)]
    pub ports: HashMap<String, FastlistPortConfig>,
}

/// Overrides for the values a datagram may leave empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct FastlistPortConfig {
    #[serde(default)]
    pub a: Option<String>,

    #[serde(default)]
    pub txt: Option<String>,

    #[serde(default)]
    pub ttl: Option<u32>,

    #[serde(default)]
    pub expiration: Option<u64>,
}

impl FastlistConfig {
    pub fn snapshot_dir(&self) -> PathBuf {
        self.snapshot_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    pub fn port_overrides(&self, port: u16) -> Option<&FastlistPortConfig> {
        self.ports.get(&port.to_string())
    }
}

impl Default for FastlistConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: None,
            expire_interval_secs: default_expire_interval_secs(),
            persist_interval_secs: default_persist_interval_secs(),
            recv_buffer_bytes: default_recv_buffer_bytes(),
            ports: HashMap::new(),
        }
    }
}

fn default_expire_interval_secs() -> u64 {
    20
}

fn default_persist_interval_secs() -> u64 {
    60
}

fn default_recv_buffer_bytes() -> usize {
    256 * 1024
}
