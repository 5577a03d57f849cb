#![allow(dead_code)]

use rbldns_application::ports::{Dataset, ReloadOutcome};
use rbldns_application::services::{LookupService, Zone};
use rbldns_domain::{reverse_ipv4, DatasetKind};
use rbldns_infrastructure::FileDataset;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const ZONE: &str = "testsuite.example";

pub fn write_zone(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Loaded dataset over a temp file; keep the `TempDir` alive for the test.
pub fn load_dataset(kind: DatasetKind, content: &str) -> (TempDir, Arc<FileDataset>) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_zone(dir.path(), "zone.rbldns", content);
    let dataset = Arc::new(FileDataset::new(kind, &path).unwrap());
    assert!(matches!(dataset.reload(), Ok(ReloadOutcome::Reloaded(_))));
    (dir, dataset)
}

/// One-zone lookup service over a single dataset.
pub fn single_zone(kind: DatasetKind, content: &str) -> (TempDir, LookupService) {
    let (dir, dataset) = load_dataset(kind, content);
    let zone = Zone::new(ZONE).with_dataset(dataset);
    (dir, LookupService::new(vec![Arc::new(zone)]))
}

pub fn ip_query(ip: &str) -> String {
    let addr: Ipv4Addr = ip.parse().unwrap();
    format!("{}.{}", reverse_ipv4(addr), ZONE)
}

pub fn lookup_a(service: &LookupService, ip: &str) -> Option<String> {
    service
        .lookup(&ip_query(ip))
        .unwrap()
        .first_answer()
        .map(|a| a.a.to_string())
}

pub fn lookup_txt(service: &LookupService, ip: &str) -> Option<String> {
    service
        .lookup(&ip_query(ip))
        .unwrap()
        .first_answer()
        .and_then(|a| a.txt.clone())
}
