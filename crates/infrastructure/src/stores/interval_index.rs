use rbldns_application::ports::{LookupKey, MatchStore, MatchStoreBuilder};
use rbldns_domain::{parse_ip4_range, DomainError, Ip4Range, Record, ReloadScope};
use std::sync::Arc;

use super::check_maxrange;

struct Entry {
    range: Ip4Range,
    seq: u32,
    record: Record,
}

/// Arbitrary, possibly overlapping address ranges.
///
/// Entries are sorted by lower bound with a running maximum of upper bounds,
/// so a stabbing query only walks back from the last entry starting at or
/// before the address until no earlier entry can reach it.
pub struct IntervalIndex {
    entries: Vec<Entry>,
    max_upper: Vec<u32>,
}

impl IntervalIndex {
    fn stab(&self, addr: u32) -> Option<&Record> {
        let end = self.entries.partition_point(|e| e.range.lower <= addr);
        let mut first: Option<&Entry> = None;

        for i in (0..end).rev() {
            if self.max_upper[i] < addr {
                break;
            }
            let entry = &self.entries[i];
            if !entry.range.contains(addr) {
                continue;
            }
            if entry.record.excluded {
                return None;
            }
            match first {
                Some(f) if f.seq < entry.seq => {}
                _ => first = Some(entry),
            }
        }

        first.map(|e| &e.record)
    }
}

impl MatchStore for IntervalIndex {
    fn lookup(&self, key: &LookupKey<'_>) -> Option<&Record> {
        match key {
            LookupKey::Ipv4(addr) => self.stab(*addr),
            LookupKey::Name(_) => None,
        }
    }

    fn count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Default)]
pub struct IntervalIndexBuilder {
    entries: Vec<Entry>,
}

impl IntervalIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStoreBuilder for IntervalIndexBuilder {
    fn insert(
        &mut self,
        key: &str,
        record: Record,
        maxrange4: Option<u64>,
    ) -> Result<(), DomainError> {
        let range = parse_ip4_range(key)?;
        check_maxrange(key, range.host_count(), maxrange4)?;

        let seq = self.entries.len() as u32;
        self.entries.push(Entry { range, seq, record });
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn finish(self: Box<Self>, _scope: &ReloadScope) -> Arc<dyn MatchStore> {
        let Self { mut entries } = *self;
        entries.sort_by_key(|e| (e.range.lower, e.seq));

        let mut max_upper = Vec::with_capacity(entries.len());
        let mut running = 0u32;
        for entry in &entries {
            running = running.max(entry.range.upper);
            max_upper.push(running);
        }

        Arc::new(IntervalIndex { entries, max_upper })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn key(s: &str) -> LookupKey<'static> {
        LookupKey::Ipv4(u32::from(s.parse::<Ipv4Addr>().unwrap()))
    }

    fn build(entries: &[(&str, Record)]) -> Arc<dyn MatchStore> {
        let mut builder = Box::new(IntervalIndexBuilder::new());
        for (k, rec) in entries {
            builder.insert(k, rec.clone(), None).unwrap();
        }
        builder.finish(&ReloadScope::default())
    }

    #[test]
    fn test_exclusion_dominates_overlapping_ranges() {
        let store = build(&[
            ("127.0.0.42", Record::excluded()),
            ("127.0.0.0/24", Record::new("127.0.0.2")),
        ]);

        assert!(store.lookup(&key("127.0.0.41")).is_some());
        assert!(store.lookup(&key("127.0.0.42")).is_none());
    }

    #[test]
    fn test_first_inserted_positive_match_wins() {
        let store = build(&[
            ("10.0.0.0/8", Record::new("127.0.0.8")),
            ("10.1.0.0-10.1.255.255", Record::new("127.0.0.16")),
        ]);

        assert_eq!(&*store.lookup(&key("10.1.2.3")).unwrap().a, "127.0.0.8");
    }

    #[test]
    fn test_long_range_seen_past_shorter_neighbours() {
        let store = build(&[
            ("10.0.0.0/8", Record::new("127.0.0.8")),
            ("10.0.0.1", Record::new("127.0.0.3")),
            ("10.0.0.5-10.0.0.6", Record::new("127.0.0.4")),
        ]);

        assert_eq!(&*store.lookup(&key("10.200.0.0")).unwrap().a, "127.0.0.8");
        assert!(store.lookup(&key("9.255.255.255")).is_none());
        assert!(store.lookup(&key("11.0.0.0")).is_none());
    }

    #[test]
    fn test_dash_and_partial_ranges() {
        let store = build(&[
            ("127.16-31", Record::new("127.0.0.2")),
            ("192.168", Record::new("127.0.0.3")),
        ]);

        assert!(store.lookup(&key("127.16.0.0")).is_some());
        assert!(store.lookup(&key("127.31.255.255")).is_some());
        assert!(store.lookup(&key("127.32.0.0")).is_none());
        assert_eq!(&*store.lookup(&key("192.168.77.1")).unwrap().a, "127.0.0.3");
    }

    #[test]
    fn test_maxrange_rejects_wider_entries() {
        let mut builder = IntervalIndexBuilder::new();
        assert!(builder
            .insert("11.0.0.0/16", Record::new("127.0.0.2"), Some(65_536))
            .is_ok());
        assert!(matches!(
            builder.insert("12.0.0.0/8", Record::new("127.0.0.2"), Some(65_536)),
            Err(DomainError::MaxRangeExceeded { .. })
        ));
        assert_eq!(builder.len(), 1);
    }
}
