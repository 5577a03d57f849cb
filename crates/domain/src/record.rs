use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_A_VALUE: &str = "127.0.0.2";

/// Payload of one listed entry as it sits in a match store.
///
/// `txt` is the raw, unexpanded template. Expansion happens at query time
/// against the scope that was published together with the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub a: Arc<str>,
    pub txt: Option<Arc<str>>,
    pub ttl: Option<u32>,
    pub excluded: bool,
    /// Unix seconds after which the entry is dropped. Only fastlist entries carry one.
    pub expires_at: Option<u64>,
}

impl Record {
    pub fn new(a: impl Into<Arc<str>>) -> Self {
        Self {
            a: a.into(),
            txt: None,
            ttl: None,
            excluded: false,
            expires_at: None,
        }
    }

    pub fn excluded() -> Self {
        Self {
            excluded: true,
            ..Self::new(DEFAULT_A_VALUE)
        }
    }

    pub fn with_txt(mut self, txt: Option<Arc<str>>) -> Self {
        self.txt = txt;
        self
    }

    pub fn with_ttl(mut self, ttl: Option<u32>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_expiry(mut self, expires_at: Option<u64>) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub fn mark_excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    #[inline]
    pub fn is_expired(&self, now_secs: u64) -> bool {
        matches!(self.expires_at, Some(at) if now_secs > at)
    }
}

/// A positive match after template expansion, ready for the protocol layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answer {
    pub a: Arc<str>,
    pub txt: Option<String>,
    pub ttl: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_expiry() {
        let rec = Record::new("127.0.0.2").with_expiry(Some(100));
        assert!(!rec.is_expired(100));
        assert!(rec.is_expired(101));
        assert!(!Record::new("127.0.0.2").is_expired(u64::MAX));
    }

    #[test]
    fn test_excluded_record_defaults() {
        let rec = Record::excluded();
        assert!(rec.excluded);
        assert_eq!(&*rec.a, DEFAULT_A_VALUE);
        assert!(rec.txt.is_none());
    }
}
