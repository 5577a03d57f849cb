use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dataset types known to the registry, named as they appear in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    /// `ip4tset`: single addresses sharing one dataset-wide A/TXT.
    #[serde(rename = "ip4tset")]
    ExactSet,
    /// `ip4trie`: CIDR blocks, longest prefix wins.
    #[serde(rename = "ip4trie")]
    PrefixTrie,
    /// `ip4set`: arbitrary ranges, exclusions dominate.
    #[serde(rename = "ip4set")]
    IntervalIndex,
    /// `dnset`: exact domain names.
    #[serde(rename = "dnset")]
    ExactMap,
    /// `fastlist`: domain names fed over UDP.
    #[serde(rename = "fastlist")]
    Fastlist,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 5] = [
        DatasetKind::ExactSet,
        DatasetKind::PrefixTrie,
        DatasetKind::IntervalIndex,
        DatasetKind::ExactMap,
        DatasetKind::Fastlist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::ExactSet => "ip4tset",
            DatasetKind::PrefixTrie => "ip4trie",
            DatasetKind::IntervalIndex => "ip4set",
            DatasetKind::ExactMap => "dnset",
            DatasetKind::Fastlist => "fastlist",
        }
    }

    /// Whether query labels are reversed IPv4 addresses for this kind.
    pub fn is_ip4(&self) -> bool {
        matches!(
            self,
            DatasetKind::ExactSet | DatasetKind::PrefixTrie | DatasetKind::IntervalIndex
        )
    }

    /// Whether the source is a file on disk (everything except fastlist).
    pub fn is_file_backed(&self) -> bool {
        !matches!(self, DatasetKind::Fastlist)
    }
}

impl FromStr for DatasetKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownDatasetType(s.to_string()))
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_names_roundtrip() {
        for kind in DatasetKind::ALL {
            assert_eq!(kind.as_str().parse::<DatasetKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_only_fastlist_is_not_file_backed() {
        for kind in DatasetKind::ALL {
            assert_eq!(kind.is_file_backed(), kind != DatasetKind::Fastlist);
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = "ip6set".parse::<DatasetKind>().unwrap_err();
        assert_eq!(err, DomainError::UnknownDatasetType("ip6set".to_string()));
    }
}
