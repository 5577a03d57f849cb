use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ZoneConfig {
    pub name: String,

    #[serde(default)]
    pub datasets: Vec<DatasetConfig>,
}

/// One dataset reference. `kind` stays a string so an unknown type can be
/// reported and skipped without rejecting the whole file.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DatasetConfig {
    pub kind: String,
    pub source: String,
}

/// Command-line zone argument in `zone:kind:source` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneArg {
    pub zone: String,
    pub dataset: DatasetConfig,
}

impl FromStr for ZoneArg {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(zone), Some(kind), Some(source))
                if !zone.is_empty() && !kind.is_empty() && !source.is_empty() =>
            {
                Ok(Self {
                    zone: zone.to_string(),
                    dataset: DatasetConfig {
                        kind: kind.to_string(),
                        source: source.to_string(),
                    },
                })
            }
            _ => Err(ConfigError::Validation(format!(
                "Could not parse dataset argument. Format is 'zonename:dntype:datasource' but got '{}'",
                s
            ))),
        }
    }
}
