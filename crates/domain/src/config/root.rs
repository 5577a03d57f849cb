use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::fastlist::FastlistConfig;
use super::logging::LoggingConfig;
use super::reload::ReloadConfig;
use super::zones::{ZoneArg, ZoneConfig};

/// Main configuration structure for rbldns
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Autoreload polling
    #[serde(default)]
    pub reload: ReloadConfig,

    /// Fastlist listeners, workers and per-port overrides
    #[serde(default)]
    pub fastlist: FastlistConfig,

    /// Zones and the datasets backing them, in lookup order
    #[serde(default)]
    pub zones: Vec<ZoneConfig>,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. rbldns.toml in current directory
    /// 3. /etc/rbldns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("rbldns.toml").exists() {
            Self::from_file("rbldns.toml")?
        } else if std::path::Path::new("/etc/rbldns/config.toml").exists() {
            Self::from_file("/etc/rbldns/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(secs) = overrides.check_interval_secs {
            self.reload.check_interval_secs = secs;
        }
        for arg in overrides.zones {
            self.add_zone_arg(arg);
        }
    }

    /// Appends a `zone:kind:source` argument, merging into an existing zone of the same name.
    pub fn add_zone_arg(&mut self, arg: ZoneArg) {
        match self
            .zones
            .iter_mut()
            .find(|z| z.name.eq_ignore_ascii_case(&arg.zone))
        {
            Some(zone) => zone.datasets.push(arg.dataset),
            None => self.zones.push(ZoneConfig {
                name: arg.zone,
                datasets: vec![arg.dataset],
            }),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reload.check_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "Reload check interval cannot be 0".to_string(),
            ));
        }

        if self.fastlist.expire_interval_secs == 0 || self.fastlist.persist_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "Fastlist worker intervals cannot be 0".to_string(),
            ));
        }

        for zone in &self.zones {
            if zone.name.trim_end_matches('.').is_empty() {
                return Err(ConfigError::Validation("Zone name cannot be empty".to_string()));
            }
            if zone.datasets.iter().any(|d| d.source.is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "Zone '{}' has a dataset without a source",
                    zone.name
                )));
            }
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub check_interval_secs: Option<u64>,
    pub zones: Vec<ZoneArg>,
}
