pub mod errors;
pub mod fastlist;
pub mod logging;
pub mod reload;
pub mod root;
pub mod zones;

pub use errors::ConfigError;
pub use fastlist::{FastlistConfig, FastlistPortConfig};
pub use logging::{LogFormat, LoggingConfig};
pub use reload::ReloadConfig;
pub use root::{CliOverrides, Config};
pub use zones::{DatasetConfig, ZoneArg, ZoneConfig};
