mod logging;
mod zones;

pub use logging::init_logging;
pub use zones::{build_registry, load_zones, LoadedZones};

use rbldns_domain::{CliOverrides, Config};

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;
    Ok(config)
}
