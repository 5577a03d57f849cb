use anyhow::Context;
use rbldns_domain::{Config, LookupResult};
use serde::Serialize;

use crate::bootstrap::load_zones;

#[derive(Serialize)]
struct QueryReport<'a> {
    query: &'a str,
    listed: bool,
    #[serde(flatten)]
    result: LookupResult,
}

/// Answers each query once against freshly loaded zones and prints JSON.
pub fn lookup(config: &Config, queries: &[String]) -> anyhow::Result<()> {
    let zones = load_zones(config)?;

    for query in queries {
        let result = zones
            .lookup
            .lookup(query)
            .with_context(|| format!("Lookup of {query} failed"))?;
        let report = QueryReport {
            query,
            listed: result.is_listed(),
            result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
