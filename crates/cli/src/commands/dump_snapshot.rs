use anyhow::bail;
use rbldns_infrastructure::dataset::load_snapshot;
use std::path::Path;

/// Prints the names held in a fastlist snapshot, sorted, one per line.
///
/// With `verbose`, each line also carries the A value, TTL, expiry and TXT.
pub fn dump_snapshot(path: &Path, verbose: bool) -> anyhow::Result<()> {
    let Some(mut entries) = load_snapshot(path)? else {
        bail!("No snapshot at {}", path.display());
    };
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (name, record) in &entries {
        if verbose {
            println!(
                "{}{}\t{}\t{}\t{}\t{}",
                if record.excluded { "!" } else { "" },
                name,
                record.a,
                record.ttl.map(|t| t.to_string()).unwrap_or_default(),
                record.expires_at.map(|t| t.to_string()).unwrap_or_default(),
                record.txt.as_deref().unwrap_or_default(),
            );
        } else {
            println!("{name}");
        }
    }
    Ok(())
}
