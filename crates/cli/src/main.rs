use clap::{Parser, Subcommand};
use rbldns_domain::config::ZoneArg;
use rbldns_domain::CliOverrides;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

mod bootstrap;
mod commands;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "rbldns")]
#[command(version)]
#[command(about = "rbldns - DNS blocklist zone data engine")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Seconds between source modification checks
    #[arg(long, global = true)]
    check_interval: Option<u64>,

    /// Extra dataset in zonename:dntype:datasource form; repeatable
    #[arg(short = 'z', long = "zone", global = true, value_name = "ZONE:TYPE:SOURCE")]
    zones: Vec<ZoneArg>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load all zones and keep them up to date (default)
    Run,

    /// Answer queries against the configured zones and print JSON
    Lookup {
        /// Fully qualified query names, e.g. 2.0.0.127.bl.example.org
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Reload every dataset once and report per-dataset status
    Check,

    /// Print the names stored in a fastlist snapshot file
    DumpSnapshot {
        file: PathBuf,

        /// Include A, TTL, expiry and TXT columns
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        log_level: cli.log_level.clone(),
        check_interval_secs: cli.check_interval,
        zones: cli.zones.clone(),
    };
    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            info!("Starting rbldns v{}", env!("CARGO_PKG_VERSION"));
            commands::run(&config).await?;
        }
        Commands::Lookup { queries } => commands::lookup(&config, &queries)?,
        Commands::Check => {
            if !commands::check(&config).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::DumpSnapshot { file, verbose } => commands::dump_snapshot(&file, verbose)?,
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_zone_arguments_parse_anywhere() {
        let cli = Cli::parse_from([
            "rbldns",
            "lookup",
            "-z",
            "bl.example.org:ip4set:/var/lib/rbl/spam.txt",
            "2.0.0.127.bl.example.org",
        ]);

        assert_eq!(cli.zones.len(), 1);
        assert_eq!(cli.zones[0].dataset.kind, "ip4set");
        assert!(matches!(cli.command, Some(Commands::Lookup { ref queries }) if queries.len() == 1));
    }

    #[test]
    fn test_malformed_zone_argument_is_rejected() {
        assert!(Cli::try_parse_from(["rbldns", "-z", "bl.example.org:ip4set", "check"]).is_err());
    }
}
