use anyhow::Result;
use cielo_transfer::api::CieloClient;
use cielo_transfer::cache::CacheStore;
use cielo_transfer::config::Config;
use cielo_transfer::query::formatters::format_transfer_report;
use cielo_transfer::transfer::{Transfer, TransferOutcome};
use clap::Parser;
use clap::error::ErrorKind;
use std::ffi::OsString;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "Please provide the API keys for the transfer in the following format: \"transfer <from> <to>\"";

const CACHELESS_FLAG: &str = "--cacheless";

#[derive(Parser)]
#[command(name = "transfer")]
#[command(about = "Copy tracked wallets from one Cielo account to another", long_about = None)]
struct Cli {
    /// API key of the account to copy wallets from
    #[arg(allow_hyphen_values = true)]
    from: Option<String>,

    /// API key of the account to copy wallets into
    #[arg(allow_hyphen_values = true)]
    to: Option<String>,

    #[arg(hide = true, allow_hyphen_values = true, num_args = 0..)]
    extra: Vec<String>,

    /// Ignore cached wallet lists and refetch everything (accepted anywhere)
    #[arg(long, default_value = "false")]
    cacheless: bool,
}

/// Pulls `--cacheless` out of the arguments wherever it appears, so that
/// API keys starting with `-` are never mistaken for flags.
fn split_cacheless(args: impl IntoIterator<Item = OsString>) -> (bool, Vec<OsString>) {
    let mut cacheless = false;
    let rest = args
        .into_iter()
        .filter(|arg| {
            let matched = arg.as_os_str() == CACHELESS_FLAG;
            cacheless |= matched;
            !matched
        })
        .collect();
    (cacheless, rest)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (cacheless, args) = split_cacheless(std::env::args_os());
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    let (Some(from), Some(to)) = (cli.from, cli.to) else {
        eprintln!("{USAGE}");
        std::process::exit(1);
    };

    if !cli.extra.is_empty() {
        debug!("Ignoring {} extra argument(s)", cli.extra.len());
    }

    let mut config = Config::from_env()?;
    config.cacheless = cacheless || cli.cacheless;
    info!("Configuration loaded");
    info!("List name: {}", config.list_name);
    if config.cacheless {
        info!("Cacheless mode: cached wallets will be refetched");
    }

    let cache = CacheStore::load(&config.cache_path).await;
    let client = CieloClient::new(&config)?;

    let mut transfer = Transfer::new(client, cache, &config);

    match transfer.run(&from, &to).await {
        Ok(TransferOutcome::NothingToAdd) => {}
        Ok(TransferOutcome::Completed(report)) => {
            println!("{}", format_transfer_report(&report));
        }
        Err(e) => {
            error!("Transfer error: {:#}", e);
            return Err(e);
        }
    }

    Ok(())
}
