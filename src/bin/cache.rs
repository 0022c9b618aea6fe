use anyhow::Result;
use cielo_transfer::cache::CacheStore;
use cielo_transfer::config::cache_path_from_env;
use cielo_transfer::query::commands::{cmd_summary, cmd_wallets};
use cielo_transfer::query::formatters::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cache")]
#[command(about = "Inspect the local tracked wallet cache", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "table")]
    format: String,

    /// Cache file to read (defaults to CACHE_PATH or ./cache.json)
    #[arg(long)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Summary,
    Wallets { credential: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from(cli.format.as_str());

    let path = cli.path.unwrap_or_else(cache_path_from_env);
    let store = CacheStore::load(path).await;

    match cli.command {
        Commands::Summary => {
            cmd_summary(&store, &format)?;
        }
        Commands::Wallets { credential } => {
            cmd_wallets(&store, &credential, &format)?;
        }
    }

    Ok(())
}
