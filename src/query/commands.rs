use crate::cache::CacheStore;
use crate::query::formatters::{OutputFormat, cache_entries, format_summary, format_wallets};
use anyhow::Result;

pub fn cmd_summary(store: &CacheStore, format: &OutputFormat) -> Result<()> {
    let entries = cache_entries(store.document());
    let output = format_summary(&entries, format);
    println!("{output}");

    Ok(())
}

pub fn cmd_wallets(store: &CacheStore, credential: &str, format: &OutputFormat) -> Result<()> {
    let wallets = store.wallets(credential).ok_or_else(|| {
        anyhow::anyhow!(
            "No cached wallets for this credential in {}",
            store.path().display()
        )
    })?;

    let output = format_wallets(wallets, format);
    println!("{output}");

    Ok(())
}
