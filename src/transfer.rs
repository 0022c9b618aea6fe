use crate::api::CieloClient;
use crate::cache::CacheStore;
use crate::config::Config;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedWallet {
    pub wallet: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferReport {
    pub list_id: Option<u64>,
    pub added: Vec<String>,
    pub failed: Vec<FailedWallet>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    NothingToAdd,
    Completed(TransferReport),
}

/// Source wallets missing from the destination, in source order.
pub fn wallets_to_add(source: &[String], existing: &[String]) -> Vec<String> {
    let existing: HashSet<&str> = existing.iter().map(String::as_str).collect();
    source
        .iter()
        .filter(|wallet| !existing.contains(wallet.as_str()))
        .cloned()
        .collect()
}

pub struct Transfer {
    client: CieloClient,
    cache: CacheStore,
    list_name: String,
    list_description: String,
}

impl Transfer {
    pub fn new(client: CieloClient, cache: CacheStore, config: &Config) -> Self {
        Transfer {
            client,
            cache,
            list_name: config.list_name.clone(),
            list_description: config.list_description.clone(),
        }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Copies the tracked wallets of `from` into a new list on `to`.
    ///
    /// Only failing to read either account is fatal. A failed list creation
    /// or wallet addition is logged and recorded in the report.
    pub async fn run(&mut self, from: &str, to: &str) -> Result<TransferOutcome> {
        info!("Fetching destination existing wallets...");
        let existing = self
            .client
            .fetch_all_tracked_wallets(&mut self.cache, to, false)
            .await
            .context("Failed to fetch destination wallets")?;
        info!("Fetched {} destination existing wallets.", existing.len());

        info!("Fetching origin wallets...");
        let wallets = self
            .client
            .fetch_all_tracked_wallets(&mut self.cache, from, true)
            .await
            .context("Failed to fetch origin wallets")?;
        info!("Fetched {} origin wallets.", wallets.len());

        let to_add = wallets_to_add(&wallets, &existing);
        if to_add.is_empty() {
            info!("No wallets to add to destination.");
            return Ok(TransferOutcome::NothingToAdd);
        }

        info!("Creating list for wallets...");
        let list_id = match self
            .client
            .create_list(&mut self.cache, to, &self.list_name, &self.list_description)
            .await
        {
            Ok(id) => {
                info!("List created with id {}.", id);
                Some(id)
            }
            Err(e) => {
                error!("Failed to create list: {}", e);
                None
            }
        };

        info!("-> Adding {} wallets to destination. <-", to_add.len());

        let mut report = TransferReport {
            list_id,
            ..Default::default()
        };

        for wallet in to_add {
            debug!("Adding {}...", wallet);
            match self.client.add_wallet(to, &wallet, list_id).await {
                Ok(_) => {
                    info!("Added {}.", wallet);
                    report.added.push(wallet);
                }
                Err(e) => {
                    error!("Failed to add wallet {} to destination: {}", wallet, e);
                    report.failed.push(FailedWallet {
                        wallet,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Transfer finished: {} added, {} failed",
            report.added.len(),
            report.failed.len()
        );

        Ok(TransferOutcome::Completed(report))
    }
}
