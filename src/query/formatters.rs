use crate::cache::CacheDocument;
use crate::transfer::TransferReport;
use comfy_table::{Cell, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use csv::Writer;
use serde_json::json;

#[derive(Debug, Clone)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            _ => OutputFormat::Table,
        }
    }
}

/// One row of the cache summary: a credential and what is cached for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub credential: String,
    pub wallet_count: Option<usize>,
    pub list_id: Option<u64>,
}

/// Merges both cache maps into one row per credential, sorted by credential.
pub fn cache_entries(document: &CacheDocument) -> Vec<CacheEntry> {
    let mut credentials: Vec<&String> = document
        .wallets
        .keys()
        .chain(document.lists.keys())
        .collect();
    credentials.sort();
    credentials.dedup();

    credentials
        .into_iter()
        .map(|credential| CacheEntry {
            credential: credential.clone(),
            wallet_count: document.wallets.get(credential).map(Vec::len),
            list_id: document.lists.get(credential).copied(),
        })
        .collect()
}

pub fn mask_credential(credential: &str) -> String {
    let chars: Vec<char> = credential.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or("N/A".to_string(), |v| v.to_string())
}

pub fn format_summary(entries: &[CacheEntry], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            if entries.is_empty() {
                return "Cache is empty.".to_string();
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec!["Credential", "Cached Wallets", "List Id"]);

            for entry in entries {
                table.add_row(vec![
                    Cell::new(mask_credential(&entry.credential)),
                    Cell::new(or_na(entry.wallet_count)),
                    Cell::new(or_na(entry.list_id)),
                ]);
            }

            table.to_string()
        }
        OutputFormat::Json => {
            let rows: Vec<_> = entries
                .iter()
                .map(|entry| {
                    json!({
                        "credential": mask_credential(&entry.credential),
                        "wallet_count": entry.wallet_count,
                        "list_id": entry.list_id,
                    })
                })
                .collect();
            serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Csv => {
            let mut wtr = Writer::from_writer(vec![]);
            let _ = wtr.write_record(["credential", "wallet_count", "list_id"]);
            for entry in entries {
                let _ = wtr.write_record([
                    mask_credential(&entry.credential),
                    or_na(entry.wallet_count),
                    or_na(entry.list_id),
                ]);
            }
            String::from_utf8(wtr.into_inner().unwrap_or_default()).unwrap_or_default()
        }
    }
}

pub fn format_wallets(wallets: &[String], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            if wallets.is_empty() {
                return "No wallets cached.".to_string();
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec!["#", "Wallet"]);

            for (i, wallet) in wallets.iter().enumerate() {
                table.add_row(vec![Cell::new(i + 1), Cell::new(wallet)]);
            }

            table.to_string()
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(wallets).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Csv => {
            let mut wtr = Writer::from_writer(vec![]);
            let _ = wtr.write_record(["wallet"]);
            for wallet in wallets {
                let _ = wtr.write_record([wallet]);
            }
            String::from_utf8(wtr.into_inner().unwrap_or_default()).unwrap_or_default()
        }
    }
}

/// Summary printed at the end of a transfer run.
pub fn format_transfer_report(report: &TransferReport) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Wallet", "Status", "Detail"]);

    for wallet in &report.added {
        table.add_row(vec![Cell::new(wallet), Cell::new("added"), Cell::new("")]);
    }
    for failed in &report.failed {
        table.add_row(vec![
            Cell::new(&failed.wallet),
            Cell::new("failed"),
            Cell::new(&failed.reason),
        ]);
    }

    format!(
        "List: {}\nAdded: {}, Failed: {}\n{}",
        or_na(report.list_id),
        report.added.len(),
        report.failed.len(),
        table
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::FailedWallet;

    fn document() -> CacheDocument {
        let mut document = CacheDocument::default();
        document
            .wallets
            .insert("source-key-0001".into(), vec!["A".into(), "B".into()]);
        document
            .wallets
            .insert("dest-key-0000002".into(), vec!["C".into()]);
        document.lists.insert("dest-key-0000002".into(), 42);
        document
    }

    #[test]
    fn entries_merge_both_maps_per_credential() {
        let entries = cache_entries(&document());
        assert_eq!(
            entries,
            vec![
                CacheEntry {
                    credential: "dest-key-0000002".into(),
                    wallet_count: Some(1),
                    list_id: Some(42),
                },
                CacheEntry {
                    credential: "source-key-0001".into(),
                    wallet_count: Some(2),
                    list_id: None,
                },
            ]
        );
    }

    #[test]
    fn credentials_are_masked() {
        assert_eq!(mask_credential("abcd1234efgh5678"), "abcd...5678");
        assert_eq!(mask_credential("short"), "*****");
    }

    #[test]
    fn summary_csv_never_leaks_full_credential() {
        let output = format_summary(&cache_entries(&document()), &OutputFormat::Csv);
        assert!(output.starts_with("credential,wallet_count,list_id\n"));
        assert!(output.contains("dest...0002,1,42"));
        assert!(output.contains("sour...0001,2,N/A"));
        assert!(!output.contains("source-key-0001"));
    }

    #[test]
    fn empty_summary_table_says_so() {
        assert_eq!(format_summary(&[], &OutputFormat::Table), "Cache is empty.");
    }

    #[test]
    fn wallets_json_is_plain_array() {
        let output = format_wallets(&["A".to_string(), "B".to_string()], &OutputFormat::Json);
        let parsed: Vec<String> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, vec!["A", "B"]);
    }

    #[test]
    fn report_lists_added_and_failed() {
        let report = TransferReport {
            list_id: Some(9),
            added: vec!["D".into()],
            failed: vec![FailedWallet {
                wallet: "C".into(),
                reason: "Received unexpected status code 500: {}".into(),
            }],
        };
        let output = format_transfer_report(&report);
        assert!(output.starts_with("List: 9\nAdded: 1, Failed: 1\n"));
        assert!(output.contains("added"));
        assert!(output.contains("failed"));
    }

    #[test]
    fn format_names_parse_case_insensitively() {
        assert!(matches!(OutputFormat::from("JSON"), OutputFormat::Json));
        assert!(matches!(OutputFormat::from("csv"), OutputFormat::Csv));
        assert!(matches!(OutputFormat::from("anything"), OutputFormat::Table));
    }
}
