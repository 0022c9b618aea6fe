use serde::{Deserialize, Serialize};

/// Every Cielo response wraps its payload in `data`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackedWalletsPage {
    #[serde(default)]
    pub tracked_wallets: Vec<TrackedWallet>,
    #[serde(default)]
    pub paging: Paging,
}

impl TrackedWalletsPage {
    pub fn wallet_ids(&self) -> impl Iterator<Item = &str> {
        self.tracked_wallets.iter().map(|w| w.wallet.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackedWallet {
    pub wallet: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub next_object: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedRecord {
    pub id: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateListRequest<'a> {
    pub name: &'a str,
    pub is_public: bool,
    pub wallets: Vec<String>,
    pub description: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddWalletRequest<'a> {
    pub wallet: &'a str,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_wallet_request_omits_missing_list_id() {
        let request = AddWalletRequest {
            wallet: "W",
            label: "l".into(),
            list_id: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "wallet": "W", "label": "l" })
        );

        let request = AddWalletRequest {
            list_id: Some(3),
            ..request
        };
        assert_eq!(serde_json::to_value(&request).unwrap()["list_id"], 3);
    }
}
