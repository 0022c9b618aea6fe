use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk cache, keyed by API key.
///
/// Both maps default to empty so a file missing either key still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDocument {
    #[serde(default)]
    pub wallets: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub lists: BTreeMap<String, u64>,
}
