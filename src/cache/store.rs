use super::models::CacheDocument;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Read-through/write-back cache backed by a single JSON file.
///
/// Not locked: two processes sharing a file will overwrite each other.
pub struct CacheStore {
    path: PathBuf,
    document: CacheDocument,
}

impl CacheStore {
    /// Loads the cache file, falling back to an empty document.
    ///
    /// A missing file is the normal first-run case. Any other read or parse
    /// failure is logged and also yields an empty document.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let document = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str::<CacheDocument>(&contents) {
                Ok(document) => {
                    debug!(
                        "Loaded cache from {} ({} wallet sets, {} lists)",
                        path.display(),
                        document.wallets.len(),
                        document.lists.len()
                    );
                    document
                }
                Err(e) => {
                    error!(
                        "Failed to parse cache {}, is it corrupted? {}",
                        path.display(),
                        e
                    );
                    CacheDocument::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => CacheDocument::default(),
            Err(e) => {
                error!("Failed to read cache {}: {}", path.display(), e);
                CacheDocument::default()
            }
        };

        CacheStore { path, document }
    }

    /// Writes the whole document as pretty-printed JSON, replacing the file.
    pub async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create cache directory {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&self.document)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write cache {}", self.path.display()))?;

        debug!("Persisted cache to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &CacheDocument {
        &self.document
    }

    pub fn wallets(&self, api_key: &str) -> Option<&[String]> {
        self.document.wallets.get(api_key).map(Vec::as_slice)
    }

    pub fn set_wallets(&mut self, api_key: &str, wallets: Vec<String>) {
        self.document.wallets.insert(api_key.to_string(), wallets);
    }

    pub fn list_id(&self, api_key: &str) -> Option<u64> {
        self.document.lists.get(api_key).copied()
    }

    pub fn set_list_id(&mut self, api_key: &str, list_id: u64) {
        self.document.lists.insert(api_key.to_string(), list_id);
    }
}
