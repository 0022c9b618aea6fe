use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://feed-api.cielo.finance/api/v1/";
pub const DEFAULT_CACHE_PATH: &str = "./cache.json";
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";
pub const DEFAULT_LIST_DESCRIPTION: &str = "Cielo Wallet Transfer";

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub base_delay_ms: u64,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: 5,
            base_delay_ms: 500,
            max_delay: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub list_name: String,
    pub list_description: String,
    pub cache_path: PathBuf,
    pub cacheless: bool,
    pub retry: RetryConfig,
    pub request_timeout: Duration,
}

/// Shape of `config.json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileConfig {
    list_name: String,
    #[serde(default)]
    list_description: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let config_path = std::env::var("CONFIG_PATH")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = read_file_config(Path::new(&config_path))?;

        let api_base_url =
            std::env::var("CIELO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let retry = RetryConfig {
            max_attempts: env_or("RETRY_MAX_ATTEMPTS", 5)?,
            base_delay_ms: env_or("RETRY_BASE_DELAY_MS", 500)?,
            max_delay: Duration::from_millis(env_or("RETRY_MAX_DELAY_MS", 30_000)?),
        };

        let request_timeout = Duration::from_secs(env_or("REQUEST_TIMEOUT_SECS", 30)?);

        Ok(Config {
            api_base_url,
            list_name: file.list_name,
            list_description: file
                .list_description
                .unwrap_or_else(|| DEFAULT_LIST_DESCRIPTION.to_string()),
            cache_path: cache_path_from_env(),
            cacheless: false,
            retry,
            request_timeout,
        })
    }

    /// Config for talking to `api_base_url` with defaults for everything else.
    pub fn new(api_base_url: impl Into<String>, list_name: impl Into<String>) -> Self {
        Config {
            api_base_url: api_base_url.into(),
            list_name: list_name.into(),
            list_description: DEFAULT_LIST_DESCRIPTION.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            cacheless: false,
            retry: RetryConfig::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

pub fn cache_path_from_env() -> PathBuf {
    dotenv::dotenv().ok();
    std::env::var("CACHE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CACHE_PATH))
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_file_config(&contents)
        .with_context(|| format!("Invalid config file {}", path.display()))
}

fn parse_file_config(contents: &str) -> Result<FileConfig> {
    let file: FileConfig = serde_json::from_str(contents)?;
    if file.list_name.trim().is_empty() {
        anyhow::bail!("listName must not be empty");
    }
    Ok(file)
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {key}: {value}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_list_name_and_optional_description() {
        let file = parse_file_config(r#"{"listName": "Imported"}"#).unwrap();
        assert_eq!(file.list_name, "Imported");
        assert!(file.list_description.is_none());

        let file =
            parse_file_config(r#"{"listName": "Imported", "listDescription": "moved"}"#).unwrap();
        assert_eq!(file.list_description.as_deref(), Some("moved"));
    }

    #[test]
    fn rejects_missing_or_blank_list_name() {
        assert!(parse_file_config(r#"{}"#).is_err());
        assert!(parse_file_config(r#"{"listName": "  "}"#).is_err());
    }

    #[test]
    fn reports_unreadable_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file_config(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn reads_config_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"listName": "From Disk"}}"#).unwrap();
        let parsed = read_file_config(file.path()).unwrap();
        assert_eq!(parsed.list_name, "From Disk");
    }

    #[test]
    fn env_or_falls_back_when_unset() {
        let value: u64 = env_or("CIELO_TRANSFER_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
