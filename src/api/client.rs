use super::error::{ApiError, ApiResult};
use super::models::{
    AddWalletRequest, CreateListRequest, CreatedRecord, Envelope, TrackedWalletsPage,
};
use crate::cache::CacheStore;
use crate::config::{Config, RetryConfig};
use anyhow::Context;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::sleep;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const API_KEY_HEADER: &str = "X-Api-Key";
/// Absolute epoch milliseconds at which the rate limit window resets.
pub const RATE_LIMIT_RESET_HEADER: &str = "X-Rate-Limit-Reset";

const FIRST_PAGE: u64 = 1;

#[derive(Clone)]
pub struct CieloClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
    cacheless: bool,
}

impl CieloClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(CieloClient {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            retry: config.retry.clone(),
            cacheless: config.cacheless,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    // 2^n * base_delay_ms: the first retry waits twice the base delay.
    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff::from_millis(2)
            .factor(self.retry.base_delay_ms.max(1))
            .max_delay(self.retry.max_delay)
    }

    fn get_retry_strategy(&self) -> impl Iterator<Item = Duration> {
        self.backoff().map(jitter).take(self.retry.max_attempts)
    }

    /// Fetches one page of tracked wallets.
    ///
    /// `Ok(None)` means the service had nothing more to give (non-200 status
    /// or no `data`). 429 responses are retried in place, waiting until the
    /// reset time the service reports.
    pub async fn get_tracked_wallets(
        &self,
        api_key: &str,
        page: u64,
    ) -> ApiResult<Option<TrackedWalletsPage>> {
        let mut rate_limited = 0;

        loop {
            debug!("Requesting tracked wallets page {}", page);
            let response = self
                .http
                .get(self.url("tracked-wallets"))
                .header(API_KEY_HEADER, api_key)
                .query(&[("next_object", page)])
                .send()
                .await?;

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if rate_limited >= self.retry.max_attempts {
                    return Err(ApiError::RateLimitExhausted {
                        page,
                        attempts: rate_limited,
                    });
                }
                rate_limited += 1;

                let delay = rate_limit_delay(response.headers(), now_millis()).unwrap_or_else(
                    || {
                        self.backoff()
                            .nth(rate_limited - 1)
                            .unwrap_or(self.retry.max_delay)
                    },
                );

                warn!(
                    "Ratelimit hit while fetching tracked wallets page {}, waiting {}ms",
                    page,
                    delay.as_millis()
                );
                sleep(delay).await;
                continue;
            }

            if status != StatusCode::OK {
                debug!("Page {} returned status {}, treating as end of data", page, status);
                return Ok(None);
            }

            let envelope: Envelope<TrackedWalletsPage> = response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

            return Ok(envelope.data);
        }
    }

    /// Collects every tracked wallet of an account, page by page.
    ///
    /// With `use_cache` set (and cacheless mode off) a cached entry is
    /// returned without touching the network. A fresh result is always
    /// written back to the cache.
    pub async fn fetch_all_tracked_wallets(
        &self,
        cache: &mut CacheStore,
        api_key: &str,
        use_cache: bool,
    ) -> ApiResult<Vec<String>> {
        if use_cache
            && !self.cacheless
            && let Some(wallets) = cache.wallets(api_key)
        {
            debug!("Using {} cached wallets", wallets.len());
            return Ok(wallets.to_vec());
        }

        let mut cursor = FIRST_PAGE;
        let mut results = Vec::new();

        loop {
            let page = RetryIf::start(
                self.get_retry_strategy(),
                || self.get_tracked_wallets(api_key, cursor),
                |e: &ApiError| {
                    let retry = e.is_transient();
                    if retry {
                        warn!("Failed to fetch page {}, retrying: {}", cursor, e);
                    }
                    retry
                },
            )
            .await?;

            let Some(page) = page else { break };
            if page.tracked_wallets.is_empty() {
                break;
            }

            results.extend(page.wallet_ids().map(str::to_string));
            debug!(
                "Page {} returned {} wallets ({} total)",
                cursor,
                page.tracked_wallets.len(),
                results.len()
            );

            match page.paging.next_object {
                Some(next) => cursor = next,
                None => break,
            }
        }

        cache.set_wallets(api_key, results.clone());
        if let Err(e) = cache.persist().await {
            warn!("Failed to persist cache: {:#}", e);
        }

        Ok(results)
    }

    /// Creates a private list, or returns the one already cached for `api_key`.
    pub async fn create_list(
        &self,
        cache: &mut CacheStore,
        api_key: &str,
        name: &str,
        description: &str,
    ) -> ApiResult<u64> {
        if let Some(list_id) = cache.list_id(api_key) {
            info!("Reusing cached list {}", list_id);
            return Ok(list_id);
        }

        let request = CreateListRequest {
            name,
            is_public: false,
            wallets: Vec::new(),
            description,
        };

        let response = self
            .http
            .post(self.url("lists"))
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await?;

        let list_id = read_created_id(response).await?;

        cache.set_list_id(api_key, list_id);
        if let Err(e) = cache.persist().await {
            warn!("Failed to persist cache: {:#}", e);
        }

        Ok(list_id)
    }

    /// Tracks `wallet` under `list_id` with a random label. Returns the record id.
    pub async fn add_wallet(
        &self,
        api_key: &str,
        wallet: &str,
        list_id: Option<u64>,
    ) -> ApiResult<u64> {
        let request = AddWalletRequest {
            wallet,
            label: Uuid::new_v4().to_string(),
            list_id,
        };

        let response = self
            .http
            .post(self.url("tracked-wallets"))
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await?;

        read_created_id(response).await
    }
}

async fn read_created_id(response: reqwest::Response) -> ApiResult<u64> {
    let status = response.status();
    let body = response.text().await?;

    if status != StatusCode::OK {
        return Err(ApiError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        });
    }

    let envelope: Envelope<CreatedRecord> =
        serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

    envelope
        .data
        .map(|record| record.id)
        .ok_or_else(|| ApiError::InvalidResponse(format!("missing data in {body}")))
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Time left until the reset instant in the rate limit header, if readable.
fn rate_limit_delay(headers: &HeaderMap, now_ms: u128) -> Option<Duration> {
    let reset: f64 = headers
        .get(RATE_LIMIT_RESET_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()?;

    if !reset.is_finite() {
        return None;
    }

    let delay = (reset - now_ms as f64).max(0.0);
    Some(Duration::from_millis(delay as u64))
}
