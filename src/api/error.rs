//! Errors returned by the Cielo API client.

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, TLS.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The body could not be decoded as the expected JSON.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("Received unexpected status code {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("rate limited on page {page}, gave up after {attempts} retries")]
    RateLimitExhausted { page: u64, attempts: usize },
}

impl ApiError {
    /// Whether a page fetch failing with this error should be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::InvalidResponse(_))
    }
}
