pub mod client;
pub mod error;
pub mod models;

pub use client::{API_KEY_HEADER, CieloClient, RATE_LIMIT_RESET_HEADER};
pub use error::{ApiError, ApiResult};
pub use models::{Paging, TrackedWallet, TrackedWalletsPage};
