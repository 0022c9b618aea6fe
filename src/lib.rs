pub mod api;
pub mod cache;
pub mod config;
pub mod query;
pub mod transfer;
