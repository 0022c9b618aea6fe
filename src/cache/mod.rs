pub mod models;
pub mod store;

pub use models::CacheDocument;
pub use store::CacheStore;
