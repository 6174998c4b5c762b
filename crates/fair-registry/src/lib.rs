pub mod cache;
pub mod config;
pub mod error;
pub mod factory;
pub mod fetcher;
pub mod reachability;

pub use cache::{MetadataCache, file_stem};
pub use config::*;
pub use error::RegistryError;
pub use factory::*;
pub use fetcher::HttpMetadataFetcher;
pub use reachability::HttpReachabilityChecker;
