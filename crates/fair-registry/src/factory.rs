use std::sync::Arc;

use fair_core::{MetadataSource, ReachabilityProbe};

use crate::config::{ReachabilityConfig, RegistryConfig};
use crate::error::RegistryError;
use crate::fetcher::HttpMetadataFetcher;
use crate::reachability::HttpReachabilityChecker;

pub fn build_metadata_source(
    cfg: RegistryConfig,
) -> Result<Arc<dyn MetadataSource>, RegistryError> {
    Ok(Arc::new(HttpMetadataFetcher::new(cfg)?))
}

pub fn build_reachability_probe(
    cfg: ReachabilityConfig,
) -> Result<Arc<dyn ReachabilityProbe>, RegistryError> {
    Ok(Arc::new(HttpReachabilityChecker::new(cfg)?))
}
