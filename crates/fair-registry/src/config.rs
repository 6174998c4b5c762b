use std::path::PathBuf;
use std::time::Duration;

use fair_core::RuleOptions;
use fair_core::rules::{DEFAULT_ACCESSION_LOOKUP_BASE, DEFAULT_PROBE_TIMEOUT};

pub const DEFAULT_REGISTRY_URL: &str = "https://entity.api.hubmapconsortium.org/entities";
pub const DEFAULT_CACHE_DIR: &str = "JSON";

#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub cache_dir: Option<PathBuf>,
}

impl RegistryConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            cache_dir: Some(PathBuf::from(DEFAULT_CACHE_DIR)),
        }
    }

    /// Defaults overlaid with `FAIR_REGISTRY_URL`, `FAIR_REQUEST_TIMEOUT_SECS`
    /// and `FAIR_CACHE_DIR` (an empty value disables the cache).
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(url) = std::env::var("FAIR_REGISTRY_URL") {
            if !url.trim().is_empty() {
                cfg.base_url = url.trim().to_string();
            }
        }
        if let Some(timeout) = env_secs("FAIR_REQUEST_TIMEOUT_SECS") {
            cfg.timeout = timeout;
        }
        if let Ok(dir) = std::env::var("FAIR_CACHE_DIR") {
            cfg.cache_dir = if dir.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(dir))
            };
        }
        cfg
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_URL)
    }
}

#[derive(Debug, Clone)]
pub struct ReachabilityConfig {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub accession_lookup_base: String,
}

impl ReachabilityConfig {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
            max_redirects: 10,
            accession_lookup_base: DEFAULT_ACCESSION_LOOKUP_BASE.to_string(),
        }
    }

    /// Defaults overlaid with `FAIR_PROBE_TIMEOUT_SECS` and
    /// `FAIR_ACCESSION_LOOKUP_URL`.
    pub fn from_env() -> Self {
        let mut cfg = Self::new();
        if let Some(timeout) = env_secs("FAIR_PROBE_TIMEOUT_SECS") {
            cfg.timeout = timeout;
        }
        if let Ok(base) = std::env::var("FAIR_ACCESSION_LOOKUP_URL") {
            if !base.trim().is_empty() {
                cfg.accession_lookup_base = base.trim().to_string();
            }
        }
        cfg
    }

    pub fn rule_options(&self) -> RuleOptions {
        RuleOptions {
            probe_timeout: self.timeout,
            accession_lookup_base: self.accession_lookup_base.clone(),
        }
    }
}

impl Default for ReachabilityConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_entity_api() {
        let cfg = RegistryConfig::default();
        assert_eq!(cfg.base_url, DEFAULT_REGISTRY_URL);
        assert_eq!(cfg.cache_dir.as_deref(), Some(std::path::Path::new("JSON")));
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    #[test]
    fn reachability_defaults_feed_rule_options() {
        let options = ReachabilityConfig::default().rule_options();
        assert_eq!(options.probe_timeout, Duration::from_secs(5));
        assert_eq!(
            options.accession_url("P04637"),
            "https://rest.uniprot.org/uniprotkb/P04637"
        );
    }
}
