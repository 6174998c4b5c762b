use std::time::Duration;

use async_trait::async_trait;
use fair_core::ReachabilityProbe;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};

use crate::config::ReachabilityConfig;
use crate::error::RegistryError;

/// GET-based link checker. Only a final `200 OK` counts as reachable;
/// timeouts, DNS and connection failures, bad URLs and every other status
/// all report `false`.
#[derive(Clone)]
pub struct HttpReachabilityChecker {
    config: ReachabilityConfig,
    client: Client,
}

impl HttpReachabilityChecker {
    pub fn new(config: ReachabilityConfig) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .redirect(Policy::limited(config.max_redirects))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn default_timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Checks `url` with the configured default timeout.
    pub async fn check(&self, url: &str) -> bool {
        self.is_reachable(url, self.config.timeout).await
    }
}

#[async_trait]
impl ReachabilityProbe for HttpReachabilityChecker {
    async fn is_reachable(&self, url: &str, timeout: Duration) -> bool {
        tracing::debug!(url, "checking url");
        match self.client.get(url).timeout(timeout).send().await {
            Ok(res) => {
                let reachable = res.status() == StatusCode::OK;
                if reachable {
                    tracing::debug!(url, "url is accessible");
                } else {
                    tracing::info!(url, status = res.status().as_u16(), "url is not accessible");
                }
                reachable
            }
            Err(err) => {
                tracing::warn!(url, error = %err, "url check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn malformed_url_is_unreachable() {
        let checker = HttpReachabilityChecker::new(ReachabilityConfig::default()).expect("build");
        assert!(!checker.check("not a url").await);
        assert!(!checker.is_reachable("", Duration::from_millis(50)).await);
    }
}
