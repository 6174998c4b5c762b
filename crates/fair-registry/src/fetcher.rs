use async_trait::async_trait;
use fair_core::{MetadataRecord, MetadataSource, json_kind};
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::cache::MetadataCache;
use crate::config::RegistryConfig;
use crate::error::RegistryError;

/// Error pages are cut to this many characters before they reach a fault
/// record.
pub const MAX_ERROR_BODY_CHARS: usize = 256;

/// Reads entity records from the registry's `GET {base_url}/{identifier}`
/// endpoint. One request per fetch, no retries.
#[derive(Clone)]
pub struct HttpMetadataFetcher {
    base_url: Url,
    client: Client,
    cache: Option<MetadataCache>,
}

impl HttpMetadataFetcher {
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let raw = config.base_url.trim();
        let base_url = Url::parse(raw).map_err(|err| RegistryError::BaseUrl {
            url: raw.to_string(),
            reason: err.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(RegistryError::BaseUrl {
                url: raw.to_string(),
                reason: "cannot carry a path".to_string(),
            });
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        let cache = config.cache_dir.map(MetadataCache::new);
        Ok(Self {
            base_url,
            client,
            cache,
        })
    }

    pub fn cache(&self) -> Option<&MetadataCache> {
        self.cache.as_ref()
    }

    /// Appends the identifier as a single escaped path segment, so `/`, `?`
    /// and `#` inside it cannot change the request target.
    fn lookup_url(&self, identifier: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(identifier.trim());
        }
        url
    }

    /// Fetch without the fault-record conversion.
    pub async fn try_fetch(&self, identifier: &str) -> Result<MetadataRecord, RegistryError> {
        if identifier.trim().is_empty() {
            return Err(RegistryError::EmptyIdentifier);
        }

        let res = self
            .client
            .get(self.lookup_url(identifier))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(RegistryError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        match res.json::<Value>().await? {
            Value::Object(fields) => Ok(MetadataRecord::new(fields)),
            other => Err(RegistryError::NotAnObject {
                kind: json_kind(&other),
            }),
        }
    }

    fn write_cache(&self, identifier: &str, record: &MetadataRecord) {
        let Some(cache) = &self.cache else {
            return;
        };
        match cache.store(identifier, record) {
            Ok(path) => tracing::debug!(identifier, path = %path.display(), "metadata cached"),
            Err(err) => tracing::warn!(identifier, error = %err, "failed to cache metadata"),
        }
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataFetcher {
    fn name(&self) -> &'static str {
        "entity-api"
    }

    async fn fetch(&self, identifier: &str) -> MetadataRecord {
        tracing::info!(identifier, "fetching metadata");
        match self.try_fetch(identifier).await {
            Ok(record) => {
                self.write_cache(identifier, &record);
                tracing::info!(identifier, fields = record.len(), "metadata fetched");
                record
            }
            Err(err) => {
                tracing::error!(identifier, error = %err, "error fetching metadata");
                MetadataRecord::fault(err.to_string())
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}... ({} bytes)", body.get(..cut).unwrap_or(body), body.len()),
        None => body.to_string(),
    }
}
