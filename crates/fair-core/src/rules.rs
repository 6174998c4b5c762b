use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;

use crate::record::MetadataRecord;
use crate::traits::{ProgressReporter, ReachabilityProbe};

pub const UUID_KEY: &str = "uuid";
pub const ENTITY_TYPE_KEY: &str = "entity_type";
pub const TITLE_KEY: &str = "title";
pub const ANTIBODIES_KEY: &str = "antibodies";
pub const ACCESSION_KEY: &str = "uniprot_accession_number";
pub const DOI_URL_KEY: &str = "doi_url";
pub const STATUS_KEY: &str = "status";
pub const GROUP_NAME_KEY: &str = "group_name";
pub const GROUP_UUID_KEY: &str = "group_uuid";
pub const REGISTRY_ID_KEY: &str = "hubmap_id";
pub const GENETIC_SEQUENCES_KEY: &str = "contains_human_genetic_sequences";
pub const METADATA_BLOCK: &str = "metadata";
pub const ASSAY_CATEGORY_KEY: &str = "assay_category";
pub const ASSAY_TYPE_KEY: &str = "assay_type";
pub const CONTRIBUTORS_PATH_KEY: &str = "contributors_path";
pub const VERSION_KEY: &str = "version";

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_ACCESSION_LOOKUP_BASE: &str = "https://rest.uniprot.org/uniprotkb";

const ACCESSION_TASK: &str = "antibody accession checks";

#[derive(Debug, Clone)]
pub struct RuleOptions {
    pub probe_timeout: Duration,
    pub accession_lookup_base: String,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            accession_lookup_base: DEFAULT_ACCESSION_LOOKUP_BASE.to_string(),
        }
    }
}

impl RuleOptions {
    pub fn accession_url(&self, accession: &str) -> String {
        format!(
            "{}/{}",
            self.accession_lookup_base.trim_end_matches('/'),
            accession.trim()
        )
    }
}

/// Side channels a rule may consult besides the record itself.
pub struct RuleContext<'a> {
    pub probe: &'a dyn ReachabilityProbe,
    pub progress: &'a dyn ProgressReporter,
    pub options: &'a RuleOptions,
}

/// A named indicator over one metadata record. Rules are total: missing
/// fields and fault records produce `false`, never an error.
#[async_trait]
pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(&self, record: &MetadataRecord, ctx: &RuleContext<'_>) -> bool;
}

pub struct NoFault;

#[async_trait]
impl Rule for NoFault {
    fn name(&self) -> &'static str {
        "no-fault"
    }

    async fn check(&self, record: &MetadataRecord, _ctx: &RuleContext<'_>) -> bool {
        !record.is_fault()
    }
}

pub struct FieldPresent {
    pub name: &'static str,
    pub key: &'static str,
}

#[async_trait]
impl Rule for FieldPresent {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn check(&self, record: &MetadataRecord, _ctx: &RuleContext<'_>) -> bool {
        record.has(self.key)
    }
}

pub struct FieldEquals {
    pub name: &'static str,
    pub key: &'static str,
    pub expected: &'static str,
}

#[async_trait]
impl Rule for FieldEquals {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn check(&self, record: &MetadataRecord, _ctx: &RuleContext<'_>) -> bool {
        record.get_str(self.key) == Some(self.expected)
    }
}

pub struct NestedFieldPresent {
    pub name: &'static str,
    pub block: &'static str,
    pub key: &'static str,
}

#[async_trait]
impl Rule for NestedFieldPresent {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn check(&self, record: &MetadataRecord, _ctx: &RuleContext<'_>) -> bool {
        record.get_nested(self.block, self.key).is_some()
    }
}

/// The field holds a URL and that URL is reachable.
pub struct ReachableLink {
    pub name: &'static str,
    pub key: &'static str,
}

#[async_trait]
impl Rule for ReachableLink {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn check(&self, record: &MetadataRecord, ctx: &RuleContext<'_>) -> bool {
        let Some(url) = record.get_str(self.key) else {
            return false;
        };
        let reachable = ctx.probe.is_reachable(url, ctx.options.probe_timeout).await;
        if !reachable {
            tracing::warn!(rule = self.name, url, "link not reachable");
        }
        reachable
    }
}

/// Antibody list is present and every listed accession resolves in the
/// protein database. An empty list passes; a missing list does not.
pub struct AntibodyEvidence;

/// Upper bound on accession lookups in flight at once.
pub const MAX_CONCURRENT_LOOKUPS: usize = 8;

enum Accession {
    Lookup(String),
    Malformed,
}

/// Null, blank, `false` and empty containers count as "no accession".
/// Numbers are looked up by their decimal text; anything else fails closed.
fn accession_of(antibody: &Value) -> Option<Accession> {
    match antibody.get(ACCESSION_KEY)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| Accession::Lookup(s.to_string()))
        }
        Value::Number(n) => Some(Accession::Lookup(n.to_string())),
        Value::Array(items) if items.is_empty() => None,
        Value::Object(fields) if fields.is_empty() => None,
        Value::Bool(true) | Value::Array(_) | Value::Object(_) => Some(Accession::Malformed),
    }
}

#[async_trait]
impl Rule for AntibodyEvidence {
    fn name(&self) -> &'static str {
        "has-antibody-evidence"
    }

    async fn check(&self, record: &MetadataRecord, ctx: &RuleContext<'_>) -> bool {
        let Some(antibodies) = record.get(ANTIBODIES_KEY).and_then(Value::as_array) else {
            return false;
        };

        let mut accessions = Vec::new();
        for accession in antibodies.iter().filter_map(accession_of) {
            match accession {
                Accession::Lookup(acc) => accessions.push(acc),
                Accession::Malformed => {
                    tracing::error!(rule = self.name(), "antibody accession is not a scalar");
                    return false;
                }
            }
        }
        if accessions.is_empty() {
            return true;
        }

        let total = accessions.len();
        let done = AtomicUsize::new(0);
        ctx.progress.started(ACCESSION_TASK, total);

        let done = &done;
        let results: Vec<bool> = stream::iter(accessions)
            .map(|accession| async move {
                let url = ctx.options.accession_url(&accession);
                let reachable = ctx.probe.is_reachable(&url, ctx.options.probe_timeout).await;
                if !reachable {
                    tracing::error!(accession = %accession, url = %url, "accession lookup failed");
                }
                let n = done.fetch_add(1, Ordering::Relaxed) + 1;
                ctx.progress.advanced(ACCESSION_TASK, n, total);
                reachable
            })
            .buffered(MAX_CONCURRENT_LOOKUPS)
            .collect()
            .await;
        ctx.progress.finished(ACCESSION_TASK);

        results.into_iter().all(|reachable| reachable)
    }
}

pub fn findable_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NoFault),
        Box::new(FieldPresent {
            name: "has-identifier",
            key: UUID_KEY,
        }),
        Box::new(FieldEquals {
            name: "is-dataset-entity",
            key: ENTITY_TYPE_KEY,
            expected: "Dataset",
        }),
        Box::new(FieldPresent {
            name: "has-title",
            key: TITLE_KEY,
        }),
        Box::new(AntibodyEvidence),
    ]
}

pub fn accessible_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(ReachableLink {
            name: "has-reachable-doi",
            key: DOI_URL_KEY,
        }),
        Box::new(FieldEquals {
            name: "is-published",
            key: STATUS_KEY,
            expected: "Published",
        }),
        Box::new(FieldPresent {
            name: "has-group-name",
            key: GROUP_NAME_KEY,
        }),
        Box::new(FieldPresent {
            name: "has-group-uuid",
            key: GROUP_UUID_KEY,
        }),
        Box::new(FieldPresent {
            name: "has-registry-id",
            key: REGISTRY_ID_KEY,
        }),
    ]
}

pub fn interoperable_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(FieldPresent {
            name: "has-genetic-sequence-flag",
            key: GENETIC_SEQUENCES_KEY,
        }),
        Box::new(NestedFieldPresent {
            name: "has-assay-category",
            block: METADATA_BLOCK,
            key: ASSAY_CATEGORY_KEY,
        }),
        Box::new(NestedFieldPresent {
            name: "has-assay-type",
            block: METADATA_BLOCK,
            key: ASSAY_TYPE_KEY,
        }),
        Box::new(NestedFieldPresent {
            name: "has-contributors-path",
            block: METADATA_BLOCK,
            key: CONTRIBUTORS_PATH_KEY,
        }),
        Box::new(NestedFieldPresent {
            name: "has-version",
            block: METADATA_BLOCK,
            key: VERSION_KEY,
        }),
    ]
}
