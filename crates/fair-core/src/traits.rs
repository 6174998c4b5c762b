use std::time::Duration;

use async_trait::async_trait;

use crate::record::MetadataRecord;

/// Source of metadata records. Implementations must not fail: retrieval
/// problems come back as a fault record.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, identifier: &str) -> MetadataRecord;
}

/// Reports whether a URL answers with HTTP 200 within `timeout`. Every
/// failure mode collapses to `false`.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn is_reachable(&self, url: &str, timeout: Duration) -> bool;
}

/// Observer for long-running rule work (accession probes, sampler trials).
pub trait ProgressReporter: Send + Sync {
    fn started(&self, _task: &str, _total: usize) {}

    fn advanced(&self, _task: &str, _done: usize, _total: usize) {}

    fn finished(&self, _task: &str) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {}

/// Chooses how many fetches the reliability sampler performs.
pub trait TrialPlanner: Send + Sync {
    fn trial_count(&self) -> usize;
}
