use std::ops::RangeInclusive;
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;

use crate::dimension::{Dimension, DimensionReport, Evaluator, RuleOutcome};
use crate::record::MetadataRecord;
use crate::traits::{MetadataSource, NoopProgress, ProgressReporter, TrialPlanner};

pub const DEFAULT_TRIALS: RangeInclusive<usize> = 3..=10;

const TRIAL_TASK: &str = "metadata fetch trials";

/// Uniformly random trial count from an inclusive range.
#[derive(Debug, Clone)]
pub struct RandomTrials {
    range: RangeInclusive<usize>,
}

impl RandomTrials {
    pub fn new(range: RangeInclusive<usize>) -> Self {
        let start = (*range.start()).max(1);
        let end = (*range.end()).max(start);
        Self { range: start..=end }
    }
}

impl Default for RandomTrials {
    fn default() -> Self {
        Self::new(DEFAULT_TRIALS)
    }
}

impl TrialPlanner for RandomTrials {
    fn trial_count(&self) -> usize {
        rand::thread_rng().gen_range(self.range.clone())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedTrials(pub usize);

impl TrialPlanner for FixedTrials {
    fn trial_count(&self) -> usize {
        self.0.max(1)
    }
}

/// A trial succeeds when the fetch produced a non-empty, data-shaped record.
pub fn is_successful_fetch(record: &MetadataRecord) -> bool {
    !record.is_empty() && !record.is_fault()
}

/// Liveness probe of the registry endpoint for one identifier: the share of
/// repeated fetches that come back with data. This ratio is the whole
/// Reproducible score.
pub struct ReliabilitySampler {
    source: Arc<dyn MetadataSource>,
    planner: Arc<dyn TrialPlanner>,
    progress: Arc<dyn ProgressReporter>,
}

impl ReliabilitySampler {
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        Self {
            source,
            planner: Arc::new(RandomTrials::default()),
            progress: Arc::new(NoopProgress),
        }
    }

    #[must_use]
    pub fn with_planner(mut self, planner: Arc<dyn TrialPlanner>) -> Self {
        self.planner = planner;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub async fn success_ratio(&self, identifier: &str) -> f64 {
        let trials = self.planner.trial_count().max(1);
        self.progress.started(TRIAL_TASK, trials);

        let mut successes = 0_usize;
        for trial in 1..=trials {
            let record = self.source.fetch(identifier).await;
            if is_successful_fetch(&record) {
                successes += 1;
            } else {
                tracing::debug!(identifier, trial, "fetch trial failed");
            }
            self.progress.advanced(TRIAL_TASK, trial, trials);
        }
        self.progress.finished(TRIAL_TASK);

        let ratio = successes as f64 / trials as f64;
        tracing::info!(identifier, trials, successes, ratio, "fetch reliability sampled");
        ratio
    }
}

#[async_trait]
impl Evaluator for ReliabilitySampler {
    fn dimension(&self) -> Dimension {
        Dimension::Reproducible
    }

    async fn evaluate(&self, identifier: &str) -> DimensionReport {
        let ratio = self.success_ratio(identifier).await;
        DimensionReport {
            dimension: Dimension::Reproducible,
            score: ratio,
            outcomes: vec![RuleOutcome {
                rule: "fetch-reliability",
                value: ratio,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    struct CountingSource {
        calls: AtomicUsize,
        fail_every: Option<usize>,
    }

    impl CountingSource {
        fn new(fail_every: Option<usize>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_every,
            }
        }
    }

    #[async_trait]
    impl MetadataSource for CountingSource {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn fetch(&self, identifier: &str) -> MetadataRecord {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            match self.fail_every {
                Some(k) if n % k == 0 => MetadataRecord::fault("connection reset"),
                _ => MetadataRecord::from_value(json!({"hubmap_id": identifier})),
            }
        }
    }

    struct EmptySource;

    #[async_trait]
    impl MetadataSource for EmptySource {
        fn name(&self) -> &'static str {
            "empty"
        }

        async fn fetch(&self, _identifier: &str) -> MetadataRecord {
            MetadataRecord::default()
        }
    }

    #[tokio::test]
    async fn always_successful_source_is_one_for_any_count() {
        for trials in [1, 3, 7, 10] {
            let source = Arc::new(CountingSource::new(None));
            let sampler = ReliabilitySampler::new(source.clone())
                .with_planner(Arc::new(FixedTrials(trials)));
            let report = sampler.evaluate("HBM1").await;
            assert_eq!(report.score, 1.0);
            assert_eq!(source.calls.load(Ordering::SeqCst), trials);
        }
    }

    #[tokio::test]
    async fn random_planner_still_yields_one_for_reliable_source() {
        let sampler = ReliabilitySampler::new(Arc::new(CountingSource::new(None)));
        let report = sampler.evaluate("HBM1").await;
        assert_eq!(report.score, 1.0);
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].rule, "fetch-reliability");
    }

    #[tokio::test]
    async fn always_faulting_source_is_zero() {
        let source = Arc::new(CountingSource::new(Some(1)));
        let sampler = ReliabilitySampler::new(source).with_planner(Arc::new(FixedTrials(5)));
        assert_eq!(sampler.evaluate("HBM1").await.score, 0.0);
    }

    #[tokio::test]
    async fn empty_records_count_as_failures() {
        let sampler =
            ReliabilitySampler::new(Arc::new(EmptySource)).with_planner(Arc::new(FixedTrials(4)));
        assert_eq!(sampler.evaluate("HBM1").await.score, 0.0);
    }

    #[tokio::test]
    async fn intermittent_source_gives_ratio() {
        let source = Arc::new(CountingSource::new(Some(4)));
        let sampler = ReliabilitySampler::new(source).with_planner(Arc::new(FixedTrials(8)));
        assert!((sampler.evaluate("HBM1").await.score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn random_trials_stay_in_range() {
        let planner = RandomTrials::default();
        for _ in 0..200 {
            let n = planner.trial_count();
            assert!((3..=10).contains(&n), "trial count {n} out of range");
        }
    }

    #[test]
    fn degenerate_ranges_are_clamped() {
        assert_eq!(RandomTrials::new(0..=0).trial_count(), 1);
        assert_eq!(FixedTrials(0).trial_count(), 1);
    }
}
