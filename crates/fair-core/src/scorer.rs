use std::sync::Arc;

use crate::dimension::{Evaluator, RuleSetEvaluator};
use crate::rules::RuleOptions;
use crate::sampler::ReliabilitySampler;
use crate::traits::{
    MetadataSource, NoopProgress, ProgressReporter, ReachabilityProbe, TrialPlanner,
};
use crate::vector::{FairReport, FairVector};

/// Runs all four dimensions for one identifier. Findable, Accessible and
/// Interoperable share a single fetch; the sampler does its own.
pub struct FairScorer {
    source: Arc<dyn MetadataSource>,
    findable: RuleSetEvaluator,
    accessible: RuleSetEvaluator,
    interoperable: RuleSetEvaluator,
    reproducible: ReliabilitySampler,
}

pub struct FairScorerBuilder {
    source: Arc<dyn MetadataSource>,
    probe: Arc<dyn ReachabilityProbe>,
    progress: Arc<dyn ProgressReporter>,
    planner: Option<Arc<dyn TrialPlanner>>,
    options: RuleOptions,
}

impl FairScorerBuilder {
    #[must_use]
    pub fn progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn planner(mut self, planner: Arc<dyn TrialPlanner>) -> Self {
        self.planner = Some(planner);
        self
    }

    #[must_use]
    pub fn options(mut self, options: RuleOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> FairScorer {
        let rule_set = |make: fn(Arc<dyn MetadataSource>, Arc<dyn ReachabilityProbe>) -> RuleSetEvaluator| {
            make(self.source.clone(), self.probe.clone())
                .with_progress(self.progress.clone())
                .with_options(self.options.clone())
        };
        let findable = rule_set(RuleSetEvaluator::findable);
        let accessible = rule_set(RuleSetEvaluator::accessible);
        let interoperable = rule_set(RuleSetEvaluator::interoperable);

        let mut reproducible =
            ReliabilitySampler::new(self.source.clone()).with_progress(self.progress.clone());
        if let Some(planner) = self.planner {
            reproducible = reproducible.with_planner(planner);
        }

        FairScorer {
            source: self.source,
            findable,
            accessible,
            interoperable,
            reproducible,
        }
    }
}

impl FairScorer {
    pub fn builder(
        source: Arc<dyn MetadataSource>,
        probe: Arc<dyn ReachabilityProbe>,
    ) -> FairScorerBuilder {
        FairScorerBuilder {
            source,
            probe,
            progress: Arc::new(NoopProgress),
            planner: None,
            options: RuleOptions::default(),
        }
    }

    pub async fn score(&self, identifier: &str) -> FairReport {
        tracing::info!(identifier, source = self.source.name(), "scoring started");
        let record = self.source.fetch(identifier).await;
        if let Some(message) = record.fault_message() {
            tracing::warn!(identifier, error = message, "metadata fetch returned a fault record");
        }

        let findable = self.findable.evaluate_record(&record).await;
        let accessible = self.accessible.evaluate_record(&record).await;
        let interoperable = self.interoperable.evaluate_record(&record).await;
        let reproducible = self.reproducible.evaluate(identifier).await;

        let vector = FairVector::new(
            findable.score,
            accessible.score,
            interoperable.score,
            reproducible.score,
        );
        tracing::info!(
            identifier,
            findable = vector.findable,
            accessible = vector.accessible,
            interoperable = vector.interoperable,
            reproducible = vector.reproducible,
            "scoring finished"
        );

        FairReport {
            identifier: identifier.to_string(),
            dimensions: vec![findable, accessible, interoperable, reproducible],
            vector,
        }
    }
}
