use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::record::MetadataRecord;
use crate::rules::{
    accessible_rules, findable_rules, interoperable_rules, Rule, RuleContext, RuleOptions,
};
use crate::traits::{MetadataSource, NoopProgress, ProgressReporter, ReachabilityProbe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Findable,
    Accessible,
    Interoperable,
    Reproducible,
}

impl Dimension {
    pub const ALL: [Self; 4] = [
        Self::Findable,
        Self::Accessible,
        Self::Interoperable,
        Self::Reproducible,
    ];

    pub const fn label(self) -> char {
        match self {
            Self::Findable => 'F',
            Self::Accessible => 'A',
            Self::Interoperable => 'I',
            Self::Reproducible => 'R',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Findable => "Findable",
            Self::Accessible => "Accessible",
            Self::Interoperable => "Interoperable",
            Self::Reproducible => "Reproducible",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleOutcome {
    pub rule: &'static str,
    pub value: f64,
}

impl RuleOutcome {
    pub fn indicator(rule: &'static str, passed: bool) -> Self {
        Self {
            rule,
            value: if passed { 1.0 } else { 0.0 },
        }
    }

    pub fn passed(&self) -> bool {
        self.value >= 1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionReport {
    pub dimension: Dimension,
    pub score: f64,
    pub outcomes: Vec<RuleOutcome>,
}

impl DimensionReport {
    /// Unweighted mean of the outcome values. No rules means no evidence,
    /// which scores zero.
    pub fn from_outcomes(dimension: Dimension, outcomes: Vec<RuleOutcome>) -> Self {
        let score = if outcomes.is_empty() {
            0.0
        } else {
            outcomes.iter().map(|o| o.value).sum::<f64>() / outcomes.len() as f64
        };
        Self {
            dimension,
            score,
            outcomes,
        }
    }
}

/// Scores one FAIR dimension for a registry identifier.
#[async_trait]
pub trait Evaluator: Send + Sync {
    fn dimension(&self) -> Dimension;

    async fn evaluate(&self, identifier: &str) -> DimensionReport;
}

/// A dimension scored by a fixed, ordered list of record rules.
pub struct RuleSetEvaluator {
    dimension: Dimension,
    rules: Vec<Box<dyn Rule>>,
    source: Arc<dyn MetadataSource>,
    probe: Arc<dyn ReachabilityProbe>,
    progress: Arc<dyn ProgressReporter>,
    options: RuleOptions,
}

impl RuleSetEvaluator {
    pub fn new(
        dimension: Dimension,
        rules: Vec<Box<dyn Rule>>,
        source: Arc<dyn MetadataSource>,
        probe: Arc<dyn ReachabilityProbe>,
    ) -> Self {
        Self {
            dimension,
            rules,
            source,
            probe,
            progress: Arc::new(NoopProgress),
            options: RuleOptions::default(),
        }
    }

    pub fn findable(source: Arc<dyn MetadataSource>, probe: Arc<dyn ReachabilityProbe>) -> Self {
        Self::new(Dimension::Findable, findable_rules(), source, probe)
    }

    pub fn accessible(source: Arc<dyn MetadataSource>, probe: Arc<dyn ReachabilityProbe>) -> Self {
        Self::new(Dimension::Accessible, accessible_rules(), source, probe)
    }

    pub fn interoperable(
        source: Arc<dyn MetadataSource>,
        probe: Arc<dyn ReachabilityProbe>,
    ) -> Self {
        Self::new(Dimension::Interoperable, interoperable_rules(), source, probe)
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: RuleOptions) -> Self {
        self.options = options;
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Runs every rule against an already fetched record.
    pub async fn evaluate_record(&self, record: &MetadataRecord) -> DimensionReport {
        let ctx = RuleContext {
            probe: self.probe.as_ref(),
            progress: self.progress.as_ref(),
            options: &self.options,
        };

        let mut outcomes = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let passed = rule.check(record, &ctx).await;
            tracing::debug!(dimension = %self.dimension, rule = rule.name(), passed, "rule evaluated");
            outcomes.push(RuleOutcome::indicator(rule.name(), passed));
        }

        let report = DimensionReport::from_outcomes(self.dimension, outcomes);
        tracing::info!(dimension = %self.dimension, score = report.score, "dimension scored");
        report
    }
}

#[async_trait]
impl Evaluator for RuleSetEvaluator {
    fn dimension(&self) -> Dimension {
        self.dimension
    }

    async fn evaluate(&self, identifier: &str) -> DimensionReport {
        tracing::info!(dimension = %self.dimension, identifier, "evaluation started");
        let record = self.source.fetch(identifier).await;
        self.evaluate_record(&record).await
    }
}
