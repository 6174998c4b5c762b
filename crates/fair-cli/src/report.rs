use std::fmt::Write as _;

use fair_core::{Dimension, FairReport};

/// Human-readable summary: one block per dimension, indicator rules as
/// checkboxes and the reliability ratio as a number.
pub fn render_text(report: &FairReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "FAIR scores for {}", report.identifier);
    for dimension in &report.dimensions {
        let _ = writeln!(
            out,
            "  {} ({}): {:.2}",
            dimension.dimension,
            dimension.dimension.label(),
            dimension.score
        );
        for outcome in &dimension.outcomes {
            if dimension.dimension == Dimension::Reproducible {
                let _ = writeln!(out, "    {:<40} {:.2}", outcome.rule, outcome.value);
            } else {
                let mark = if outcome.passed() { 'x' } else { ' ' };
                let _ = writeln!(out, "    [{mark}] {}", outcome.rule);
            }
        }
    }
    let [f, a, i, r] = report.vector.to_array();
    let _ = writeln!(out, "  vector: [{f:.2}, {a:.2}, {i:.2}, {r:.2}]");
    out
}

pub fn render_json(report: &FairReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use fair_core::{DimensionReport, FairVector, RuleOutcome};

    use super::*;

    fn report() -> FairReport {
        FairReport {
            identifier: "HBM666.NDQZ.365".to_string(),
            dimensions: vec![
                DimensionReport::from_outcomes(
                    Dimension::Findable,
                    vec![
                        RuleOutcome::indicator("uuid present", true),
                        RuleOutcome::indicator("title present", false),
                    ],
                ),
                DimensionReport::from_outcomes(
                    Dimension::Reproducible,
                    vec![RuleOutcome {
                        rule: "fetch-reliability",
                        value: 0.75,
                    }],
                ),
            ],
            vector: FairVector::new(0.5, 0.0, 0.0, 0.75),
        }
    }

    #[test]
    fn text_marks_passed_and_failed_rules() {
        let text = render_text(&report());
        assert!(text.contains("FAIR scores for HBM666.NDQZ.365"));
        assert!(text.contains("Findable (F): 0.50"));
        assert!(text.contains("[x] uuid present"));
        assert!(text.contains("[ ] title present"));
        assert!(text.contains("fetch-reliability"));
        assert!(text.contains("0.75"));
        assert!(text.contains("vector: [0.50, 0.00, 0.00, 0.75]"));
    }

    #[test]
    fn json_carries_vector_and_dimensions() {
        let json = render_json(&report()).expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["identifier"], "HBM666.NDQZ.365");
        assert_eq!(value["vector"]["reproducible"], 0.75);
        assert_eq!(value["dimensions"][0]["dimension"], "findable");
        assert_eq!(value["dimensions"][0]["outcomes"][1]["value"], 0.0);
    }
}
