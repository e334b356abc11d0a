//! The evaluation stage: run every metric over every trace.

use afeval_harness::Trace;

use crate::metrics::{EvalContext, Metric, MetricResult};
use crate::outcome::{EvalReport, EvalSummary};

/// Grade the full trace collection.
///
/// Takes ownership of the traces; nothing upstream holds a reference once
/// grading starts. A metric returning an error marks that metric failed
/// for that case and grading continues.
pub async fn evaluate(traces: Vec<Trace>, metrics: &[Box<dyn Metric>]) -> EvalSummary {
    let mut summary = EvalSummary::default();

    for trace in traces {
        let case = trace.prompt.clone();
        let duration_ms = trace.duration_ms;
        let ctx = EvalContext { trace };

        let mut report = EvalReport::new(case, duration_ms);
        for metric in metrics {
            let result = match metric.evaluate(&ctx).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(metric = %metric.name(), error = %e, "metric evaluation errored");
                    MetricResult::Fail {
                        reason: format!("metric error: {}", e),
                    }
                }
            };
            report.add_metric(metric.name(), result);
        }

        summary.add(report);
    }

    summary
}

#[cfg(test)]
mod tests {
    use afeval_harness::{TestCaseSpec, Trace};
    use anyhow::Result;
    use async_trait::async_trait;

    use super::*;

    struct FixedMetric {
        name: &'static str,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl Metric for FixedMetric {
        fn name(&self) -> &str {
            self.name
        }

        async fn evaluate(&self, ctx: &EvalContext) -> Result<MetricResult> {
            match self.fail_on {
                Some(prompt) if ctx.trace.prompt == prompt => Ok(MetricResult::Fail {
                    reason: "bad case".to_string(),
                }),
                _ => Ok(MetricResult::Pass),
            }
        }
    }

    struct ErroringMetric;

    #[async_trait]
    impl Metric for ErroringMetric {
        fn name(&self) -> &str {
            "erroring"
        }

        async fn evaluate(&self, _ctx: &EvalContext) -> Result<MetricResult> {
            anyhow::bail!("backend unreachable")
        }
    }

    fn trace(prompt: &str) -> Trace {
        let spec: TestCaseSpec =
            serde_json::from_str(&format!(r#"{{ "input": "{}" }}"#, prompt)).unwrap();
        Trace::error_case(&spec, "m", Vec::new(), "out")
    }

    #[tokio::test]
    async fn test_every_trace_gets_a_report_in_order() {
        let metrics: Vec<Box<dyn Metric>> = vec![Box::new(FixedMetric {
            name: "fixed",
            fail_on: Some("two"),
        })];

        let summary = evaluate(vec![trace("one"), trace("two"), trace("three")], &metrics).await;

        let cases: Vec<&str> = summary.reports.iter().map(|r| r.case.as_str()).collect();
        assert_eq!(cases, vec!["one", "two", "three"]);
        assert_eq!(summary.passed_count(), 2);
        assert!(!summary.reports[1].passed);
    }

    #[tokio::test]
    async fn test_metric_error_becomes_failure_and_grading_continues() {
        let metrics: Vec<Box<dyn Metric>> = vec![
            Box::new(ErroringMetric),
            Box::new(FixedMetric {
                name: "fixed",
                fail_on: None,
            }),
        ];

        let summary = evaluate(vec![trace("one"), trace("two")], &metrics).await;

        assert_eq!(summary.reports.len(), 2);
        for report in &summary.reports {
            assert!(!report.passed);
            assert_eq!(report.metrics.len(), 2);
            assert!(matches!(
                report.metrics[0].result,
                MetricResult::Fail { .. }
            ));
            assert!(matches!(report.metrics[1].result, MetricResult::Pass));
        }
    }
}
