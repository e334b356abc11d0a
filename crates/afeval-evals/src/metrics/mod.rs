//! Evaluation metrics for grading recorded traces.
//!
//! - `ToolCorrectnessMetric`: checks recorded calls against expectations
//! - `McpUseMetric`: LLM judge for tool-use quality

mod mcp_use;
mod tool_correctness;

pub use mcp_use::McpUseMetric;
pub use tool_correctness::ToolCorrectnessMetric;

use afeval_harness::Trace;
use anyhow::Result;
use async_trait::async_trait;

/// Result of evaluating a metric against one trace.
#[derive(Debug, Clone)]
pub enum MetricResult {
    /// Metric passed.
    Pass,
    /// Metric failed with a reason.
    Fail { reason: String },
    /// Metric returned a score.
    Score { value: f64, max: f64 },
    /// Metric was skipped.
    Skip { reason: String },
}

impl MetricResult {
    /// Check if the metric passed.
    ///
    /// Skip results are neutral and count as passed.
    pub fn passed(&self) -> bool {
        match self {
            MetricResult::Pass => true,
            MetricResult::Score { value, max } => *value >= *max * 0.7,
            MetricResult::Skip { .. } => true,
            MetricResult::Fail { .. } => false,
        }
    }
}

/// Context handed to metrics: one trace, owned by the evaluation stage.
pub struct EvalContext {
    pub trace: Trace,
}

/// Trait for evaluation metrics.
#[async_trait]
pub trait Metric: Send + Sync {
    /// Name of the metric.
    fn name(&self) -> &str;

    /// Evaluate the metric against one trace.
    async fn evaluate(&self, ctx: &EvalContext) -> Result<MetricResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passed_states() {
        assert!(MetricResult::Pass.passed());
        assert!(MetricResult::Skip {
            reason: "n/a".to_string()
        }
        .passed());
        assert!(!MetricResult::Fail {
            reason: "nope".to_string()
        }
        .passed());
    }

    #[test]
    fn test_score_threshold() {
        assert!(MetricResult::Score {
            value: 7.0,
            max: 10.0
        }
        .passed());
        assert!(!MetricResult::Score {
            value: 6.9,
            max: 10.0
        }
        .passed());
    }
}
