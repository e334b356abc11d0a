//! Deterministic grading of recorded calls against expectations.

use anyhow::Result;
use async_trait::async_trait;

use afeval_harness::{ExpectedToolCall, ToolCallRecord};

use super::{EvalContext, Metric, MetricResult};

/// Checks that every expected tool call was actually proposed by the
/// agent, with matching argument values.
///
/// A recorded call counts whether or not its execution succeeded; the
/// metric grades the agent's choice, not the provider's behavior. Each
/// expected argument must be present with an equal value; extra arguments
/// the agent supplied on top do not fail the case.
#[derive(Debug, Default)]
pub struct ToolCorrectnessMetric;

impl ToolCorrectnessMetric {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Metric for ToolCorrectnessMetric {
    fn name(&self) -> &str {
        "tool_correctness"
    }

    async fn evaluate(&self, ctx: &EvalContext) -> Result<MetricResult> {
        let expected = &ctx.trace.expected;
        if expected.is_empty() {
            return Ok(MetricResult::Skip {
                reason: "no expected tool calls for this case".to_string(),
            });
        }

        let missing: Vec<&str> = expected
            .iter()
            .filter(|e| !ctx.trace.tool_calls.iter().any(|r| call_matches(e, r)))
            .map(|e| e.name.as_str())
            .collect();

        if missing.is_empty() {
            Ok(MetricResult::Pass)
        } else {
            Ok(MetricResult::Fail {
                reason: format!("expected tool call not made: {}", missing.join(", ")),
            })
        }
    }
}

fn call_matches(expected: &ExpectedToolCall, record: &ToolCallRecord) -> bool {
    if record.call.name != expected.name {
        return false;
    }

    expected
        .arguments
        .iter()
        .all(|(key, value)| record.call.arguments.get(key) == Some(value))
}
