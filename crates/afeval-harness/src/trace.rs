//! Data model for test cases and recorded traces.

use afeval_mcp::ToolDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Output recorded when the model API key is missing.
pub const CREDENTIAL_ERROR_OUTPUT: &str = "Error: GEMINI_API_KEY not set";

/// Output recorded when the model produced no fragments at all.
///
/// Graders always receive non-empty output, so an empty response is
/// replaced with this sentinel.
pub const NO_OUTPUT_SENTINEL: &str = "(No output or tool calls generated)";

/// One entry of the test-case input file. Immutable after parse.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCaseSpec {
    /// Prompt given to the agent.
    pub input: String,

    /// Tool the agent is expected to call, if any.
    #[serde(default)]
    pub expected_tool: Option<String>,

    /// Expected arguments for that call.
    #[serde(default)]
    pub expected_args: Map<String, Value>,
}

impl TestCaseSpec {
    /// Expected calls registered for grading: zero or one, derived from
    /// the scalar `expected_tool` field.
    pub fn expected_calls(&self) -> Vec<ExpectedToolCall> {
        match &self.expected_tool {
            Some(name) => vec![ExpectedToolCall {
                name: name.clone(),
                arguments: self.expected_args.clone(),
            }],
            None => Vec::new(),
        }
    }
}

/// A tool invocation the test spec expects the agent to make.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedToolCall {
    pub name: String,
    pub arguments: Map<String, Value>,
}

/// A tool invocation the model proposed in one response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposedToolCall {
    pub name: String,
    pub arguments: Value,
}

/// Result of executing one proposed call.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolCallOutcome {
    Success { result: Value },
    Failure { error: String },
}

impl ToolCallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ToolCallOutcome::Success { .. })
    }
}

/// One executed tool call, in the order the model proposed it.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallRecord {
    pub call: ProposedToolCall,
    pub outcome: ToolCallOutcome,
}

/// The full recorded interaction for one test case.
///
/// Output text and the record list jointly preserve the model's fragment
/// order; a grader can correlate them positionally.
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    pub prompt: String,
    pub output: String,
    pub tool_calls: Vec<ToolCallRecord>,
    pub expected: Vec<ExpectedToolCall>,
    pub tools: Vec<ToolDescriptor>,
    pub model: String,
    pub recorded_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl Trace {
    /// Trace for a case that failed before (or instead of) producing
    /// model output: the prompt is preserved, the output carries the
    /// error text, and no calls are recorded.
    pub fn error_case(
        spec: &TestCaseSpec,
        model: &str,
        tools: Vec<ToolDescriptor>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            prompt: spec.input.clone(),
            output: output.into(),
            tool_calls: Vec::new(),
            expected: spec.expected_calls(),
            tools,
            model: model.to_string(),
            recorded_at: Utc::now(),
            duration_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_deserialize_full() {
        let json = r#"{
            "input": "List my files",
            "expected_tool": "list_files",
            "expected_args": {}
        }"#;
        let spec: TestCaseSpec = serde_json::from_str(json).unwrap();

        assert_eq!(spec.input, "List my files");
        assert_eq!(spec.expected_tool.as_deref(), Some("list_files"));
        assert!(spec.expected_args.is_empty());
    }

    #[test]
    fn test_spec_deserialize_defaults() {
        let json = r#"{ "input": "Say hello" }"#;
        let spec: TestCaseSpec = serde_json::from_str(json).unwrap();

        assert!(spec.expected_tool.is_none());
        assert!(spec.expected_args.is_empty());
    }

    #[test]
    fn test_expected_calls_single() {
        let json = r#"{
            "input": "Turn on the flashlight",
            "expected_tool": "set_flashlight",
            "expected_args": { "enabled": true }
        }"#;
        let spec: TestCaseSpec = serde_json::from_str(json).unwrap();

        let expected = spec.expected_calls();
        assert_eq!(expected.len(), 1);
        assert_eq!(expected[0].name, "set_flashlight");
        assert_eq!(expected[0].arguments.get("enabled"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_expected_calls_empty_without_expected_tool() {
        let spec: TestCaseSpec = serde_json::from_str(r#"{ "input": "Say hello" }"#).unwrap();
        assert!(spec.expected_calls().is_empty());
    }

    #[test]
    fn test_error_case_trace() {
        let spec: TestCaseSpec =
            serde_json::from_str(r#"{ "input": "List my files", "expected_tool": "list_files" }"#)
                .unwrap();

        let trace = Trace::error_case(&spec, "gemini-2.5-flash", Vec::new(), "Error: boom");

        assert_eq!(trace.prompt, "List my files");
        assert_eq!(trace.output, "Error: boom");
        assert!(trace.tool_calls.is_empty());
        assert_eq!(trace.expected.len(), 1);
    }

    #[test]
    fn test_outcome_serialization() {
        let record = ToolCallRecord {
            call: ProposedToolCall {
                name: "list_files".to_string(),
                arguments: serde_json::json!({}),
            },
            outcome: ToolCallOutcome::Failure {
                error: "unknown tool".to_string(),
            },
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["call"]["name"], "list_files");
        assert_eq!(value["outcome"]["status"], "failure");
        assert_eq!(value["outcome"]["error"], "unknown tool");
    }
}
