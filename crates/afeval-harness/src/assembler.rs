//! Trace assembly: fold ordered response fragments into one trace.

use afeval_mcp::ToolDescriptor;
use chrono::Utc;

use crate::driver::ResponseFragment;
use crate::executor::{execute_call, ToolInvoker};
use crate::trace::{TestCaseSpec, Trace, NO_OUTPUT_SENTINEL};

/// Walk the fragments in emission order. Text accumulates into the output
/// string; each tool-call fragment is executed to completion (call N+1
/// starts only after call N is recorded, since a later call may depend on
/// an earlier one's side effect), leaves a `Called tool X.` marker in the
/// output, and appends its record.
pub async fn assemble_trace(
    spec: &TestCaseSpec,
    model: &str,
    tools: Vec<ToolDescriptor>,
    fragments: Vec<ResponseFragment>,
    invoker: &dyn ToolInvoker,
) -> Trace {
    let mut output = String::new();
    let mut records = Vec::new();

    for fragment in fragments {
        match fragment {
            ResponseFragment::Text(text) => output.push_str(&text),
            ResponseFragment::ToolCall(call) => {
                let record = execute_call(invoker, call).await;
                output.push_str(&format!("Called tool {}.", record.call.name));
                records.push(record);
            }
        }
    }

    if output.is_empty() {
        output.push_str(NO_OUTPUT_SENTINEL);
    }

    Trace {
        prompt: spec.input.clone(),
        output,
        tool_calls: records,
        expected: spec.expected_calls(),
        tools,
        model: model.to_string(),
        recorded_at: Utc::now(),
        duration_ms: 0,
    }
}
