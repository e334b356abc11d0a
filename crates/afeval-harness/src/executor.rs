//! Tool call execution against the active session.
//!
//! Execution failure is a data point for the graders (did the agent pick
//! a sensible tool even if the call blew up?), so every failure is folded
//! into the record and nothing propagates past this module.

use afeval_mcp::{SessionError, ToolCallResult, ToolServerSession};
use async_trait::async_trait;

use crate::trace::{ProposedToolCall, ToolCallOutcome, ToolCallRecord};

/// Seam between the executor and the tool-provider session.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    async fn invoke(
        &self,
        name: &str,
        arguments: &serde_json::Value,
    ) -> Result<ToolCallResult, SessionError>;
}

#[async_trait]
impl ToolInvoker for ToolServerSession {
    async fn invoke(
        &self,
        name: &str,
        arguments: &serde_json::Value,
    ) -> Result<ToolCallResult, SessionError> {
        self.call_tool(name, arguments).await
    }
}

/// Execute one proposed call and record whatever happened.
pub async fn execute_call(invoker: &dyn ToolInvoker, call: ProposedToolCall) -> ToolCallRecord {
    tracing::info!(tool = %call.name, args = %call.arguments, "agent wants to call tool");

    let outcome = match invoker.invoke(&call.name, &call.arguments).await {
        Ok(result) => {
            tracing::info!(tool = %call.name, "tool executed successfully");
            ToolCallOutcome::Success {
                result: result.to_record_payload(),
            }
        }
        Err(e) => {
            tracing::warn!(tool = %call.name, error = %e, "tool execution failed");
            ToolCallOutcome::Failure {
                error: e.to_string(),
            }
        }
    };

    ToolCallRecord { call, outcome }
}
