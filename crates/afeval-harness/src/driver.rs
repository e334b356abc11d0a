//! Agent turn driver: one prompt in, ordered response fragments out.

use afeval_mcp::ToolDescriptor;
use anyhow::Result;
use rig::client::CompletionClient;
use rig::completion::{AssistantContent, CompletionModel as RigCompletionModel, Message, ToolDefinition};
use rig::message::{Text, UserContent};
use rig::one_or_many::OneOrMany;
use rig::providers::gemini as rig_gemini;

use crate::trace::ProposedToolCall;

/// One fragment of a model response, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFragment {
    /// Literal text for the user.
    Text(String),
    /// A tool invocation the model proposes. Never executed here; the
    /// executor decides what becomes of it.
    ToolCall(ProposedToolCall),
}

/// Drives a single agent turn against Gemini.
///
/// Uses the raw completion API, so proposed tool calls are returned to the
/// caller instead of being executed model-side.
pub struct AgentTurnDriver {
    model: rig_gemini::completion::CompletionModel,
    temperature: f64,
}

impl AgentTurnDriver {
    pub fn new(api_key: &str, model: &str, temperature: f64) -> Result<Self> {
        let client = rig_gemini::Client::new(api_key)
            .map_err(|e| anyhow::anyhow!("Failed to create Gemini client: {}", e))?;
        let model = client.completion_model(model);
        Ok(Self { model, temperature })
    }

    /// Run one turn: the prompt as the sole user message, with the
    /// session's tool catalog advertised. Returns the response fragments
    /// in the order the model emitted them.
    pub async fn run_turn(
        &self,
        prompt: &str,
        tools: &[ToolDescriptor],
    ) -> Result<Vec<ResponseFragment>> {
        let tool_definitions: Vec<ToolDefinition> =
            tools.iter().map(|t| t.to_tool_definition()).collect();

        let request = rig::completion::CompletionRequest {
            preamble: None,
            chat_history: OneOrMany::one(Message::User {
                content: OneOrMany::one(UserContent::Text(Text {
                    text: prompt.to_string(),
                })),
            }),
            documents: vec![],
            tools: tool_definitions,
            temperature: Some(self.temperature),
            max_tokens: None,
            tool_choice: None,
            additional_params: None,
        };

        let response = self.model.completion(request).await?;

        Ok(response
            .choice
            .iter()
            .filter_map(fragment_from_content)
            .collect())
    }
}

fn fragment_from_content(content: &AssistantContent) -> Option<ResponseFragment> {
    match content {
        AssistantContent::Text(text) => Some(ResponseFragment::Text(text.text.clone())),
        AssistantContent::ToolCall(call) => Some(ResponseFragment::ToolCall(ProposedToolCall {
            name: call.function.name.clone(),
            arguments: call.function.arguments.clone(),
        })),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rig::message::{ToolCall, ToolFunction};

    #[test]
    fn test_text_content_becomes_text_fragment() {
        let content = AssistantContent::Text(Text {
            text: "Hello there".to_string(),
        });

        let fragment = fragment_from_content(&content).unwrap();
        assert_eq!(fragment, ResponseFragment::Text("Hello there".to_string()));
    }

    #[test]
    fn test_tool_call_content_becomes_tool_call_fragment() {
        let content = AssistantContent::ToolCall(ToolCall {
            id: "call_1".to_string(),
            call_id: None,
            function: ToolFunction {
                name: "list_files".to_string(),
                arguments: serde_json::json!({ "path": "/sdcard" }),
            },
            signature: None,
            additional_params: None,
        });

        let fragment = fragment_from_content(&content).unwrap();
        match fragment {
            ResponseFragment::ToolCall(call) => {
                assert_eq!(call.name, "list_files");
                assert_eq!(call.arguments["path"], "/sdcard");
            }
            other => panic!("expected tool call fragment, got {:?}", other),
        }
    }
}
