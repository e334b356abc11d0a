use rig::completion::ToolDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool advertised by the provider session.
///
/// One set is enumerated per session lifetime and is read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

impl ToolDescriptor {
    /// Convert to a rig ToolDefinition for model advertisement.
    ///
    /// The provider's tool names are passed through unchanged so the model
    /// proposes calls under the names the session can execute.
    pub fn to_tool_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            parameters: self.input_schema.clone(),
        }
    }
}

/// Result of one tool invocation, as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolResultContent>,
    pub is_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolResultContent {
    Text(String),
    Image { data: String, mime_type: String },
    Resource { uri: String, text: Option<String> },
}

impl ToolCallResult {
    /// Flatten into a JSON payload for trace records.
    pub fn to_record_payload(&self) -> Value {
        let mut contents = Vec::new();
        for content in &self.content {
            match content {
                ToolResultContent::Text(text) => contents.push(Value::String(text.clone())),
                ToolResultContent::Image { data, mime_type } => {
                    contents.push(serde_json::json!({
                        "type": "image",
                        "data": data,
                        "mime_type": mime_type,
                    }))
                }
                ToolResultContent::Resource { uri, text } => contents.push(serde_json::json!({
                    "type": "resource",
                    "uri": uri,
                    "text": text,
                })),
            }
        }

        serde_json::json!({
            "content": contents,
            "is_error": self.is_error,
        })
    }
}
