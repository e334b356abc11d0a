use rmcp::handler::client::ClientHandler;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, ClientCapabilities, Content, Implementation,
    InitializeRequestParams, RawContent,
};
use rmcp::service::{self, RoleClient, RunningService};
use rmcp::transport::child_process::TokioChildProcess;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::config::ToolServerConfig;
use crate::error::{Result, SessionError};
use crate::tools::{ToolCallResult, ToolDescriptor, ToolResultContent};

/// Client-side handler for the MCP handshake.
///
/// The harness opens one short-lived session per test case and never
/// subscribes to server notifications, so only the identification exchange
/// is customized.
#[derive(Clone, Default)]
pub struct EvalClientHandler;

impl ClientHandler for EvalClientHandler {
    fn get_info(&self) -> InitializeRequestParams {
        InitializeRequestParams {
            meta: None,
            protocol_version: Default::default(),
            capabilities: ClientCapabilities::default(),
            client_info: Implementation {
                name: "afeval".to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
        }
    }
}

/// An established session with a tool-provider subprocess.
///
/// Construction spawns the process, completes the initialize handshake and
/// enumerates the tool catalog. `close` must be called on every exit path;
/// it cancels the running service, which terminates the subprocess.
pub struct ToolServerSession {
    service: RunningService<RoleClient, EvalClientHandler>,
    tools: Vec<ToolDescriptor>,
}

impl ToolServerSession {
    pub async fn connect(config: &ToolServerConfig) -> Result<Self> {
        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args);
        for (key, value) in &config.env {
            cmd.env(key, value);
        }

        // Pipe stderr so server-side diagnostics land in our logs instead
        // of interleaving with the report output.
        let (transport, stderr) = TokioChildProcess::builder(cmd)
            .stderr(std::process::Stdio::piped())
            .spawn()
            .map_err(|e| SessionError::Spawn(e.to_string()))?;

        if let Some(stderr) = stderr {
            tokio::spawn(async move {
                let reader = BufReader::new(stderr);
                let mut lines = reader.lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::debug!(target: "afeval::tool_server", "{}", line);
                }
            });
        }

        let service = service::serve_client(EvalClientHandler, transport)
            .await
            .map_err(|e| SessionError::Handshake(e.to_string()))?;

        let tools: Vec<ToolDescriptor> = match service.list_all_tools().await {
            Ok(tools) => tools
                .into_iter()
                .map(|tool| ToolDescriptor {
                    name: tool.name.to_string(),
                    description: tool.description.map(|d| d.to_string()),
                    input_schema: serde_json::to_value(tool.input_schema)
                        .unwrap_or_else(|_| serde_json::json!({})),
                })
                .collect(),
            Err(e) => {
                let _ = service.cancel().await;
                return Err(SessionError::ListTools(e.to_string()));
            }
        };

        tracing::debug!(tool_count = tools.len(), "tool server session established");

        Ok(Self { service, tools })
    }

    /// Tools advertised during the handshake. One set per session lifetime.
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Invoke a tool by name with a JSON argument object.
    pub async fn call_tool(&self, name: &str, arguments: &serde_json::Value) -> Result<ToolCallResult> {
        let args = arguments.as_object().cloned().unwrap_or_default();
        let params = CallToolRequestParams {
            meta: None,
            name: name.to_string().into(),
            arguments: Some(args),
            task: None,
        };

        let result = self
            .service
            .call_tool(params)
            .await
            .map_err(|e| SessionError::CallTool {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(convert_call_tool_result(result))
    }

    /// Tear the session down, killing the subprocess.
    pub async fn close(self) {
        if let Err(e) = self.service.cancel().await {
            tracing::debug!("tool server shutdown: {}", e);
        }
    }
}

pub fn convert_call_tool_result(result: CallToolResult) -> ToolCallResult {
    let content = result
        .content
        .into_iter()
        .filter_map(convert_content)
        .collect();

    ToolCallResult {
        content,
        is_error: result.is_error.unwrap_or(false),
    }
}

fn convert_content(content: Content) -> Option<ToolResultContent> {
    match content.raw {
        RawContent::Text(text_content) => Some(ToolResultContent::Text(text_content.text)),
        RawContent::Image(image_content) => Some(ToolResultContent::Image {
            data: image_content.data,
            mime_type: image_content.mime_type,
        }),
        RawContent::Resource(resource) => {
            let (uri, text) = match resource.resource {
                rmcp::model::ResourceContents::TextResourceContents { uri, text, .. } => {
                    (uri, Some(text))
                }
                rmcp::model::ResourceContents::BlobResourceContents { uri, .. } => (uri, None),
            };

            Some(ToolResultContent::Resource { uri, text })
        }
        _ => None,
    }
}
