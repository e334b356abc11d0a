//! LLM-judged grading of tool use.
//!
//! Sends the recorded trace to the grading model and asks for a strict
//! PASS/FAIL verdict on whether the agent used the advertised tools
//! appropriately for the prompt.

use anyhow::Result;
use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::{AssistantContent, CompletionModel as RigCompletionModel, Message};
use rig::message::{Text, UserContent};
use rig::one_or_many::OneOrMany;
use rig::providers::gemini as rig_gemini;

use afeval_harness::{ToolCallOutcome, Trace};

use super::{EvalContext, Metric, MetricResult};

const JUDGE_SYSTEM_PROMPT: &str = r#"You are an expert evaluator of tool-calling AI agents.
You will be given the prompt an agent received, the tools that were available to it,
its textual output, and the tool calls it made.

Evaluate strictly and objectively whether the agent made appropriate use of the
available tools for the prompt. Do not reward style; judge tool selection,
argument quality and whether calling (or not calling) a tool was the right choice.
"#;

/// Metric that asks the grading model for a PASS/FAIL verdict on the
/// agent's overall tool use in one trace.
pub struct McpUseMetric {
    model: String,
    api_key: String,
}

impl McpUseMetric {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    fn judge_model(&self) -> Result<rig_gemini::completion::CompletionModel> {
        let client = rig_gemini::Client::new(&self.api_key)
            .map_err(|e| anyhow::anyhow!("Failed to create Gemini client: {}", e))?;
        Ok(client.completion_model(&self.model))
    }
}

#[async_trait]
impl Metric for McpUseMetric {
    fn name(&self) -> &str {
        "mcp_use"
    }

    async fn evaluate(&self, ctx: &EvalContext) -> Result<MetricResult> {
        let model = match self.judge_model() {
            Ok(model) => model,
            Err(e) => {
                tracing::warn!(metric = %self.name(), error = %e, "judge model unavailable");
                return Ok(MetricResult::Skip {
                    reason: format!("judge model unavailable: {}", e),
                });
            }
        };

        let prompt = build_judge_prompt(&ctx.trace);
        let request = rig::completion::CompletionRequest {
            preamble: Some(JUDGE_SYSTEM_PROMPT.to_string()),
            chat_history: OneOrMany::one(Message::User {
                content: OneOrMany::one(UserContent::Text(Text { text: prompt })),
            }),
            documents: vec![],
            tools: vec![],
            temperature: Some(0.0),
            max_tokens: Some(1024),
            tool_choice: None,
            additional_params: None,
        };

        let response = model.completion(request).await?;

        let response_text: String = response
            .choice
            .iter()
            .filter_map(|c| match c {
                AssistantContent::Text(t) => Some(t.text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("");

        tracing::debug!(metric = %self.name(), response = %response_text, "judge response");

        Ok(parse_verdict(&response_text))
    }
}

fn build_judge_prompt(trace: &Trace) -> String {
    let tools_section = if trace.tools.is_empty() {
        "(none)".to_string()
    } else {
        trace
            .tools
            .iter()
            .map(|t| format!("- {}: {}", t.name, t.description.as_deref().unwrap_or("")))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let calls_section = if trace.tool_calls.is_empty() {
        "(none)".to_string()
    } else {
        trace
            .tool_calls
            .iter()
            .map(|r| {
                let status = match &r.outcome {
                    ToolCallOutcome::Success { .. } => "success",
                    ToolCallOutcome::Failure { .. } => "failed",
                };
                format!(
                    "- {}({}): {}",
                    r.call.name,
                    serde_json::to_string(&r.call.arguments).unwrap_or_default(),
                    status
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"## Prompt Given to the Agent
{prompt}

## Available Tools
{tools_section}

## Agent Output
{output}

## Tool Calls Made
{calls_section}

## Instructions
Judge whether the agent made appropriate use of the available tools for this prompt.
Your response MUST start with exactly one of these two words:
- PASS - if tool use was appropriate
- FAIL - if it was not

If FAIL, add a brief reason after a colon, like: FAIL: reason here"#,
        prompt = trace.prompt,
        tools_section = tools_section,
        output = trace.output,
        calls_section = calls_section,
    )
}

fn parse_verdict(response_text: &str) -> MetricResult {
    let trimmed = response_text.trim();
    let upper = trimmed.to_uppercase();

    if upper.starts_with("PASS") {
        return MetricResult::Pass;
    }
    if upper.starts_with("FAIL") {
        let reason = trimmed
            .strip_prefix("FAIL:")
            .or_else(|| trimmed.strip_prefix("FAIL"))
            .or_else(|| trimmed.strip_prefix("Fail:"))
            .or_else(|| trimmed.strip_prefix("Fail"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "criteria not met".to_string());
        return MetricResult::Fail { reason };
    }

    // Some models wrap the verdict in prose; accept an unambiguous
    // in-body verdict before giving up.
    if upper.contains("PASS") && !upper.contains("FAIL") {
        return MetricResult::Pass;
    }
    if upper.contains("FAIL") {
        return MetricResult::Fail {
            reason: "criteria not met".to_string(),
        };
    }

    let preview: String = trimmed.chars().take(200).collect();
    MetricResult::Fail {
        reason: format!("unexpected judge response (no PASS/FAIL): {}", preview),
    }
}
