//! Batch runner: one fresh session and one trace per test case.

use afeval_mcp::{ToolDescriptor, ToolServerSession};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::assembler::assemble_trace;
use crate::config::{EvalEnv, RunnerConfig};
use crate::driver::AgentTurnDriver;
use crate::executor::ToolInvoker;
use crate::trace::{TestCaseSpec, Trace, CREDENTIAL_ERROR_OUTPUT};

/// Runs test cases strictly sequentially.
///
/// Each case gets its own tool-provider session, torn down before the next
/// case starts. A failing case never stops the batch: whatever went wrong
/// is folded into that case's trace, and the output collection stays in
/// 1:1 order with the input specs.
pub struct BatchRunner {
    config: RunnerConfig,
    driver: Option<AgentTurnDriver>,
}

impl BatchRunner {
    /// Build a runner. The agent driver is only constructed when an API
    /// key was resolved; without one, every case records the credential
    /// error sentinel instead.
    pub fn new(config: RunnerConfig, env: &EvalEnv) -> Result<Self> {
        let driver = match &env.agent_api_key {
            Some(key) => Some(AgentTurnDriver::new(key, &config.model, config.temperature)?),
            None => None,
        };
        Ok(Self { config, driver })
    }

    pub async fn run(&self, specs: &[TestCaseSpec]) -> Vec<Trace> {
        let progress = self.config.show_progress.then(|| {
            let pb = ProgressBar::new(specs.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  {bar:40.cyan/blue} {pos}/{len} {msg}")
                    .unwrap(),
            );
            pb
        });

        let mut traces = Vec::with_capacity(specs.len());
        for spec in specs {
            tracing::info!(model = %self.config.model, input = %spec.input, "testing input");
            if let Some(pb) = &progress {
                pb.set_message(spec.input.clone());
            }

            traces.push(self.run_case(spec).await);

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        traces
    }

    /// Run one case. Infallible: every error becomes an error-indicating
    /// trace for this case.
    pub async fn run_case(&self, spec: &TestCaseSpec) -> Trace {
        let start = std::time::Instant::now();

        let mut trace = match self.run_case_scoped(spec).await {
            Ok(trace) => trace,
            Err(e) => {
                tracing::error!(input = %spec.input, error = %e, "test case failed before producing output");
                Trace::error_case(spec, &self.config.model, Vec::new(), format!("Error: {}", e))
            }
        };

        trace.duration_ms = start.elapsed().as_millis() as u64;
        trace
    }

    /// Scoped session lifecycle: connect, drive, and close on every exit
    /// path. Connection errors propagate to `run_case`.
    async fn run_case_scoped(&self, spec: &TestCaseSpec) -> Result<Trace> {
        let session = ToolServerSession::connect(&self.config.server).await?;
        let tools = session.tools().to_vec();
        let trace = self.drive_case(spec, tools, &session).await;
        session.close().await;
        Ok(trace)
    }

    async fn drive_case(
        &self,
        spec: &TestCaseSpec,
        tools: Vec<ToolDescriptor>,
        invoker: &dyn ToolInvoker,
    ) -> Trace {
        let driver = match &self.driver {
            Some(driver) => driver,
            None => {
                tracing::error!(
                    "{} environment variable is not set; set it to run evaluations with Gemini",
                    crate::config::AGENT_API_KEY_VAR
                );
                return Trace::error_case(spec, &self.config.model, tools, CREDENTIAL_ERROR_OUTPUT);
            }
        };

        match driver.run_turn(&spec.input, &tools).await {
            Ok(fragments) => {
                assemble_trace(spec, &self.config.model, tools, fragments, invoker).await
            }
            Err(e) => {
                tracing::error!(error = %e, "Gemini API error");
                Trace::error_case(spec, &self.config.model, tools, format!("Error: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use afeval_mcp::{SessionError, ToolCallResult, ToolServerConfig};
    use async_trait::async_trait;

    use super::*;

    struct NeverInvoked;

    #[async_trait]
    impl ToolInvoker for NeverInvoked {
        async fn invoke(
            &self,
            name: &str,
            _arguments: &serde_json::Value,
        ) -> Result<ToolCallResult, SessionError> {
            panic!("tool '{}' should not have been invoked", name);
        }
    }

    fn specs(inputs: &[&str]) -> Vec<TestCaseSpec> {
        inputs
            .iter()
            .map(|input| serde_json::from_str(&format!(r#"{{ "input": "{}" }}"#, input)).unwrap())
            .collect()
    }

    fn unreachable_server_config() -> RunnerConfig {
        let server = ToolServerConfig::new(
            "/nonexistent/afeval-tool-server",
            vec!["build/index.js".to_string(), "com.example.app".to_string()],
        );
        RunnerConfig::new("gemini-2.5-flash", server)
    }

    fn no_keys() -> EvalEnv {
        EvalEnv {
            agent_api_key: None,
            judge_api_key: None,
        }
    }

    #[tokio::test]
    async fn test_connection_failure_yields_trace_and_batch_continues() {
        let runner = BatchRunner::new(unreachable_server_config(), &no_keys()).unwrap();
        let specs = specs(&["List my files", "Say hello"]);

        let traces = runner.run(&specs).await;

        assert_eq!(traces.len(), 2);
        for (trace, spec) in traces.iter().zip(&specs) {
            assert_eq!(trace.prompt, spec.input);
            assert!(trace.output.starts_with("Error:"), "output: {}", trace.output);
            assert!(trace.tool_calls.is_empty());
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_yield_sentinel_trace() {
        let runner = BatchRunner::new(unreachable_server_config(), &no_keys()).unwrap();
        let spec = &specs(&["List my files"])[0];

        let trace = runner.drive_case(spec, Vec::new(), &NeverInvoked).await;

        assert_eq!(trace.output, CREDENTIAL_ERROR_OUTPUT);
        assert!(trace.tool_calls.is_empty());
    }
}
