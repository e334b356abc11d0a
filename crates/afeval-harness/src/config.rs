//! Run configuration, resolved once at process start.

use afeval_mcp::ToolServerConfig;

/// Environment variable holding the agent model's API key.
pub const AGENT_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Environment variable holding the grading model's API key.
pub const JUDGE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// API credentials resolved from the environment.
///
/// Resolved exactly once, in the CLI, and passed down explicitly; deeper
/// components never re-read the environment. The judge key falls back to
/// the agent key when only the latter is set.
#[derive(Debug, Clone)]
pub struct EvalEnv {
    pub agent_api_key: Option<String>,
    pub judge_api_key: Option<String>,
}

impl EvalEnv {
    pub fn from_env() -> Self {
        let agent_api_key = read_var(AGENT_API_KEY_VAR);
        let judge_api_key = read_var(JUDGE_API_KEY_VAR).or_else(|| agent_api_key.clone());
        Self {
            agent_api_key,
            judge_api_key,
        }
    }
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Configuration for one batch run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Model used as the agent.
    pub model: String,

    /// Sampling temperature for agent turns.
    pub temperature: f64,

    /// How to launch the tool-provider subprocess.
    pub server: ToolServerConfig,

    /// Draw a progress bar while the batch runs.
    pub show_progress: bool,
}

impl RunnerConfig {
    pub fn new(model: impl Into<String>, server: ToolServerConfig) -> Self {
        Self {
            model: model.into(),
            temperature: 1.0,
            server,
            show_progress: false,
        }
    }
}
