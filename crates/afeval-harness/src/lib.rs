//! Test harness for driving a tool-calling agent against an MCP server.
//!
//! One test case flows through four stages, strictly in order:
//!
//! - `runner`: opens a fresh tool-provider session per case and guarantees
//!   its teardown on every exit path
//! - `driver`: sends the prompt and the advertised tools to the model and
//!   returns the ordered response fragments (the model only *proposes*
//!   calls; nothing is executed on the model side)
//! - `executor`: invokes one proposed call against the session, folding
//!   any failure into the record instead of propagating it
//! - `assembler`: walks the fragments into an immutable per-case trace
//!
//! The `trace` module holds the data model shared with the grading layer.

pub mod assembler;
pub mod config;
pub mod driver;
pub mod executor;
pub mod runner;
pub mod trace;

pub use config::{EvalEnv, RunnerConfig, AGENT_API_KEY_VAR, JUDGE_API_KEY_VAR};
pub use driver::{AgentTurnDriver, ResponseFragment};
pub use executor::{execute_call, ToolInvoker};
pub use runner::BatchRunner;
pub use trace::{
    ExpectedToolCall, ProposedToolCall, TestCaseSpec, ToolCallOutcome, ToolCallRecord, Trace,
};
