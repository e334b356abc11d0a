//! MCP (Model Context Protocol) client integration for afeval.
//!
//! This crate provides:
//! - Launch configuration for a stdio tool-provider subprocess
//! - Session lifecycle (spawn, handshake, tool catalog, teardown) via rmcp
//! - Tool descriptor conversion to rig's tool definition format

pub mod config;
pub mod error;
pub mod session;
pub mod tools;

pub use config::ToolServerConfig;
pub use error::{Result, SessionError};
pub use session::{EvalClientHandler, ToolServerSession};
pub use tools::{ToolCallResult, ToolDescriptor, ToolResultContent};
