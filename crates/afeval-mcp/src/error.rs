use thiserror::Error;

/// Errors raised while establishing or using a tool-provider session.
///
/// `Spawn` and `Handshake` cover the connection phase and propagate to the
/// batch runner; `CallTool` is folded into trace records by the executor.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to launch tool server process: {0}")]
    Spawn(String),

    #[error("tool server handshake failed: {0}")]
    Handshake(String),

    #[error("failed to list tools: {0}")]
    ListTools(String),

    #[error("tool call '{name}' failed: {message}")]
    CallTool { name: String, message: String },
}

pub type Result<T> = std::result::Result<T, SessionError>;
