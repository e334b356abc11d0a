use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Launch configuration for a stdio tool-provider subprocess.
///
/// The spawned process inherits the current environment; entries in `env`
/// are layered on top of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolServerConfig {
    /// Executable to spawn.
    pub command: String,

    /// Arguments for the command.
    #[serde(default)]
    pub args: Vec<String>,

    /// Extra environment variables for the subprocess.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl ToolServerConfig {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            env: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialize_defaults() {
        let json = r#"{ "command": "node" }"#;
        let config: ToolServerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.command, "node");
        assert!(config.args.is_empty());
        assert!(config.env.is_empty());
    }

    #[test]
    fn test_config_deserialize_full() {
        let json = r#"{
            "command": "node",
            "args": ["build/index.js", "com.example.app"],
            "env": { "DEBUG": "1" }
        }"#;
        let config: ToolServerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.args, vec!["build/index.js", "com.example.app"]);
        assert_eq!(config.env.get("DEBUG"), Some(&"1".to_string()));
    }

    #[test]
    fn test_config_new() {
        let config = ToolServerConfig::new("node", vec!["server.js".to_string()]);
        assert_eq!(config.command, "node");
        assert_eq!(config.args, vec!["server.js"]);
        assert!(config.env.is_empty());
    }
}
