use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where tracing output goes. Logging is off when unset.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub task: TaskConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// How the external task tool is invoked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default = "default_command")]
    pub command: String,
    /// Extra arguments placed before every subcommand (e.g. `rc.context=none`)
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for TaskConfig {
    fn default() -> Self {
        TaskConfig {
            command: default_command(),
            args: Vec::new(),
        }
    }
}

fn default_command() -> String {
    "task".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Hex color overrides keyed by theme field name
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}
