use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml (all fields optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show the key-hint line at the bottom of the screen
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Named color overrides, hex strings like "#FB4196"
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

fn default_true() -> bool {
    true
}
