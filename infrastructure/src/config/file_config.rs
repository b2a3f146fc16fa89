//! File configuration schema

use serde::{Deserialize, Serialize};

/// Top-level configuration file structure
///
/// ```toml
/// [oracle]
/// base_url = "https://api.openai.com/v1"
/// model = "gpt-4o-mini"
/// api_key_env = "OPENAI_API_KEY"
/// temperature = 0.2
///
/// [repl]
/// show_progress = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub oracle: FileOracleConfig,
    pub repl: FileReplConfig,
}

/// Oracle endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOracleConfig {
    /// Base URL of an OpenAI-compatible chat-completions API
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for FileOracleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.2,
        }
    }
}

/// Interactive REPL configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show a spinner while a turn is in flight
    pub show_progress: bool,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = FileConfig::default();
        assert_eq!(config.oracle.base_url, "https://api.openai.com/v1");
        assert_eq!(config.oracle.api_key_env, "OPENAI_API_KEY");
        assert!(config.repl.show_progress);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [oracle]
            model = "local-model"
            "#,
        )
        .unwrap();
        assert_eq!(config.oracle.model, "local-model");
        assert_eq!(config.oracle.base_url, "https://api.openai.com/v1");
        assert!(config.repl.show_progress);
    }
}
