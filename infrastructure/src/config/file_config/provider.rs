//! AI provider configuration from TOML (`[provider]` section)

use super::invalid_enum;
use serde::{Deserialize, Serialize};
use std::fmt;
use thinktank_domain::ConfigIssue;

/// Which AI service adapter the CLI wires in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Deterministic local generation, no network
    #[default]
    Offline,
    /// OpenAI-compatible chat-completions endpoint
    Http,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Offline => write!(f, "offline"),
            ProviderKind::Http => write!(f, "http"),
        }
    }
}

/// Raw `[provider]` section
///
/// # Example
///
/// ```toml
/// [provider]
/// kind = "http"
/// base_url = "https://api.openai.com/v1"
/// model = "gpt-4o-mini"
/// api_key_env = "OPENAI_API_KEY"
/// temperature = 0.7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    pub kind: String,
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the bearer token
    pub api_key_env: String,
    pub temperature: f64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            kind: "offline".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.7,
        }
    }
}

impl FileProviderConfig {
    pub fn parse_kind(&self) -> (ProviderKind, Vec<ConfigIssue>) {
        match self.kind.to_lowercase().as_str() {
            "offline" => (ProviderKind::Offline, vec![]),
            "http" | "openai" => (ProviderKind::Http, vec![]),
            _ => (
                ProviderKind::Offline,
                vec![invalid_enum("provider.kind", &self.kind, &["offline", "http"], "offline")],
            ),
        }
    }

    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty())
    }
}
