//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw `[logging]` section
///
/// Paths support a leading `~/`.
///
/// # Example
///
/// ```toml
/// [logging]
/// directory = "~/.local/state/thinktank/logs"   # daily-rolling diagnostics
/// event_log = "thinktank.events.jsonl"           # request event log
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub directory: Option<String>,
    pub event_log: Option<String>,
}

impl FileLoggingConfig {
    pub fn directory_path(&self) -> Option<PathBuf> {
        self.directory.as_deref().map(expand_home)
    }

    pub fn event_log_path(&self) -> Option<PathBuf> {
        self.event_log.as_deref().map(expand_home)
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paths_pass_through() {
        let config = FileLoggingConfig {
            directory: Some("/var/log/thinktank".to_string()),
            event_log: None,
        };
        assert_eq!(config.directory_path(), Some(PathBuf::from("/var/log/thinktank")));
        assert_eq!(config.event_log_path(), None);
    }

    #[test]
    fn test_home_expansion() {
        let config = FileLoggingConfig {
            directory: None,
            event_log: Some("~/events.jsonl".to_string()),
        };
        let path = config.event_log_path().unwrap();
        assert!(path.ends_with("events.jsonl"));
        if dirs::home_dir().is_some() {
            assert!(!path.starts_with("~"));
        }
    }
}
