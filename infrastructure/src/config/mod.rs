//! Configuration file loading for thinktank
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./thinktank.toml` or `./.thinktank.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/thinktank/config.toml`
//! 4. `THINKTANK_*` environment variables (`THINKTANK_THOUGHTS__MAX_DEPTH=4`)
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileAgentSeed, FileCollaborationConfig, FileConfig, FileLoggingConfig, FileOptimizerConfig,
    FileOrchestratorConfig, FileProviderConfig, FileThoughtsConfig, ProviderKind, default_team,
};
pub use loader::ConfigLoader;
