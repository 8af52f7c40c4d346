//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Answer plus agents, consensus and optimization details
    Full,
    /// Only the answer and its confidence
    Response,
    /// JSON output
    Json,
}

/// CLI arguments for thinktank
#[derive(Parser, Debug)]
#[command(name = "thinktank")]
#[command(author, version, about = "A team of reasoning agents that answers together")]
#[command(long_about = r#"
thinktank asks a team of reasoning agents to answer a request together.

Each agent grows a tree of candidate thoughts, the team reconciles where
their best thoughts disagree, and the agreed draft is refined until it is
confident enough or stops improving.

Configuration files are loaded from (in priority order):
1. --config <path>          Explicit config file
2. ./thinktank.toml         Project-level config
3. ~/.config/thinktank/config.toml   Global config
4. THINKTANK_* environment variables

Example:
  thinktank "Design a REST API for a todo app"
  thinktank --offline -o full "How should we cache user sessions?"
  thinktank -C "The service is written in Rust" "Pick a web framework"
"#)]
pub struct Cli {
    /// The request for the agent team
    #[arg(required_unless_present = "show_config")]
    pub input: Option<String>,

    /// Project whose agents answer the request
    #[arg(short, long, default_value = "default", value_name = "ID")]
    pub project: String,

    /// Project context shown to the agents (can be specified multiple times)
    #[arg(short = 'C', long = "context", value_name = "TEXT")]
    pub context: Vec<String>,

    /// Use the offline AI service regardless of configuration
    #[arg(long)]
    pub offline: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "response")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Append request events to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
