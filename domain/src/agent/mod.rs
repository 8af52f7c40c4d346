//! Agent domain
//!
//! Agents are the reasoning participants of a project. Each carries a role,
//! capability tags, a lifecycle status and rolling performance metrics.

pub mod entities;

pub use entities::{Agent, AgentMetrics, AgentRole, AgentStatus};
