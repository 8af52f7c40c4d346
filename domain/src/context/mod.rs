//! Project context - the read-only memory bundle supplied with a request.
//!
//! The engine never fetches or mutates context; callers assemble it and
//! hand it over with each request.

use crate::thought::clamp_confidence;
use serde::{Deserialize, Serialize};

/// One remembered fact with its relevance to the current request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextItem {
    pub content: String,
    /// Clamped to [0, 1]
    pub relevance: f64,
}

impl ContextItem {
    pub fn new(content: impl Into<String>, relevance: f64) -> Self {
        Self {
            content: content.into(),
            relevance: clamp_confidence(relevance),
        }
    }
}

/// Working, session and project memory for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectContext {
    pub working_memory: Vec<ContextItem>,
    pub session_memory: Vec<ContextItem>,
    pub project_memory: Vec<ContextItem>,
}

impl ProjectContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working(mut self, content: impl Into<String>, relevance: f64) -> Self {
        self.working_memory.push(ContextItem::new(content, relevance));
        self
    }

    pub fn with_session(mut self, content: impl Into<String>, relevance: f64) -> Self {
        self.session_memory.push(ContextItem::new(content, relevance));
        self
    }

    pub fn with_project(mut self, content: impl Into<String>, relevance: f64) -> Self {
        self.project_memory.push(ContextItem::new(content, relevance));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.working_memory.is_empty()
            && self.session_memory.is_empty()
            && self.project_memory.is_empty()
    }

    /// The `limit` most relevant items across all three memories.
    ///
    /// Ties keep working memory ahead of session memory ahead of project
    /// memory.
    pub fn top_items(&self, limit: usize) -> Vec<&ContextItem> {
        let mut items: Vec<&ContextItem> = self
            .working_memory
            .iter()
            .chain(&self.session_memory)
            .chain(&self.project_memory)
            .collect();
        items.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
        items.truncate(limit);
        items
    }

    /// Formats the most relevant items for use in prompts.
    pub fn to_prompt_context(&self, limit: usize) -> String {
        self.top_items(limit)
            .iter()
            .map(|item| format!("- {} (relevance {:.2})", item.content, item.relevance))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_items_orders_by_relevance() {
        let context = ProjectContext::new()
            .with_working("current file is api.rs", 0.9)
            .with_session("user prefers axum", 0.7)
            .with_project("project uses postgres", 0.95)
            .with_project("legacy notes", 0.1);

        let top: Vec<_> = context.top_items(2).iter().map(|i| i.content.as_str()).collect();
        assert_eq!(top, vec!["project uses postgres", "current file is api.rs"]);
    }

    #[test]
    fn test_prompt_context_format() {
        let context = ProjectContext::new().with_session("likes tests", 0.5);
        assert_eq!(context.to_prompt_context(5), "- likes tests (relevance 0.50)");
    }

    #[test]
    fn test_empty_context() {
        let context = ProjectContext::default();
        assert!(context.is_empty());
        assert!(context.to_prompt_context(3).is_empty());
    }
}
