//! AI service port
//!
//! Defines the interface for the language-model backend. The engine treats
//! every call as an opaque capability returning text plus a confidence.

use async_trait::async_trait;
use thinktank_domain::{
    Agent, AgentResponse, ProjectContext, PromptTemplate, Thought, ThoughtCandidate,
    parse_quality_score,
};
use thiserror::Error;

/// Errors that can occur during AI service calls
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AiServiceError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Timeout")]
    Timeout,

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Malformed output: {0}")]
    MalformedOutput(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

/// A request for candidate continuations.
#[derive(Debug, Clone, Copy)]
pub struct ThoughtRequest<'a> {
    pub user_input: &'a str,
    /// Thought being refined; `None` asks for top-level approaches
    pub parent: Option<&'a Thought>,
    /// Number of candidates wanted
    pub candidates: usize,
}

impl<'a> ThoughtRequest<'a> {
    pub fn root(user_input: &'a str, candidates: usize) -> Self {
        Self {
            user_input,
            parent: None,
            candidates,
        }
    }

    pub fn refine(user_input: &'a str, parent: &'a Thought, candidates: usize) -> Self {
        Self {
            user_input,
            parent: Some(parent),
            candidates,
        }
    }
}

/// Gateway to the language-model backend
///
/// Implementations (adapters) live in the infrastructure layer. Every method
/// returns a typed failure; none may panic on bad backend output.
#[async_trait]
pub trait AiService: Send + Sync {
    /// Propose candidate thoughts for one agent.
    async fn generate_thoughts(
        &self,
        context: &ProjectContext,
        request: ThoughtRequest<'_>,
        agent: &Agent,
    ) -> Result<Vec<ThoughtCandidate>, AiServiceError>;

    /// Answer a free-form prompt.
    async fn generate_response(
        &self,
        prompt: &str,
        context: &ProjectContext,
    ) -> Result<AgentResponse, AiServiceError>;

    /// Produce an improved version of `response` guided by `feedback`.
    async fn optimize_response(
        &self,
        response: &AgentResponse,
        feedback: &str,
        context: &ProjectContext,
    ) -> Result<AgentResponse, AiServiceError>;

    /// Rate the quality of a response in [0, 1].
    ///
    /// Default implementation asks [`generate_response`](Self::generate_response)
    /// for a rating and parses the score from its content.
    async fn assess_quality(
        &self,
        response: &AgentResponse,
        context: &ProjectContext,
    ) -> Result<f64, AiServiceError> {
        let rating = self
            .generate_response(&PromptTemplate::quality_rating_prompt(response), context)
            .await?;
        parse_quality_score(&rating.content).ok_or_else(|| {
            AiServiceError::MalformedOutput(format!(
                "no quality score in rating: {}",
                thinktank_domain::util::truncate_str(&rating.content, 120)
            ))
        })
    }
}
