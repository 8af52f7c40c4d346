//! Tree-of-thought generation for a single agent
//!
//! Expansion is breadth-first. At each step the AI service proposes `k`
//! candidates per frontier node; the best `b` that improve on their parent
//! by more than `convergence_epsilon` become children, the rest are kept as
//! alternatives on those children. A node with no improving candidate is
//! converged and is not expanded further.

use crate::config::ThoughtParams;
use crate::ports::ai_service::{AiService, AiServiceError, ThoughtRequest};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use thinktank_domain::thought::select_top;
use thinktank_domain::{Agent, DomainError, ProjectContext, Thought, ThoughtCandidate, ThoughtTree};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while growing a thought tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThoughtGenerationError {
    #[error("AI service error: {0}")]
    Service(#[from] AiServiceError),

    #[error("Agent {0} produced no usable candidates")]
    NoCandidates(String),

    #[error("Thought tree rejected a node: {0}")]
    Tree(#[from] DomainError),
}

/// Grows thought trees using an [`AiService`]
pub struct ThoughtEngine<S: AiService + ?Sized> {
    service: Arc<S>,
    params: ThoughtParams,
    call_timeout: Option<Duration>,
}

impl<S: AiService + ?Sized> Clone for ThoughtEngine<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            params: self.params,
            call_timeout: self.call_timeout,
        }
    }
}

impl<S: AiService + ?Sized> ThoughtEngine<S> {
    pub fn new(service: Arc<S>, params: ThoughtParams) -> Self {
        Self {
            service,
            params,
            call_timeout: None,
        }
    }

    /// Bound every AI call; expiry counts as [`AiServiceError::Timeout`].
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn params(&self) -> &ThoughtParams {
        &self.params
    }

    /// Same engine restricted to a single level of top-level thoughts.
    pub fn shallow(&self) -> Self {
        Self {
            params: self.params.shallow(),
            ..self.clone()
        }
    }

    /// Generate the thoughts of one agent, parents before children.
    pub async fn generate_thoughts(
        &self,
        context: &ProjectContext,
        user_input: &str,
        agent: &Agent,
    ) -> Result<Vec<Thought>, ThoughtGenerationError> {
        Ok(self.build_tree(context, user_input, agent).await?.into_thoughts())
    }

    /// Generate the thought tree of one agent.
    ///
    /// Fails if the top-level request fails or yields nothing usable.
    /// Failures deeper in the tree only stop the affected branch.
    pub async fn build_tree(
        &self,
        context: &ProjectContext,
        user_input: &str,
        agent: &Agent,
    ) -> Result<ThoughtTree, ThoughtGenerationError> {
        let k = self.params.candidates_per_step;
        let branching = self.params.bounds.max_branching;
        let mut tree = ThoughtTree::new(self.params.bounds);

        let candidates = self
            .request(context, ThoughtRequest::root(user_input, k), agent)
            .await?;
        let selection = select_top(candidates, branching);
        if selection.kept.is_empty() {
            return Err(ThoughtGenerationError::NoCandidates(agent.name.clone()));
        }

        let alternatives = selection.discarded_contents();
        let mut frontier = Vec::with_capacity(selection.kept.len());
        for candidate in selection.kept {
            let thought =
                Thought::from_candidate(&agent.id, None, candidate).with_alternatives(alternatives.clone());
            tree.insert(thought.clone())?;
            frontier.push(thought);
        }

        for depth in 2..=self.params.bounds.max_depth {
            let requests = frontier.iter().map(|parent| {
                self.request(context, ThoughtRequest::refine(user_input, parent, k), agent)
            });
            let replies = join_all(requests).await;

            let mut next = Vec::new();
            for (parent, reply) in frontier.iter().zip(replies) {
                let candidates = match reply {
                    Ok(candidates) => candidates,
                    Err(e) => {
                        warn!(
                            "Agent {} failed to expand thought {} at depth {}: {}",
                            agent.name, parent.id, depth, e
                        );
                        continue;
                    }
                };

                let children = self.improving_children(parent, candidates);
                if children.is_empty() {
                    debug!("Thought {} converged at depth {}", parent.id, parent.depth);
                }
                for child in children {
                    tree.insert(child.clone())?;
                    next.push(child);
                }
            }

            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        info!(
            "Agent {} produced {} thoughts (depth {}, top confidence {:.2})",
            agent.name,
            tree.len(),
            tree.depth(),
            tree.top_confidence()
        );
        Ok(tree)
    }

    /// Children of `parent` worth keeping, alternatives attached.
    fn improving_children(&self, parent: &Thought, candidates: Vec<ThoughtCandidate>) -> Vec<Thought> {
        let floor = parent.confidence + self.params.convergence_epsilon;
        let (improving, stale): (Vec<_>, Vec<_>) =
            candidates.into_iter().partition(|c| c.confidence > floor);

        let selection = select_top(improving, self.params.bounds.max_branching);
        let mut alternatives = selection.discarded_contents();
        alternatives.extend(
            stale
                .into_iter()
                .filter(|c| !c.content.trim().is_empty())
                .map(|c| c.content),
        );

        selection
            .kept
            .into_iter()
            .map(|c| Thought::from_candidate(&parent.agent_id, Some(parent), c).with_alternatives(alternatives.clone()))
            .collect()
    }

    async fn request(
        &self,
        context: &ProjectContext,
        request: ThoughtRequest<'_>,
        agent: &Agent,
    ) -> Result<Vec<ThoughtCandidate>, AiServiceError> {
        let call = self.service.generate_thoughts(context, request, agent);
        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or(Err(AiServiceError::Timeout)),
            None => call.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::ScriptedAiService;
    use thinktank_domain::AgentRole;

    fn agent(name: &str) -> Agent {
        Agent::new("proj", name, AgentRole::Strategy).with_id(name)
    }

    fn candidate(content: &str, confidence: f64) -> ThoughtCandidate {
        ThoughtCandidate::new(content, confidence)
    }

    #[tokio::test]
    async fn test_top_level_keeps_best_branching_candidates() {
        let service = ScriptedAiService::new().with_root(
            "ada",
            vec![
                candidate("use REST", 0.7),
                candidate("use gRPC", 0.6),
                candidate("use SOAP", 0.2),
            ],
        );
        let engine = ThoughtEngine::new(Arc::new(service), ThoughtParams::default());

        let tree = engine
            .build_tree(&ProjectContext::default(), "Design an API", &agent("ada"))
            .await
            .unwrap();

        let roots: Vec<_> = tree.roots().collect();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].content, "use REST");
        assert_eq!(roots[1].content, "use gRPC");
        assert_eq!(roots[0].alternatives, vec!["use SOAP".to_string()]);
        assert_eq!(roots[1].alternatives, vec!["use SOAP".to_string()]);
    }

    #[tokio::test]
    async fn test_children_must_improve_on_parent() {
        let service = ScriptedAiService::new()
            .with_root("ada", vec![candidate("use REST", 0.6)])
            .with_refinement(
                "use REST",
                vec![
                    candidate("use REST with pagination", 0.8),
                    candidate("use REST quickly", 0.61),
                ],
            );
        let engine = ThoughtEngine::new(Arc::new(service), ThoughtParams::default());

        let tree = engine
            .build_tree(&ProjectContext::default(), "Design an API", &agent("ada"))
            .await
            .unwrap();

        assert_eq!(tree.len(), 2);
        let top = tree.top_thought().unwrap();
        assert_eq!(top.content, "use REST with pagination");
        assert_eq!(top.depth, 2);
        assert_eq!(top.alternatives, vec!["use REST quickly".to_string()]);
    }

    #[tokio::test]
    async fn test_tree_respects_bounds() {
        let service = ScriptedAiService::new()
            .with_root("ada", vec![candidate("a", 0.1), candidate("b", 0.1), candidate("c", 0.1)])
            .improving_refinements(0.1);
        let params = ThoughtParams::default().with_max_depth(3).with_branching(2);
        let engine = ThoughtEngine::new(Arc::new(service), params);

        let tree = engine
            .build_tree(&ProjectContext::default(), "Design an API", &agent("ada"))
            .await
            .unwrap();

        assert!(tree.validate().is_ok());
        assert!(tree.depth() <= 3);
        for thought in tree.iter() {
            assert!(tree.children(&thought.id).count() <= 2);
            if let Some(parent_id) = &thought.parent_id {
                let parent = tree.get(parent_id).unwrap();
                assert_eq!(thought.depth, parent.depth + 1);
            }
        }
        // 2 roots, 4 children, 8 grandchildren
        assert_eq!(tree.len(), 14);
    }

    #[tokio::test]
    async fn test_top_level_failure_is_an_error() {
        let service = ScriptedAiService::new()
            .with_root_failure("ada", AiServiceError::Unavailable("down".into()));
        let engine = ThoughtEngine::new(Arc::new(service), ThoughtParams::default());

        let err = engine
            .generate_thoughts(&ProjectContext::default(), "x", &agent("ada"))
            .await
            .unwrap_err();
        assert!(matches!(err, ThoughtGenerationError::Service(AiServiceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_empty_top_level_is_an_error() {
        let service = ScriptedAiService::new().with_root("ada", vec![candidate("   ", 0.9)]);
        let engine = ThoughtEngine::new(Arc::new(service), ThoughtParams::default());

        let err = engine
            .generate_thoughts(&ProjectContext::default(), "x", &agent("ada"))
            .await
            .unwrap_err();
        assert_eq!(err, ThoughtGenerationError::NoCandidates("ada".to_string()));
    }

    #[tokio::test]
    async fn test_deeper_failure_keeps_partial_tree() {
        let service = ScriptedAiService::new()
            .with_root("ada", vec![candidate("use REST", 0.6)])
            .with_refinement_failure("use REST", AiServiceError::Timeout);
        let engine = ThoughtEngine::new(Arc::new(service), ThoughtParams::default());

        let thoughts = engine
            .generate_thoughts(&ProjectContext::default(), "x", &agent("ada"))
            .await
            .unwrap();
        assert_eq!(thoughts.len(), 1);
        assert!(thoughts[0].is_root());
    }

    #[tokio::test]
    async fn test_shallow_engine_never_refines() {
        let service = Arc::new(
            ScriptedAiService::new()
                .with_root("ada", vec![candidate("use REST", 0.6)])
                .improving_refinements(0.2),
        );
        let engine = ThoughtEngine::new(Arc::clone(&service), ThoughtParams::default()).shallow();

        let tree = engine
            .build_tree(&ProjectContext::default(), "x", &agent("ada"))
            .await
            .unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(service.thought_calls(), 1);
    }

    #[tokio::test]
    async fn test_call_timeout_maps_to_service_timeout() {
        let service = ScriptedAiService::new().with_root_hang("ada");
        let engine = ThoughtEngine::new(Arc::new(service), ThoughtParams::default())
            .with_call_timeout(Some(Duration::from_millis(20)));

        let err = engine
            .build_tree(&ProjectContext::default(), "x", &agent("ada"))
            .await
            .unwrap_err();
        assert_eq!(err, ThoughtGenerationError::Service(AiServiceError::Timeout));
    }
}
