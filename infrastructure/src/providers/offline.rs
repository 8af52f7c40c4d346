//! Deterministic offline AI service
//!
//! Generates role-flavoured reasoning from templates so the whole engine can
//! run without a network. The same agent, input and parent always produce
//! the same candidates and confidences.

use async_trait::async_trait;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::Duration;
use thinktank_application::{AiService, AiServiceError, ThoughtRequest};
use thinktank_domain::util::truncate_str;
use thinktank_domain::{Agent, AgentResponse, AgentRole, ProjectContext, ThoughtCandidate};
use tracing::debug;

/// Longest excerpt of the request quoted in generated text, in bytes
const TOPIC_BYTES: usize = 80;

const STRATEGY: [&str; 3] = [
    "Frame {topic} around its core goal and hard constraints before choosing tools",
    "Compare two candidate architectures for {topic} and keep the simpler one",
    "Split {topic} into milestones that start with a reversible first step",
];

const IMPLEMENTATION: [&str; 3] = [
    "Define the interfaces for {topic} first, then fill in the handlers",
    "Build a thin end-to-end slice of {topic} and iterate on it",
    "Assemble {topic} from well-tested libraries instead of custom code",
];

const REVIEW: [&str; 3] = [
    "Check {topic} for failure modes and missing input validation",
    "List the edge cases {topic} must handle before release",
    "Verify {topic} against security and performance risks",
];

const RESEARCH: [&str; 3] = [
    "Survey how established projects approach {topic}",
    "Collect evidence on the trade-offs that matter for {topic}",
    "Identify standards and conventions that apply to {topic}",
];

const REFINEMENTS: [&str; 4] = [
    "spell out the concrete steps",
    "address the biggest risk explicitly",
    "add a way to verify the result",
    "trim anything outside the request",
];

const IMPROVEMENTS: [&str; 4] = [
    "Next steps: agree on the interface, implement the smallest slice, then measure.",
    "Edge cases: empty input, partial failure and retries are handled explicitly.",
    "Verification: each step has a check that can fail loudly.",
    "Open questions are listed so the team can resolve them early.",
];

/// AI service backed by templates instead of a model
#[derive(Debug, Clone, Default)]
pub struct OfflineAiService {
    latency: Option<Duration>,
}

impl OfflineAiService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before every reply, to mimic a remote backend.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn base_confidence(role: &AgentRole) -> f64 {
        match role {
            AgentRole::Strategy => 0.72,
            AgentRole::Implementation => 0.7,
            AgentRole::Review => 0.66,
            AgentRole::Research => 0.64,
            AgentRole::Custom(_) => 0.6,
        }
    }

    fn templates(role: &AgentRole) -> Vec<String> {
        match role {
            AgentRole::Strategy => STRATEGY.iter().map(|t| t.to_string()).collect(),
            AgentRole::Implementation => IMPLEMENTATION.iter().map(|t| t.to_string()).collect(),
            AgentRole::Review => REVIEW.iter().map(|t| t.to_string()).collect(),
            AgentRole::Research => RESEARCH.iter().map(|t| t.to_string()).collect(),
            AgentRole::Custom(name) => vec![
                format!("Examine {{topic}} from the {} perspective", name),
                format!("Point out what {} concerns change about {{topic}}", name),
                format!("Propose a {}-first plan for {{topic}}", name),
            ],
        }
    }
}

/// Deterministic value in `[0, 1)` derived from `parts`.
fn jitter(parts: &[&str]) -> f64 {
    let mut hasher = DefaultHasher::new();
    parts.hash(&mut hasher);
    (hasher.finish() % 1_000) as f64 / 1_000.0
}

fn topic(user_input: &str) -> String {
    let line = user_input.lines().next().unwrap_or_default().trim();
    let line = line.trim_end_matches(['.', '?', '!']);
    if line.is_empty() {
        return "the request".to_string();
    }
    let excerpt = truncate_str(line, TOPIC_BYTES);
    let mut chars = excerpt.chars();
    match chars.next() {
        Some(first) => format!("\"{}{}\"", first.to_lowercase(), chars.as_str()),
        None => "the request".to_string(),
    }
}

/// Heuristic quality: longer, structured answers score higher, capped below 1.
fn heuristic_quality(content: &str) -> f64 {
    let words = content.split_whitespace().count().max(1) as f64;
    let structure = content.lines().filter(|l| l.contains(':')).count().min(4) as f64;
    (0.35 + words.ln() / 12.0 + structure * 0.04).clamp(0.0, 0.95)
}

#[async_trait]
impl AiService for OfflineAiService {
    async fn generate_thoughts(
        &self,
        _context: &ProjectContext,
        request: ThoughtRequest<'_>,
        agent: &Agent,
    ) -> Result<Vec<ThoughtCandidate>, AiServiceError> {
        self.pause().await;

        let candidates: Vec<ThoughtCandidate> = match request.parent {
            None => {
                let topic = topic(request.user_input);
                let base = Self::base_confidence(&agent.role);
                Self::templates(&agent.role)
                    .iter()
                    .cycle()
                    .take(request.candidates)
                    .enumerate()
                    .map(|(i, template)| {
                        let noise = jitter(&[agent.id.as_str(), request.user_input, template.as_str()]);
                        ThoughtCandidate::new(
                            template.replace("{topic}", &topic),
                            base - 0.06 * i as f64 + 0.05 * noise,
                        )
                    })
                    .collect()
            }
            Some(parent) => {
                // Gains shrink with depth so refinement converges
                let gain = 0.12 / parent.depth as f64;
                REFINEMENTS
                    .iter()
                    .cycle()
                    .skip(parent.depth.saturating_sub(1))
                    .take(request.candidates)
                    .enumerate()
                    .map(|(i, step)| {
                        let noise = jitter(&[agent.id.as_str(), parent.content.as_str(), *step]);
                        ThoughtCandidate::new(
                            format!("{}, and {}", parent.content, step),
                            parent.confidence + gain - 0.04 * i as f64 + 0.01 * noise,
                        )
                    })
                    .collect()
            }
        };

        debug!(
            "Offline service produced {} candidates for {}",
            candidates.len(),
            agent.name
        );
        Ok(candidates)
    }

    async fn generate_response(
        &self,
        prompt: &str,
        _context: &ProjectContext,
    ) -> Result<AgentResponse, AiServiceError> {
        self.pause().await;
        let request = prompt
            .rsplit_once("Request:\n")
            .map(|(_, request)| request)
            .unwrap_or(prompt);
        Ok(AgentResponse::new(
            format!(
                "Working offline, the best-effort answer to {} is to start small, \
                 validate assumptions early and iterate.",
                topic(request)
            ),
            0.45,
        ))
    }

    async fn optimize_response(
        &self,
        response: &AgentResponse,
        _feedback: &str,
        _context: &ProjectContext,
    ) -> Result<AgentResponse, AiServiceError> {
        self.pause().await;
        let Some(addition) = IMPROVEMENTS.iter().find(|i| !response.content.contains(*i)) else {
            // Nothing left to add
            return Ok(response.clone());
        };
        let confidence = response.confidence + (1.0 - response.confidence) * 0.3;
        Ok(response.revised(format!("{}\n\n{}", response.content, addition), confidence))
    }

    async fn assess_quality(
        &self,
        response: &AgentResponse,
        _context: &ProjectContext,
    ) -> Result<f64, AiServiceError> {
        Ok(heuristic_quality(&response.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thinktank_domain::Thought;

    fn agent(role: AgentRole) -> Agent {
        Agent::new("demo", "Ada", role).with_id("ada")
    }

    #[tokio::test]
    async fn test_root_candidates_are_deterministic() {
        let service = OfflineAiService::new();
        let ctx = ProjectContext::default();
        let request = ThoughtRequest::root("Design a REST API for todos", 3);

        let first = service
            .generate_thoughts(&ctx, request, &agent(AgentRole::Strategy))
            .await
            .unwrap();
        let second = service
            .generate_thoughts(&ctx, request, &agent(AgentRole::Strategy))
            .await
            .unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert!(first[0].content.contains("design a REST API for todos"));
        assert!(first.iter().all(|c| (0.0..=1.0).contains(&c.confidence)));
    }

    #[tokio::test]
    async fn test_roles_produce_different_reasoning() {
        let service = OfflineAiService::new();
        let ctx = ProjectContext::default();
        let request = ThoughtRequest::root("Add caching", 1);

        let strategy = service
            .generate_thoughts(&ctx, request, &agent(AgentRole::Strategy))
            .await
            .unwrap();
        let review = service
            .generate_thoughts(&ctx, request, &agent(AgentRole::Review))
            .await
            .unwrap();
        assert_ne!(strategy[0].content, review[0].content);

        let custom = service
            .generate_thoughts(&ctx, request, &agent(AgentRole::Custom("security".into())))
            .await
            .unwrap();
        assert!(custom[0].content.contains("security"));
    }

    #[tokio::test]
    async fn test_refinements_improve_then_converge() {
        let service = OfflineAiService::new();
        let ctx = ProjectContext::default();
        let shallow = Thought::root("ada".into(), "use REST", 0.6);
        let deep = Thought {
            depth: 12,
            ..Thought::root("ada".into(), "use REST", 0.6)
        };

        let candidates = service
            .generate_thoughts(&ctx, ThoughtRequest::refine("x", &shallow, 2), &agent(AgentRole::Review))
            .await
            .unwrap();
        assert!(candidates[0].confidence > 0.6 + 0.1);
        assert!(candidates[0].content.starts_with("use REST, and"));

        let candidates = service
            .generate_thoughts(&ctx, ThoughtRequest::refine("x", &deep, 2), &agent(AgentRole::Review))
            .await
            .unwrap();
        assert!(candidates.iter().all(|c| c.confidence < 0.6 + 0.02));
    }

    #[tokio::test]
    async fn test_optimize_adds_until_exhausted() {
        let service = OfflineAiService::new();
        let ctx = ProjectContext::default();
        let mut response = AgentResponse::new("Use REST.", 0.5);

        for _ in 0..IMPROVEMENTS.len() {
            let next = service.optimize_response(&response, "", &ctx).await.unwrap();
            assert!(next.confidence > response.confidence);
            response = next;
        }
        let last = service.optimize_response(&response, "", &ctx).await.unwrap();
        assert_eq!(last, response);
    }

    #[tokio::test]
    async fn test_quality_grows_with_detail() {
        let service = OfflineAiService::new();
        let ctx = ProjectContext::default();
        let short = service
            .assess_quality(&AgentResponse::new("Use REST.", 0.5), &ctx)
            .await
            .unwrap();
        let detailed = service
            .assess_quality(
                &AgentResponse::new(
                    "Use REST with cursor pagination.\n\nNext steps: agree on the interface, \
                     implement the smallest slice, then measure.\n\nEdge cases: empty input.",
                    0.5,
                ),
                &ctx,
            )
            .await
            .unwrap();
        assert!(detailed > short);
        assert!(detailed <= 0.95);
    }

    #[tokio::test]
    async fn test_degraded_answer_quotes_request() {
        let service = OfflineAiService::new();
        let prompt = "The agent team could not process this request (x).\n\nRequest:\nShip the beta";
        let response = service
            .generate_response(prompt, &ProjectContext::default())
            .await
            .unwrap();
        assert!(response.content.contains("\"ship the beta\""));
        assert!(response.confidence < 0.5);
    }
}
