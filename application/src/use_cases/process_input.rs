//! Process user input use case
//!
//! Answers one request end-to-end:
//!
//! 1. Load the project's agents
//! 2. Grow one thought tree per agent, concurrently (full tree, falling back
//!    to a single level)
//! 3. Reconcile the agents' top thoughts in a collaboration session
//! 4. Draft a response and refine it with the response optimizer
//! 5. Persist the thoughts and reset every agent to idle
//!
//! Only two conditions surface as errors: no agents and no way to produce a
//! degraded answer, or cancellation. Everything else lowers the confidence
//! of the answer and is recorded in its metadata.

use crate::config::EngineConfig;
use crate::ports::agent_store::AgentStore;
use crate::ports::ai_service::{AiService, AiServiceError};
use crate::ports::collaboration_store::CollaborationStore;
use crate::ports::event_logger::{NoEventLogger, RequestEvent, RequestEventLogger};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::store::Subscription;
use crate::ports::thought_store::ThoughtStore;
use crate::use_cases::collaborate::CollaborationManager;
use crate::use_cases::fallback::{AttemptError, FallbackExecutor};
use crate::use_cases::generate_thoughts::ThoughtEngine;
use crate::use_cases::optimize_response::{OptimizationReport, ResponseOptimizer};
use chrono::Utc;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use thinktank_domain::{
    Agent, AgentId, AgentResponse, AgentStatus, Collaboration, CollaborationId, ProjectContext,
    ProjectId, PromptTemplate, RequestPhase, RequestState, ResolutionKind, ResponseMetadata,
    ThoughtId, ThoughtTree,
};
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Confidence of the static answer used when no AI call succeeds.
const STATIC_FALLBACK_CONFIDENCE: f64 = 0.1;

/// Errors and degraded conditions of a request
///
/// Only [`NoAgentsAvailable`](Self::NoAgentsAvailable) and
/// [`Cancelled`](Self::Cancelled) are returned to the caller; the other
/// variants describe conditions recorded in the response metadata.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestrationError {
    #[error("AI service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("No agents available for project {0}")]
    NoAgentsAvailable(ProjectId),

    #[error("{failed} of {total} agents failed")]
    PartialAgentFailure { failed: usize, total: usize },

    #[error("Optimization stalled after {iterations} iterations")]
    OptimizationStalled { iterations: usize },

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Consensus not reached ({unresolved} unresolved views)")]
    ConsensusNotReached { unresolved: usize },

    #[error("Operation cancelled")]
    Cancelled,
}

impl OrchestrationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, OrchestrationError::Cancelled)
    }
}

fn check_cancelled(token: &CancellationToken) -> Result<(), OrchestrationError> {
    if token.is_cancelled() {
        return Err(OrchestrationError::Cancelled);
    }
    Ok(())
}

fn advance(state: &mut RequestState, phase: RequestPhase) {
    if let Err(e) = state.advance(phase) {
        warn!("{}", e);
    }
}

/// Result of the thought generation fan-out, in agent order.
#[derive(Default)]
struct FanOut {
    succeeded: Vec<(Agent, ThoughtTree)>,
    failed: Vec<(Agent, String)>,
}

/// Content and provenance of the response before optimization.
struct Draft {
    content: String,
    reasoning: Option<ThoughtId>,
    alternatives: Vec<String>,
    collaboration_id: Option<CollaborationId>,
    consensus: Option<bool>,
}

/// Puts agents back to `Idle` when a request future is dropped mid-flight.
///
/// The normal path resets agents itself and disarms the guard.
struct IdleGuard {
    store: Arc<dyn AgentStore>,
    agents: Vec<AgentId>,
}

impl IdleGuard {
    fn new(store: Arc<dyn AgentStore>, agents: &[Agent]) -> Self {
        Self {
            store,
            agents: agents.iter().map(|a| a.id.clone()).collect(),
        }
    }

    fn disarm(mut self) {
        self.agents.clear();
    }
}

impl Drop for IdleGuard {
    fn drop(&mut self) {
        if self.agents.is_empty() {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(
                "Request dropped outside a runtime; {} agents keep their status",
                self.agents.len()
            );
            return;
        };
        let store = Arc::clone(&self.store);
        let agents = std::mem::take(&mut self.agents);
        info!("Request dropped, resetting {} agents to idle", agents.len());
        handle.spawn(async move {
            for agent_id in agents {
                if let Err(e) = store.update_agent_status(&agent_id, AgentStatus::Idle).await {
                    warn!("Failed to reset agent {}: {}", agent_id, e);
                }
            }
        });
    }
}

/// Coordinates agents, collaboration and optimization for a project
pub struct Orchestrator<S: AiService + ?Sized + 'static> {
    service: Arc<S>,
    agents: Arc<dyn AgentStore>,
    thoughts: Arc<dyn ThoughtStore>,
    collaborations: Arc<CollaborationManager>,
    engine: ThoughtEngine<S>,
    optimizer: ResponseOptimizer<S>,
    config: EngineConfig,
    event_logger: Arc<dyn RequestEventLogger>,
}

impl<S: AiService + ?Sized + 'static> Orchestrator<S> {
    pub fn new(
        service: Arc<S>,
        agents: Arc<dyn AgentStore>,
        thoughts: Arc<dyn ThoughtStore>,
        collaborations: Arc<dyn CollaborationStore>,
        config: EngineConfig,
    ) -> Self {
        let call_timeout = config.orchestrator.ai_call_timeout;
        Self {
            engine: ThoughtEngine::new(Arc::clone(&service), config.thoughts)
                .with_call_timeout(call_timeout),
            optimizer: ResponseOptimizer::new(Arc::clone(&service), config.optimizer)
                .with_call_timeout(call_timeout),
            collaborations: Arc::new(CollaborationManager::new(
                collaborations,
                config.collaboration,
            )),
            service,
            agents,
            thoughts,
            config,
            event_logger: Arc::new(NoEventLogger),
        }
    }

    pub fn with_event_logger(mut self, logger: Arc<dyn RequestEventLogger>) -> Self {
        self.event_logger = logger;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn collaboration_manager(&self) -> &CollaborationManager {
        &self.collaborations
    }

    /// Subscribe to the active collaborations of a project.
    pub fn get_active_collaborations(&self, project_id: &ProjectId) -> Subscription<Collaboration> {
        self.collaborations.subscribe(project_id)
    }

    /// Answer a request without progress reporting or cancellation.
    pub async fn process_user_input(
        &self,
        project_id: &ProjectId,
        input: &str,
        context: &ProjectContext,
    ) -> Result<AgentResponse, OrchestrationError> {
        self.process_user_input_with(project_id, input, context, &NoProgress, None)
            .await
    }

    /// Answer a request with progress callbacks and cooperative cancellation.
    ///
    /// Every agent of the project is back to `Idle` when this returns,
    /// including on cancellation. If the future is dropped instead, the
    /// reset is spawned onto the current runtime.
    pub async fn process_user_input_with(
        &self,
        project_id: &ProjectId,
        input: &str,
        context: &ProjectContext,
        progress: &dyn ProgressNotifier,
        cancellation: Option<CancellationToken>,
    ) -> Result<AgentResponse, OrchestrationError> {
        let token = cancellation.unwrap_or_default();
        let mut state = RequestState::new();

        let closed = self.collaborations.close_expired(Utc::now()).await;
        if closed > 0 {
            debug!("Closed {} expired collaborations", closed);
        }
        check_cancelled(&token)?;

        progress.on_phase_start(&RequestPhase::LoadingAgents, 0);
        let agents = match self.agents.agents_by_project(project_id).await {
            Ok(agents) => agents,
            Err(e) => {
                warn!("Failed to load agents for project {}: {}", project_id, e);
                Vec::new()
            }
        };
        progress.on_phase_complete(&RequestPhase::LoadingAgents);
        info!(
            "Processing request for project {} with {} agents",
            project_id,
            agents.len()
        );

        if agents.is_empty() {
            return self
                .respond_without_agents(project_id, input, context, &mut state, progress, &token)
                .await;
        }

        let guard = IdleGuard::new(Arc::clone(&self.agents), &agents);
        let result = self
            .run(project_id, input, context, &agents, &mut state, progress, &token)
            .await;
        self.reset_agents(&agents).await;
        guard.disarm();

        if let Err(e) = &result {
            info!("Request ended with {} (phases: {:?})", e, state.history());
        }
        result
    }

    #[allow(clippy::too_many_arguments)]
    async fn run(
        &self,
        project_id: &ProjectId,
        input: &str,
        context: &ProjectContext,
        agents: &[Agent],
        state: &mut RequestState,
        progress: &dyn ProgressNotifier,
        token: &CancellationToken,
    ) -> Result<AgentResponse, OrchestrationError> {
        advance(state, RequestPhase::GeneratingThoughts);
        for agent in agents {
            self.set_status(&agent.id, AgentStatus::Thinking).await;
        }

        let fan_out = self.fan_out(input, context, agents, progress, token).await?;
        self.record_metrics(&fan_out).await;

        let failed_ids: Vec<AgentId> = fan_out.failed.iter().map(|(a, _)| a.id.clone()).collect();
        let mut warnings = Vec::new();

        let mut merged = ThoughtTree::new(self.config.thoughts.bounds);
        let mut participants = Vec::new();
        for (agent, tree) in fan_out.succeeded {
            match merged.merge(tree) {
                Ok(()) => participants.push(agent.id),
                Err(e) => warn!("Discarding thoughts of {}: {}", agent.name, e),
            }
        }

        if participants.is_empty() {
            let reason = OrchestrationError::ServiceUnavailable(format!(
                "all {} agents failed to generate thoughts",
                agents.len()
            ));
            warn!("{}", reason);
            state.fail_over().ok();
            return self
                .respond_degraded(input, context, &reason.to_string(), failed_ids, progress, token)
                .await;
        }

        if !failed_ids.is_empty() {
            let partial = OrchestrationError::PartialAgentFailure {
                failed: failed_ids.len(),
                total: agents.len(),
            };
            warn!("{}", partial);
            warnings.push(partial);
        }

        let draft = if participants.len() >= 2 {
            advance(state, RequestPhase::Collaborating);
            progress.on_phase_start(&RequestPhase::Collaborating, participants.len());
            let draft = self
                .collaborate(project_id, &participants, &merged, &mut warnings)
                .await;
            progress.on_phase_complete(&RequestPhase::Collaborating);
            draft
        } else {
            Self::single_agent_draft(&merged)
        };

        let mut confidence = merged.top_confidence();
        if draft.consensus == Some(false) {
            confidence *= self.config.orchestrator.conflict_penalty;
        }
        if !failed_ids.is_empty() {
            confidence *= self.config.orchestrator.partial_failure_penalty;
        }

        let mut metadata = ResponseMetadata {
            contributing_agents: participants.clone(),
            failed_agents: failed_ids,
            collaboration_id: draft.collaboration_id.clone(),
            consensus_reached: draft.consensus,
            ..Default::default()
        };
        metadata.insert_extra("thought_count", json!(merged.len()));
        if draft.collaboration_id.is_some() {
            metadata.insert_extra(
                "resolution_strategy",
                json!(self.config.collaboration.strategy.name()),
            );
        }

        let mut draft_response = AgentResponse::new(draft.content, confidence)
            .with_alternatives(draft.alternatives)
            .with_metadata(metadata);
        if let Some(reasoning) = draft.reasoning {
            draft_response = draft_response.with_reasoning(reasoning);
        }
        debug!("Draft response confidence {:.2}", draft_response.confidence);

        check_cancelled(token)?;
        advance(state, RequestPhase::Optimizing);
        let report = self.optimize(&draft_response, context, progress, token).await?;

        let mut response = report.response;
        response.metadata.optimization_iterations = report.iterations;
        response.metadata.optimization_stalled = report.stalled;
        if report.stalled {
            let stalled = OrchestrationError::OptimizationStalled {
                iterations: report.iterations,
            };
            debug!("{}", stalled);
            warnings.push(stalled);
        }

        let failures = self.persist_thoughts(project_id, &merged).await;
        response.metadata.persistence_failures = failures;
        if failures > 0 {
            let persistence = OrchestrationError::PersistenceFailure(format!(
                "{} of {} thoughts not stored",
                failures,
                merged.len()
            ));
            warn!("{}", persistence);
            warnings.push(persistence);
        }

        if !warnings.is_empty() {
            let notes: Vec<String> = warnings.iter().map(ToString::to_string).collect();
            response.metadata.insert_extra("warnings", json!(notes));
        }

        advance(state, RequestPhase::Done);
        self.event_logger.log(RequestEvent::new(
            "request_completed",
            json!({
                "project_id": project_id,
                "confidence": response.confidence,
                "contributing_agents": response.metadata.contributing_agents,
                "failed_agents": response.metadata.failed_agents,
                "consensus_reached": response.metadata.consensus_reached,
                "optimization_iterations": report.iterations,
            }),
        ));
        info!(
            "Request completed with confidence {:.2} ({} agents)",
            response.confidence,
            participants.len()
        );
        Ok(response)
    }

    /// Grow every agent's tree concurrently and collect the outcomes.
    async fn fan_out(
        &self,
        input: &str,
        context: &ProjectContext,
        agents: &[Agent],
        progress: &dyn ProgressNotifier,
        token: &CancellationToken,
    ) -> Result<FanOut, OrchestrationError> {
        progress.on_phase_start(&RequestPhase::GeneratingThoughts, agents.len());

        let context = Arc::new(context.clone());
        let input: Arc<str> = Arc::from(input);
        let executor = self.thought_executor();
        let mut join_set = JoinSet::new();

        for agent in agents {
            let engine = self.engine.clone();
            let standby = self.engine.shallow();
            let context = Arc::clone(&context);
            let input = Arc::clone(&input);
            let agent = agent.clone();

            join_set.spawn(async move {
                let result = executor
                    .execute_with_fallback(engine.build_tree(&context, &input, &agent), || {
                        standby.build_tree(&context, &input, &agent)
                    })
                    .await;
                (agent, result)
            });
        }

        let mut fan_out = FanOut::default();
        loop {
            let joined = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    join_set.abort_all();
                    info!("Request cancelled during thought generation");
                    return Err(OrchestrationError::Cancelled);
                }
                joined = join_set.join_next() => joined,
            };
            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((agent, Ok(tree))) => {
                    progress.on_task_complete(&RequestPhase::GeneratingThoughts, &agent, true);
                    self.event_logger.log(RequestEvent::new(
                        "thoughts_generated",
                        json!({
                            "agent_id": agent.id,
                            "thoughts": tree.len(),
                            "depth": tree.depth(),
                            "top_confidence": tree.top_confidence(),
                        }),
                    ));
                    fan_out.succeeded.push((agent, tree));
                }
                Ok((agent, Err(e))) => {
                    warn!("Agent {} failed: {}", agent.name, e);
                    progress.on_task_complete(&RequestPhase::GeneratingThoughts, &agent, false);
                    self.set_status(&agent.id, AgentStatus::Error).await;
                    fan_out.failed.push((agent, e.to_string()));
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        // Agents whose task vanished without reporting count as failed.
        for agent in agents {
            let reported = fan_out.succeeded.iter().any(|(a, _)| a.id == agent.id)
                || fan_out.failed.iter().any(|(a, _)| a.id == agent.id);
            if !reported {
                self.set_status(&agent.id, AgentStatus::Error).await;
                fan_out
                    .failed
                    .push((agent.clone(), "task ended without a result".to_string()));
            }
        }

        let order = |id: &AgentId| agents.iter().position(|a| &a.id == id);
        fan_out.succeeded.sort_by_key(|(a, _)| order(&a.id));
        fan_out.failed.sort_by_key(|(a, _)| order(&a.id));

        progress.on_phase_complete(&RequestPhase::GeneratingThoughts);
        Ok(fan_out)
    }

    async fn collaborate(
        &self,
        project_id: &ProjectId,
        participants: &[AgentId],
        merged: &ThoughtTree,
        warnings: &mut Vec<OrchestrationError>,
    ) -> Draft {
        let session = match self
            .collaborations
            .start_collaboration(
                project_id,
                participants,
                merged,
                self.config.collaboration.session_type,
            )
            .await
        {
            Ok(session) => session,
            Err(e) => {
                warn!("Collaboration failed, using the top thought: {}", e);
                let mut draft = Self::single_agent_draft(merged);
                draft.consensus = Some(false);
                warnings.push(OrchestrationError::ConsensusNotReached { unresolved: 0 });
                return draft;
            }
        };

        let reached = match self.collaborations.reach_consensus(&session.id).await {
            Ok(reached) => reached,
            Err(e) => {
                warn!("Consensus evaluation failed: {}", e);
                false
            }
        };
        let unresolved = session.shared_context.unresolved_count();
        if !reached {
            let conflict = OrchestrationError::ConsensusNotReached { unresolved };
            info!("{}", conflict);
            warnings.push(conflict);
        }

        self.event_logger.log(RequestEvent::new(
            "consensus",
            json!({
                "collaboration_id": session.id,
                "participants": participants,
                "conflicting_views": session.shared_context.conflicting_views().len(),
                "unresolved": unresolved,
                "reached": reached,
                "strategy": self.config.collaboration.strategy.name(),
            }),
        ));

        let top = merged.top_thought();
        let (content, reasoning) = match session.leading_resolution() {
            Some(resolution) => {
                let reasoning = match &resolution.kind {
                    ResolutionKind::Selected { agent_id } => merged.top_thought_for(agent_id),
                    ResolutionKind::Synthesized { .. } => top,
                }
                .map(|t| t.id.clone());
                (resolution.content.clone(), reasoning)
            }
            None => (
                top.map(|t| t.content.clone()).unwrap_or_default(),
                top.map(|t| t.id.clone()),
            ),
        };

        let mut alternatives: Vec<String> = Vec::new();
        for agent in participants {
            if let Some(thought) = merged.top_thought_for(agent)
                && thought.content != content
                && !alternatives.contains(&thought.content)
            {
                alternatives.push(thought.content.clone());
            }
        }

        Draft {
            content,
            reasoning,
            alternatives,
            collaboration_id: Some(session.id),
            consensus: Some(reached),
        }
    }

    fn single_agent_draft(merged: &ThoughtTree) -> Draft {
        let top = merged.top_thought();
        Draft {
            content: top.map(|t| t.content.clone()).unwrap_or_default(),
            reasoning: top.map(|t| t.id.clone()),
            alternatives: top.map(|t| t.alternatives.clone()).unwrap_or_default(),
            collaboration_id: None,
            consensus: None,
        }
    }

    /// Run the optimizer, falling back to the draft if it times out or panics.
    async fn optimize(
        &self,
        draft: &AgentResponse,
        context: &ProjectContext,
        progress: &dyn ProgressNotifier,
        token: &CancellationToken,
    ) -> Result<OptimizationReport, OrchestrationError> {
        progress.on_phase_start(&RequestPhase::Optimizing, 0);

        let executor = self.optimizer_executor();
        let attempt = executor.execute_with_fallback(
            async {
                Ok::<_, Infallible>(
                    self.optimizer
                        .optimize_with_report(draft, context, progress)
                        .await,
                )
            },
            || async { Ok(OptimizationReport::unchanged(draft.clone())) },
        );

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => {
                info!("Request cancelled during optimization");
                return Err(OrchestrationError::Cancelled);
            }
            outcome = attempt => outcome,
        };

        let report = match outcome {
            Ok(report) => report,
            Err(e) => {
                warn!("Optimization failed, keeping the draft: {}", e);
                OptimizationReport::unchanged(draft.clone())
            }
        };

        self.event_logger.log(RequestEvent::new(
            "optimization",
            json!({
                "strategy": self.config.optimizer.name(),
                "iterations": report.iterations,
                "service_calls": report.service_calls,
                "initial_confidence": draft.confidence,
                "final_confidence": report.response.confidence,
                "stalled": report.stalled,
            }),
        ));
        progress.on_phase_complete(&RequestPhase::Optimizing);
        Ok(report)
    }

    /// Best-effort answer when no agent produced thoughts.
    async fn respond_degraded(
        &self,
        input: &str,
        context: &ProjectContext,
        reason: &str,
        failed_agents: Vec<AgentId>,
        progress: &dyn ProgressNotifier,
        token: &CancellationToken,
    ) -> Result<AgentResponse, OrchestrationError> {
        check_cancelled(token)?;
        progress.on_phase_start(&RequestPhase::FallbackResponse, 0);

        let mut metadata = ResponseMetadata::degraded(reason);
        metadata.failed_agents = failed_agents;

        let response = match self.degraded_attempt(input, context, reason).await {
            Ok(response) => {
                metadata.insert_extra("fallback", json!("generated"));
                response
            }
            Err(e) => {
                warn!("Degraded answer generation failed, using static answer: {}", e);
                metadata.insert_extra("fallback", json!("static"));
                AgentResponse::new(
                    PromptTemplate::degraded_response(input, reason),
                    STATIC_FALLBACK_CONFIDENCE.min(self.config.orchestrator.degraded_confidence_cap),
                )
            }
        }
        .with_metadata(metadata);

        self.log_degraded(reason, &response);
        progress.on_phase_complete(&RequestPhase::FallbackResponse);
        Ok(response)
    }

    /// Answer for a project without agents, or `NoAgentsAvailable`.
    async fn respond_without_agents(
        &self,
        project_id: &ProjectId,
        input: &str,
        context: &ProjectContext,
        state: &mut RequestState,
        progress: &dyn ProgressNotifier,
        token: &CancellationToken,
    ) -> Result<AgentResponse, OrchestrationError> {
        warn!("Project {} has no agents", project_id);
        state.fail_over().ok();
        check_cancelled(token)?;
        progress.on_phase_start(&RequestPhase::FallbackResponse, 0);

        let reason = format!("no agents available for project {}", project_id);
        let response = match self.degraded_attempt(input, context, &reason).await {
            Ok(response) => response.with_metadata(ResponseMetadata::degraded(reason.clone())),
            Err(e) => {
                warn!("Degraded answer generation failed: {}", e);
                progress.on_phase_complete(&RequestPhase::FallbackResponse);
                return Err(OrchestrationError::NoAgentsAvailable(project_id.clone()));
            }
        };

        self.log_degraded(&reason, &response);
        progress.on_phase_complete(&RequestPhase::FallbackResponse);
        Ok(response)
    }

    async fn degraded_attempt(
        &self,
        input: &str,
        context: &ProjectContext,
        reason: &str,
    ) -> Result<AgentResponse, AttemptError<AiServiceError>> {
        let prompt = PromptTemplate::degraded_prompt(input, reason);
        let response = self
            .call_executor()
            .execute(self.service.generate_response(&prompt, context))
            .await?;
        Ok(response.capped_at(self.config.orchestrator.degraded_confidence_cap))
    }

    fn log_degraded(&self, reason: &str, response: &AgentResponse) {
        self.event_logger.log(RequestEvent::new(
            "degraded",
            json!({
                "reason": reason,
                "confidence": response.confidence,
                "failed_agents": response.metadata.failed_agents,
            }),
        ));
    }

    async fn record_metrics(&self, fan_out: &FanOut) {
        for (agent, tree) in &fan_out.succeeded {
            if let Err(e) = self
                .agents
                .record_performance(&agent.id, true, Some(tree.top_confidence()))
                .await
            {
                warn!("Failed to record metrics for {}: {}", agent.name, e);
            }
        }
        for (agent, _) in &fan_out.failed {
            if let Err(e) = self.agents.record_performance(&agent.id, false, None).await {
                warn!("Failed to record metrics for {}: {}", agent.name, e);
            }
        }
    }

    /// Store every thought, returning how many could not be stored.
    async fn persist_thoughts(&self, project_id: &ProjectId, tree: &ThoughtTree) -> usize {
        let mut failures = 0;
        for thought in tree.iter() {
            if let Err(e) = self.thoughts.insert_thought(project_id, thought).await {
                debug!("Failed to store thought {}: {}", thought.id, e);
                failures += 1;
            }
        }
        failures
    }

    async fn set_status(&self, agent_id: &AgentId, status: AgentStatus) {
        if let Err(e) = self.agents.update_agent_status(agent_id, status).await {
            warn!("Failed to set agent {} to {}: {}", agent_id, status, e);
        }
    }

    async fn reset_agents(&self, agents: &[Agent]) {
        for agent in agents {
            self.set_status(&agent.id, AgentStatus::Idle).await;
        }
    }

    /// Thought trees expand level by level; each level is bounded by one call timeout.
    fn thought_executor(&self) -> FallbackExecutor {
        let levels = self.config.thoughts.bounds.max_depth.max(1) as u32;
        FallbackExecutor::new(self.config.orchestrator.ai_call_timeout.map(|t| t * levels))
    }

    fn optimizer_executor(&self) -> FallbackExecutor {
        let calls = self.optimizer.max_service_calls().max(1) as u32;
        FallbackExecutor::new(self.config.orchestrator.ai_call_timeout.map(|t| t * calls))
    }

    fn call_executor(&self) -> FallbackExecutor {
        FallbackExecutor::new(self.config.orchestrator.ai_call_timeout)
    }
}
