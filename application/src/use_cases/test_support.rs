//! Test doubles shared by the use case tests.

use crate::ports::agent_store::AgentStore;
use crate::ports::ai_service::{AiService, AiServiceError, ThoughtRequest};
use crate::ports::collaboration_store::CollaborationStore;
use crate::ports::store::{Snapshot, StoreError, Subscription};
use crate::ports::thought_store::ThoughtStore;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thinktank_domain::{
    Agent, AgentId, AgentResponse, AgentStatus, Collaboration, ProjectContext, ProjectId, Thought,
    ThoughtCandidate,
};
use tokio::sync::watch;

enum Script {
    Candidates(Vec<ThoughtCandidate>),
    Fail(AiServiceError),
    Panic,
    Hang,
}

/// AI service answering from per-agent and per-thought scripts.
///
/// Unscripted refinements repeat the parent at the same confidence, so trees
/// converge after one level unless `improving_refinements` is set. Unscripted
/// optimizations echo the response back unchanged.
pub(crate) struct ScriptedAiService {
    roots: HashMap<String, Script>,
    refinements: HashMap<String, Script>,
    refinement_step: Option<f64>,
    optimizations: Mutex<VecDeque<AgentResponse>>,
    optimization_error: Option<AiServiceError>,
    quality: f64,
    quality_error: Option<AiServiceError>,
    response_error: Option<AiServiceError>,
    thought_calls: AtomicUsize,
    optimize_calls: AtomicUsize,
    response_calls: AtomicUsize,
}

impl ScriptedAiService {
    pub fn new() -> Self {
        Self {
            roots: HashMap::new(),
            refinements: HashMap::new(),
            refinement_step: None,
            optimizations: Mutex::new(VecDeque::new()),
            optimization_error: None,
            quality: 0.5,
            quality_error: None,
            response_error: None,
            thought_calls: AtomicUsize::new(0),
            optimize_calls: AtomicUsize::new(0),
            response_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_root(mut self, agent: &str, candidates: Vec<ThoughtCandidate>) -> Self {
        self.roots.insert(agent.to_string(), Script::Candidates(candidates));
        self
    }

    pub fn with_root_failure(mut self, agent: &str, error: AiServiceError) -> Self {
        self.roots.insert(agent.to_string(), Script::Fail(error));
        self
    }

    pub fn with_root_panic(mut self, agent: &str) -> Self {
        self.roots.insert(agent.to_string(), Script::Panic);
        self
    }

    pub fn with_root_hang(mut self, agent: &str) -> Self {
        self.roots.insert(agent.to_string(), Script::Hang);
        self
    }

    pub fn with_refinement(mut self, parent: &str, candidates: Vec<ThoughtCandidate>) -> Self {
        self.refinements
            .insert(parent.to_string(), Script::Candidates(candidates));
        self
    }

    pub fn with_refinement_failure(mut self, parent: &str, error: AiServiceError) -> Self {
        self.refinements.insert(parent.to_string(), Script::Fail(error));
        self
    }

    /// Unscripted refinements improve on their parent by `step`.
    pub fn improving_refinements(mut self, step: f64) -> Self {
        self.refinement_step = Some(step);
        self
    }

    pub fn with_optimizations(self, responses: Vec<AgentResponse>) -> Self {
        *self.optimizations.lock().unwrap() = responses.into();
        self
    }

    pub fn with_optimization_failure(mut self, error: AiServiceError) -> Self {
        self.optimization_error = Some(error);
        self
    }

    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_quality_failure(mut self, error: AiServiceError) -> Self {
        self.quality_error = Some(error);
        self
    }

    pub fn with_response_failure(mut self, error: AiServiceError) -> Self {
        self.response_error = Some(error);
        self
    }

    pub fn thought_calls(&self) -> usize {
        self.thought_calls.load(Ordering::SeqCst)
    }

    pub fn optimize_calls(&self) -> usize {
        self.optimize_calls.load(Ordering::SeqCst)
    }

    pub fn response_calls(&self) -> usize {
        self.response_calls.load(Ordering::SeqCst)
    }

    async fn play(script: &Script) -> Result<Vec<ThoughtCandidate>, AiServiceError> {
        match script {
            Script::Candidates(candidates) => Ok(candidates.clone()),
            Script::Fail(error) => Err(error.clone()),
            Script::Panic => panic!("scripted panic"),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(vec![])
            }
        }
    }
}

#[async_trait]
impl AiService for ScriptedAiService {
    async fn generate_thoughts(
        &self,
        _context: &ProjectContext,
        request: ThoughtRequest<'_>,
        agent: &Agent,
    ) -> Result<Vec<ThoughtCandidate>, AiServiceError> {
        self.thought_calls.fetch_add(1, Ordering::SeqCst);
        match request.parent {
            None => match self.roots.get(agent.id.as_str()) {
                Some(script) => Self::play(script).await,
                None => Err(AiServiceError::RequestFailed(format!(
                    "no script for {}",
                    agent.id
                ))),
            },
            Some(parent) => {
                if let Some(script) = self.refinements.get(&parent.content) {
                    return Self::play(script).await;
                }
                let step = self.refinement_step.unwrap_or(0.0);
                Ok((0..request.candidates)
                    .map(|i| {
                        ThoughtCandidate::new(
                            format!("{} / refinement {}", parent.content, i),
                            parent.confidence + step,
                        )
                    })
                    .collect())
            }
        }
    }

    async fn generate_response(
        &self,
        _prompt: &str,
        _context: &ProjectContext,
    ) -> Result<AgentResponse, AiServiceError> {
        self.response_calls.fetch_add(1, Ordering::SeqCst);
        match &self.response_error {
            Some(error) => Err(error.clone()),
            None => Ok(AgentResponse::new("best-effort answer", 0.7)),
        }
    }

    async fn optimize_response(
        &self,
        response: &AgentResponse,
        _feedback: &str,
        _context: &ProjectContext,
    ) -> Result<AgentResponse, AiServiceError> {
        self.optimize_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.optimization_error {
            return Err(error.clone());
        }
        let next = self.optimizations.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| response.clone()))
    }

    async fn assess_quality(
        &self,
        _response: &AgentResponse,
        _context: &ProjectContext,
    ) -> Result<f64, AiServiceError> {
        match &self.quality_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.quality),
        }
    }
}

/// Agent store holding a single project's agents.
pub(crate) struct MemoryAgentStore {
    agents: Mutex<Vec<Agent>>,
    status_log: Mutex<Vec<(AgentId, AgentStatus)>>,
    fail_listing: bool,
    sender: watch::Sender<Snapshot<Agent>>,
}

impl MemoryAgentStore {
    pub fn new(agents: Vec<Agent>) -> Self {
        let (sender, _) = watch::channel(Snapshot::initial().next(agents.clone()));
        Self {
            agents: Mutex::new(agents),
            status_log: Mutex::new(Vec::new()),
            fail_listing: false,
            sender,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_listing: true,
            ..Self::new(vec![])
        }
    }

    pub fn agent(&self, id: &str) -> Agent {
        self.agents
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id.as_str() == id)
            .cloned()
            .unwrap()
    }

    pub fn statuses(&self) -> Vec<AgentStatus> {
        self.agents.lock().unwrap().iter().map(|a| a.status).collect()
    }

    pub fn status_log(&self) -> Vec<(AgentId, AgentStatus)> {
        self.status_log.lock().unwrap().clone()
    }

    fn publish(&self) {
        let agents = self.agents.lock().unwrap().clone();
        self.sender.send_modify(|snapshot| *snapshot = snapshot.next(agents));
    }
}

#[async_trait]
impl AgentStore for MemoryAgentStore {
    async fn agents_by_project(&self, project_id: &ProjectId) -> Result<Vec<Agent>, StoreError> {
        if self.fail_listing {
            return Err(StoreError::Unavailable("agent store offline".into()));
        }
        Ok(self
            .agents
            .lock()
            .unwrap()
            .iter()
            .filter(|a| &a.project_id == project_id)
            .cloned()
            .collect())
    }

    fn subscribe_agents(&self, _project_id: &ProjectId) -> Subscription<Agent> {
        self.sender.subscribe()
    }

    async fn update_agent_status(
        &self,
        agent_id: &AgentId,
        status: AgentStatus,
    ) -> Result<(), StoreError> {
        {
            let mut agents = self.agents.lock().unwrap();
            let agent = agents
                .iter_mut()
                .find(|a| &a.id == agent_id)
                .ok_or_else(|| StoreError::NotFound(agent_id.to_string()))?;
            agent.status = status;
        }
        self.status_log
            .lock()
            .unwrap()
            .push((agent_id.clone(), status));
        self.publish();
        Ok(())
    }

    async fn record_performance(
        &self,
        agent_id: &AgentId,
        success: bool,
        confidence: Option<f64>,
    ) -> Result<(), StoreError> {
        {
            let mut agents = self.agents.lock().unwrap();
            let agent = agents
                .iter_mut()
                .find(|a| &a.id == agent_id)
                .ok_or_else(|| StoreError::NotFound(agent_id.to_string()))?;
            agent.metrics.record(success, confidence);
        }
        self.publish();
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MemoryThoughtStore {
    thoughts: Mutex<Vec<Thought>>,
    fail: bool,
}

impl MemoryThoughtStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn thoughts(&self) -> Vec<Thought> {
        self.thoughts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ThoughtStore for MemoryThoughtStore {
    async fn insert_thought(
        &self,
        _project_id: &ProjectId,
        thought: &Thought,
    ) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable("thought store offline".into()));
        }
        self.thoughts.lock().unwrap().push(thought.clone());
        Ok(())
    }
}

/// Collaboration store for a single project, publishing active sessions.
pub(crate) struct MemoryCollaborationStore {
    items: Mutex<Vec<Collaboration>>,
    fail: bool,
    sender: watch::Sender<Snapshot<Collaboration>>,
}

impl Default for MemoryCollaborationStore {
    fn default() -> Self {
        let (sender, _) = watch::channel(Snapshot::initial());
        Self {
            items: Mutex::new(Vec::new()),
            fail: false,
            sender,
        }
    }
}

impl MemoryCollaborationStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    fn publish(&self) {
        let active: Vec<Collaboration> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.is_active())
            .cloned()
            .collect();
        self.sender.send_modify(|snapshot| *snapshot = snapshot.next(active));
    }
}

#[async_trait]
impl CollaborationStore for MemoryCollaborationStore {
    async fn insert_collaboration(&self, collaboration: &Collaboration) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable("collaboration store offline".into()));
        }
        self.items.lock().unwrap().push(collaboration.clone());
        self.publish();
        Ok(())
    }

    async fn update_collaboration(&self, collaboration: &Collaboration) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable("collaboration store offline".into()));
        }
        {
            let mut items = self.items.lock().unwrap();
            let slot = items
                .iter_mut()
                .find(|c| c.id == collaboration.id)
                .ok_or_else(|| StoreError::NotFound(collaboration.id.to_string()))?;
            *slot = collaboration.clone();
        }
        self.publish();
        Ok(())
    }

    async fn collaborations_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Collaboration>, StoreError> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|c| &c.project_id == project_id)
            .cloned()
            .collect())
    }

    fn subscribe_collaborations(&self, _project_id: &ProjectId) -> Subscription<Collaboration> {
        self.sender.subscribe()
    }
}
