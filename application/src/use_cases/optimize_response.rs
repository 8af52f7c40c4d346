//! Recursive response optimization
//!
//! Repeatedly asks the AI service for an improved answer, measures each
//! candidate, and keeps it only if its calibrated confidence beats the best
//! answer so far. The returned confidence therefore never decreases. All
//! loop state is local to one call.

use crate::ports::ai_service::{AiService, AiServiceError};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use std::sync::Arc;
use std::time::Duration;
use thinktank_domain::{AgentResponse, OptimizationStrategy, ProjectContext, PromptTemplate};
use tracing::{debug, info, warn};

/// Outcome of one optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationReport {
    pub response: AgentResponse,
    /// Improvement iterations attempted
    pub iterations: usize,
    /// AI service calls made, including quality assessments
    pub service_calls: usize,
    /// Whether any candidate was accepted
    pub improved: bool,
    /// Stopped early, or ran without accepting anything
    pub stalled: bool,
    /// Quality measured for the input response
    pub initial_quality: f64,
}

impl OptimizationReport {
    /// Report for a response left untouched.
    pub fn unchanged(response: AgentResponse) -> Self {
        let initial_quality = response.confidence;
        Self {
            response,
            iterations: 0,
            service_calls: 0,
            improved: false,
            stalled: false,
            initial_quality,
        }
    }
}

/// Refines responses according to an [`OptimizationStrategy`]
pub struct ResponseOptimizer<S: AiService + ?Sized> {
    service: Arc<S>,
    strategy: OptimizationStrategy,
    call_timeout: Option<Duration>,
}

impl<S: AiService + ?Sized> Clone for ResponseOptimizer<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            strategy: self.strategy,
            call_timeout: self.call_timeout,
        }
    }
}

impl<S: AiService + ?Sized> ResponseOptimizer<S> {
    pub fn new(service: Arc<S>, strategy: OptimizationStrategy) -> Self {
        Self {
            service,
            strategy,
            call_timeout: None,
        }
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn strategy(&self) -> &OptimizationStrategy {
        &self.strategy
    }

    /// Upper bound on AI calls one run can make.
    pub fn max_service_calls(&self) -> usize {
        1 + 2 * self.strategy.max_iterations()
    }

    /// Optimize a response, returning only the final answer.
    pub async fn optimize_response(
        &self,
        response: &AgentResponse,
        context: &ProjectContext,
    ) -> AgentResponse {
        self.optimize_with_report(response, context, &NoProgress)
            .await
            .response
    }

    /// Optimize a response and report how the run went.
    pub async fn optimize_with_report(
        &self,
        response: &AgentResponse,
        context: &ProjectContext,
        progress: &dyn ProgressNotifier,
    ) -> OptimizationReport {
        let mut report = OptimizationReport::unchanged(response.clone());
        if !self.strategy.should_continue(response, 0) {
            debug!(
                "Skipping optimization ({} strategy, confidence {:.2})",
                self.strategy, response.confidence
            );
            return report;
        }

        report.service_calls += 1;
        let mut quality = match self.assess(response, context).await {
            Ok(q) => q,
            Err(e) => {
                warn!("Quality assessment failed, using stated confidence: {}", e);
                response.confidence
            }
        };
        report.initial_quality = quality;

        let target = self.strategy.target_confidence();
        let mut best = response.clone();
        let mut since_improvement = 0;

        while self.strategy.should_continue(&best, report.iterations) {
            report.iterations += 1;
            let feedback = PromptTemplate::optimization_feedback(&best, quality, target);

            report.service_calls += 1;
            match self.improve(&best, &feedback, context).await {
                Ok(candidate) => {
                    report.service_calls += 1;
                    let candidate_quality = match self.assess(&candidate, context).await {
                        Ok(q) => q,
                        Err(e) => {
                            debug!("Candidate assessment failed: {}", e);
                            candidate.confidence
                        }
                    };
                    let calibrated = self.strategy.calibrate(candidate.confidence, candidate_quality);

                    if calibrated > best.confidence {
                        debug!(
                            "Iteration {}: accepted candidate ({:.2} -> {:.2})",
                            report.iterations, best.confidence, calibrated
                        );
                        best = best.revised(candidate.content, calibrated);
                        quality = candidate_quality;
                        report.improved = true;
                        since_improvement = 0;
                    } else {
                        debug!(
                            "Iteration {}: rejected candidate ({:.2} <= {:.2})",
                            report.iterations, calibrated, best.confidence
                        );
                        since_improvement += 1;
                    }
                }
                Err(e) => {
                    warn!("Improvement request failed at iteration {}: {}", report.iterations, e);
                    since_improvement += 1;
                }
            }

            progress.on_optimization_iteration(report.iterations, best.confidence);

            if let Some(patience) = self.strategy.stall_patience()
                && since_improvement >= patience
            {
                info!(
                    "Optimization stalled after {} iterations without improvement",
                    since_improvement
                );
                report.stalled = true;
                break;
            }
        }

        if !report.improved && report.iterations > 0 {
            report.stalled = true;
        }
        // Nothing accepted: hand back the input untouched.
        report.response = if report.improved {
            best
        } else {
            response.clone()
        };

        info!(
            "Optimization finished: {} iterations, confidence {:.2} -> {:.2}",
            report.iterations, response.confidence, report.response.confidence
        );
        report
    }

    async fn improve(
        &self,
        response: &AgentResponse,
        feedback: &str,
        context: &ProjectContext,
    ) -> Result<AgentResponse, AiServiceError> {
        let call = self.service.optimize_response(response, feedback, context);
        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or(Err(AiServiceError::Timeout)),
            None => call.await,
        }
    }

    async fn assess(
        &self,
        response: &AgentResponse,
        context: &ProjectContext,
    ) -> Result<f64, AiServiceError> {
        let call = self.service.assess_quality(response, context);
        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or(Err(AiServiceError::Timeout)),
            None => call.await,
        }
    }
}
