//! The master coordinator: owns the forum and metrics for one session,
//! sequences rounds, and synthesizes the final response.
//!
//! One session per `run_session` call. Policy and registry are handed in at
//! construction, never read from ambient state, so sessions in the same
//! process can run concurrently under different policies.

use super::forum::{Forum, ForumMessage, Role};
use super::invoker::WorkerResult;
use super::metrics::SessionMetrics;
use super::policy::SessionPolicy;
use super::scheduler;
use crate::agents::{AgentRegistry, Worker, WorkerContext};
use crate::error::PolicyError;
use crate::security::Redactor;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Default number of subagents picked when the caller names none.
const DEFAULT_SELECTION_SIZE: usize = 2;

/// Parameters for one orchestration session.
#[derive(Debug, Clone)]
pub struct SessionRequest {
    /// Agent names to run each round. Empty selects a default subset of the
    /// registry (filtered by policy).
    pub subagents: Vec<String>,
    pub rounds: u32,
    pub timeout: Duration,
    /// Optional user input, posted (redacted) to the forum before round 0.
    pub input: Option<String>,
}

impl SessionRequest {
    #[must_use]
    pub fn new(subagents: Vec<String>, rounds: u32, timeout: Duration) -> Self {
        Self {
            subagents,
            rounds,
            timeout,
            input: None,
        }
    }

    #[must_use]
    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }
}

/// Final return value of a session.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestrationOutcome {
    /// Rounds actually executed (after the policy cap).
    pub rounds: u32,
    /// Per-round result sets, in round order; each inner list follows the
    /// selection order.
    pub results: Vec<Vec<WorkerResult>>,
    pub metrics: SessionMetrics,
    /// Full forum contents in sequence order.
    pub transcript: Vec<ForumMessage>,
    /// Synthesized final response, also posted as the last system message.
    pub final_response: String,
}

/// Reduction over the ordered transcript producing the final response.
/// Implementations must be pure functions of the transcript.
pub trait Synthesizer: Send + Sync {
    fn synthesize(&self, transcript: &[ForumMessage]) -> String;
}

/// Default strategy: list the final round's agent messages as
/// "name: content" lines.
pub struct JoinSynthesizer;

impl Synthesizer for JoinSynthesizer {
    fn synthesize(&self, transcript: &[ForumMessage]) -> String {
        let last_round = transcript
            .iter()
            .filter(|m| m.role == Role::Agent)
            .map(|m| m.round)
            .max();
        let Some(last_round) = last_round else {
            return "No agent output produced.".to_string();
        };

        let lines: Vec<String> = transcript
            .iter()
            .filter(|m| m.role == Role::Agent && m.round == last_round)
            .map(|m| format!("{}: {}", m.author, m.content))
            .collect();
        lines.join("\n")
    }
}

pub struct MasterCoordinator {
    registry: Arc<AgentRegistry>,
    policy: SessionPolicy,
    redactor: Redactor,
    synthesizer: Box<dyn Synthesizer>,
}

impl MasterCoordinator {
    #[must_use]
    pub fn new(registry: Arc<AgentRegistry>, policy: SessionPolicy, redactor: Redactor) -> Self {
        Self {
            registry,
            policy,
            redactor,
            synthesizer: Box::new(JoinSynthesizer),
        }
    }

    #[must_use]
    pub fn with_synthesizer(mut self, synthesizer: Box<dyn Synthesizer>) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// Run one full session: validate, execute rounds, synthesize.
    ///
    /// Only policy violations surface as errors, and they fire before any
    /// forum message exists. Worker faults never fail the session; they are
    /// visible through `status`/`error_detail` in the results and through
    /// the metrics.
    pub async fn run_session(
        &self,
        request: SessionRequest,
    ) -> Result<OrchestrationOutcome, PolicyError> {
        let selected = self.resolve_selection(&request.subagents)?;
        let rounds = self.policy.cap_rounds(request.rounds)?;
        tracing::debug!(
            rounds,
            requested = request.rounds,
            agents = ?selected.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            "session start"
        );

        let forum = Forum::new();
        let mut metrics = SessionMetrics::new();
        let mut results: Vec<Vec<WorkerResult>> = Vec::new();

        forum.post(Role::System, "system", "Master orchestration starting", 0);
        if let Some(input) = &request.input {
            forum.post(Role::User, "user", self.redactor.redact(input), 0);
        }

        for round in 0..rounds {
            forum.post(
                Role::System,
                "system",
                format!("Round {} of {rounds} starting", round + 1),
                round,
            );

            // Workers see a read-only snapshot of the forum as of the start
            // of their round.
            let ctx = Arc::new(WorkerContext {
                round,
                input: request.input.clone(),
                transcript: forum.all(),
            });

            let round_results = scheduler::run_round(
                &forum,
                &self.redactor,
                round,
                &selected,
                &ctx,
                request.timeout,
            )
            .await;

            for result in &round_results {
                metrics.record(result);
            }
            results.push(round_results);
        }

        let final_round = rounds.saturating_sub(1);
        let final_response = self.synthesizer.synthesize(&forum.all());
        forum.post(Role::System, "system", final_response.clone(), final_round);

        tracing::debug!(rounds, messages = forum.len(), "session complete");
        Ok(OrchestrationOutcome {
            rounds,
            results,
            metrics,
            transcript: forum.all(),
            final_response,
        })
    }

    /// Resolve the requested agent names against the registry and policy.
    ///
    /// An explicitly requested agent that is unknown or disallowed is
    /// session-fatal. An empty request falls back to a default subset of
    /// the registry, silently filtered by the allowlist.
    fn resolve_selection(
        &self,
        requested: &[String],
    ) -> Result<Vec<(String, Arc<dyn Worker>)>, PolicyError> {
        let names: Vec<String> = if requested.is_empty() {
            self.policy
                .filter(&self.registry.names())
                .into_iter()
                .take(DEFAULT_SELECTION_SIZE)
                .collect()
        } else {
            self.policy.check_selection(requested)?;
            requested.to_vec()
        };

        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let Some(worker) = self.registry.instantiate(&name) else {
                return Err(PolicyError::UnknownAgent { name });
            };
            selected.push((name, worker));
        }
        Ok(selected)
    }
}
