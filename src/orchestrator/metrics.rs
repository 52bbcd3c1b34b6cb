//! Per-agent counters accumulated by the coordinator across rounds.

use super::invoker::WorkerResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    pub invocations: u64,
    pub successes: u64,
    pub total_latency_ms: f64,
}

impl AgentStats {
    #[must_use]
    pub fn average_latency_ms(&self) -> f64 {
        if self.invocations == 0 {
            0.0
        } else {
            self.total_latency_ms / self.invocations as f64
        }
    }
}

/// Session-scoped metrics, owned by the coordinator and folded once per
/// [`WorkerResult`] after each round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionMetrics {
    agents: BTreeMap<String, AgentStats>,
}

impl SessionMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &WorkerResult) {
        let stats = self.agents.entry(result.agent_name.clone()).or_default();
        stats.invocations += 1;
        if result.is_success() {
            stats.successes += 1;
        }
        stats.total_latency_ms += result.latency_ms;
    }

    #[must_use]
    pub fn get(&self, agent_name: &str) -> Option<&AgentStats> {
        self.agents.get(agent_name)
    }

    /// Iterate agents in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AgentStats)> {
        self.agents.iter().map(|(name, stats)| (name.as_str(), stats))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
