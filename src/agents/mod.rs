//! The worker capability and the registry that produces worker instances.
//!
//! Workers are the pluggable unit of domain logic: the orchestration core
//! only ever sees the [`Worker`] trait and treats every implementation
//! uniformly. Instance-based registry, no global statics.

pub mod builtin;

pub use builtin::{ConfigEchoAgent, HelloAgent, SlowAgent};

use crate::orchestrator::forum::ForumMessage;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Read-only view a worker receives for one invocation: the round index,
/// the session input (if any), and a snapshot of the forum so far. Workers
/// never write to the forum directly.
#[derive(Debug, Clone, Default)]
pub struct WorkerContext {
    pub round: u32,
    pub input: Option<String>,
    pub transcript: Vec<ForumMessage>,
}

/// A helper agent's unit of work.
///
/// Implementations may be natively asynchronous or wrap blocking work; the
/// invoker runs each invocation on its own task, so both behave under the
/// same deadline contract.
pub trait Worker: Send + Sync {
    /// Registered agent name (e.g. "HelloAgent").
    fn name(&self) -> &str;

    fn run<'a>(
        &'a self,
        ctx: &'a WorkerContext,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<serde_json::Value>> + Send + 'a>>;
}

type WorkerFactory = Box<dyn Fn() -> Arc<dyn Worker> + Send + Sync>;

/// Name → factory map for worker implementations.
pub struct AgentRegistry {
    factories: BTreeMap<String, WorkerFactory>,
}

impl AgentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry pre-populated with the built-in demonstration agents.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("HelloAgent", || Arc::new(HelloAgent));
        registry.register("ConfigEchoAgent", || Arc::new(ConfigEchoAgent));
        registry.register("SlowAgent", || Arc::new(SlowAgent::default()));
        registry
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn Worker> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Produce a fresh worker instance for one session.
    #[must_use]
    pub fn instantiate(&self, name: &str) -> Option<Arc<dyn Worker>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
