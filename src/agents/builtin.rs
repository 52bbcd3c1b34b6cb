//! Built-in demonstration agents. Real deployments register their own
//! [`Worker`] implementations; these exist for smoke tests and the CLI demo.

use super::{Worker, WorkerContext};
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Minimal agent that returns a greeting.
pub struct HelloAgent;

impl Worker for HelloAgent {
    fn name(&self) -> &str {
        "HelloAgent"
    }

    fn run<'a>(
        &'a self,
        _ctx: &'a WorkerContext,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<serde_json::Value>> + Send + 'a>> {
        Box::pin(async { Ok(json!({ "message": "Hello, world!" })) })
    }
}

/// Echoes the invocation context back as its payload, for config and
/// plumbing tests.
pub struct ConfigEchoAgent;

impl Worker for ConfigEchoAgent {
    fn name(&self) -> &str {
        "ConfigEchoAgent"
    }

    fn run<'a>(
        &'a self,
        ctx: &'a WorkerContext,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<serde_json::Value>> + Send + 'a>> {
        Box::pin(async move {
            Ok(json!({
                "round": ctx.round,
                "input": ctx.input,
                "transcript_len": ctx.transcript.len(),
            }))
        })
    }
}

/// Sleeps to simulate long-running work; the subject of timeout tests.
pub struct SlowAgent {
    delay: Duration,
}

impl SlowAgent {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SlowAgent {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Worker for SlowAgent {
    fn name(&self) -> &str {
        "SlowAgent"
    }

    fn run<'a>(
        &'a self,
        _ctx: &'a WorkerContext,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<serde_json::Value>> + Send + 'a>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            Ok(json!("slow"))
        })
    }
}
