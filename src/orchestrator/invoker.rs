//! Deadline-wrapped worker invocation.
//!
//! Every invocation attempt, whatever its outcome, is normalised into a
//! [`WorkerResult`]. Faults never escape `invoke`: controlled worker errors,
//! panics, and deadline overruns all become result records distinguished by
//! `status`.

use crate::agents::{Worker, WorkerContext};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    Success,
    Error,
    Timeout,
}

/// Uniform record of exactly one invocation attempt. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerResult {
    pub agent_name: String,
    pub status: WorkerStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    pub latency_ms: f64,
}

impl WorkerResult {
    #[must_use]
    pub fn success(agent_name: impl Into<String>, payload: serde_json::Value, latency: Duration) -> Self {
        Self {
            agent_name: agent_name.into(),
            status: WorkerStatus::Success,
            payload: Some(payload),
            error_detail: None,
            latency_ms: as_millis_f64(latency),
        }
    }

    #[must_use]
    pub fn error(agent_name: impl Into<String>, detail: impl Into<String>, latency: Duration) -> Self {
        Self {
            agent_name: agent_name.into(),
            status: WorkerStatus::Error,
            payload: None,
            error_detail: Some(detail.into()),
            latency_ms: as_millis_f64(latency),
        }
    }

    #[must_use]
    pub fn timeout(agent_name: impl Into<String>, detail: impl Into<String>, latency: Duration) -> Self {
        Self {
            agent_name: agent_name.into(),
            status: WorkerStatus::Timeout,
            payload: None,
            error_detail: Some(detail.into()),
            latency_ms: as_millis_f64(latency),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == WorkerStatus::Success
    }

    /// One-line rendering for the forum: the payload for a success, the
    /// error detail otherwise.
    #[must_use]
    pub fn summary(&self) -> String {
        match (&self.payload, &self.error_detail) {
            (Some(serde_json::Value::String(s)), _) => s.clone(),
            (Some(value), _) => value.to_string(),
            (None, Some(detail)) => format!("[{}] {detail}", status_label(self.status)),
            (None, None) => format!("[{}]", status_label(self.status)),
        }
    }
}

fn status_label(status: WorkerStatus) -> &'static str {
    match status {
        WorkerStatus::Success => "success",
        WorkerStatus::Error => "error",
        WorkerStatus::Timeout => "timeout",
    }
}

fn as_millis_f64(latency: Duration) -> f64 {
    latency.as_secs_f64() * 1000.0
}

/// Run one worker under `deadline` and normalise the outcome.
///
/// The worker runs on its own task so that a panicking or blocking
/// implementation cannot take the caller down with it; on timeout the task
/// is aborted and abandoned without further waiting.
pub async fn invoke(
    agent_name: &str,
    worker: Arc<dyn Worker>,
    ctx: Arc<WorkerContext>,
    deadline: Duration,
) -> WorkerResult {
    let start = Instant::now();
    tracing::debug!(agent = agent_name, deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX), "invoking worker");

    let mut handle = tokio::spawn(async move { worker.run(&ctx).await });

    match tokio::time::timeout(deadline, &mut handle).await {
        Ok(Ok(Ok(payload))) => {
            let latency = start.elapsed();
            tracing::debug!(agent = agent_name, latency_ms = as_millis_f64(latency), "worker succeeded");
            WorkerResult::success(agent_name, payload, latency)
        }
        Ok(Ok(Err(err))) => {
            let latency = start.elapsed();
            tracing::warn!(agent = agent_name, error = %err, "worker reported failure");
            WorkerResult::error(agent_name, format!("{err:#}"), latency)
        }
        Ok(Err(join_err)) => {
            let latency = start.elapsed();
            let detail = if join_err.is_panic() {
                format!("worker panicked: {join_err}")
            } else {
                format!("worker task failed: {join_err}")
            };
            tracing::warn!(agent = agent_name, error = %detail, "worker fault");
            WorkerResult::error(agent_name, detail, latency)
        }
        Err(_elapsed) => {
            handle.abort();
            let latency = start.elapsed();
            tracing::warn!(
                agent = agent_name,
                deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                "worker exceeded deadline"
            );
            WorkerResult::timeout(
                agent_name,
                format!("deadline of {:.3}s exceeded", deadline.as_secs_f64()),
                latency,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::future::Future;
    use std::pin::Pin;

    struct Immediate;

    impl Worker for Immediate {
        fn name(&self) -> &str {
            "Immediate"
        }

        fn run<'a>(
            &'a self,
            _ctx: &'a WorkerContext,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<serde_json::Value>> + Send + 'a>> {
            Box::pin(async { Ok(json!("ok")) })
        }
    }

    struct Failing;

    impl Worker for Failing {
        fn name(&self) -> &str {
            "Failing"
        }

        fn run<'a>(
            &'a self,
            _ctx: &'a WorkerContext,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<serde_json::Value>> + Send + 'a>> {
            Box::pin(async { anyhow::bail!("backend unavailable") })
        }
    }

    struct Panicking;

    impl Worker for Panicking {
        fn name(&self) -> &str {
            "Panicking"
        }

        fn run<'a>(
            &'a self,
            _ctx: &'a WorkerContext,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<serde_json::Value>> + Send + 'a>> {
            Box::pin(async { panic!("unexpected fault") })
        }
    }

    struct Sleeper(Duration);

    impl Worker for Sleeper {
        fn name(&self) -> &str {
            "Sleeper"
        }

        fn run<'a>(
            &'a self,
            _ctx: &'a WorkerContext,
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<serde_json::Value>> + Send + 'a>> {
            Box::pin(async move {
                tokio::time::sleep(self.0).await;
                Ok(json!("late"))
            })
        }
    }

    fn ctx() -> Arc<WorkerContext> {
        Arc::new(WorkerContext::default())
    }

    #[tokio::test]
    async fn success_carries_payload_and_latency() {
        let result = invoke("Immediate", Arc::new(Immediate), ctx(), Duration::from_secs(5)).await;
        assert_eq!(result.status, WorkerStatus::Success);
        assert_eq!(result.payload, Some(json!("ok")));
        assert!(result.error_detail.is_none());
        assert!(result.latency_ms >= 0.0);
    }

    #[tokio::test]
    async fn controlled_failure_becomes_error_status() {
        let result = invoke("Failing", Arc::new(Failing), ctx(), Duration::from_secs(5)).await;
        assert_eq!(result.status, WorkerStatus::Error);
        assert!(result.payload.is_none());
        assert!(result.error_detail.unwrap().contains("backend unavailable"));
    }

    #[tokio::test]
    async fn panic_is_absorbed_as_error() {
        let result = invoke("Panicking", Arc::new(Panicking), ctx(), Duration::from_secs(5)).await;
        assert_eq!(result.status, WorkerStatus::Error);
        assert!(result.error_detail.unwrap().contains("panicked"));
    }

    #[tokio::test]
    async fn deadline_overrun_becomes_timeout() {
        let slow = Arc::new(Sleeper(Duration::from_secs(30)));
        let result = invoke("Sleeper", slow, ctx(), Duration::from_millis(50)).await;
        assert_eq!(result.status, WorkerStatus::Timeout);
        assert!(result.error_detail.unwrap().contains("deadline"));
        // Latency reflects the time until the deadline fired, not the full sleep.
        assert!(result.latency_ms < 5_000.0);
    }

    #[test]
    fn summary_prefers_payload() {
        let ok = WorkerResult::success("A", json!({"k": 1}), Duration::from_millis(1));
        assert_eq!(ok.summary(), "{\"k\":1}");
        let plain = WorkerResult::success("A", json!("ok-A"), Duration::from_millis(1));
        assert_eq!(plain.summary(), "ok-A");
        let err = WorkerResult::error("B", "boom", Duration::from_millis(1));
        assert_eq!(err.summary(), "[error] boom");
        let late = WorkerResult::timeout("C", "deadline of 5.000s exceeded", Duration::from_millis(1));
        assert_eq!(late.summary(), "[timeout] deadline of 5.000s exceeded");
    }
}
