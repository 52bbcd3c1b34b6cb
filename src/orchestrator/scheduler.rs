//! One concurrent round over the selected workers.
//!
//! All workers are dispatched at once and each runs under its own
//! independent deadline; the round is a join barrier, not a race. Results
//! come back in the order the workers were selected, never in completion
//! order, so downstream aggregation is reproducible regardless of
//! scheduling jitter.

use super::forum::{Forum, Role};
use super::invoker::{self, WorkerResult};
use crate::agents::{Worker, WorkerContext};
use crate::security::Redactor;
use std::sync::Arc;
use std::time::Duration;

/// Run every selected worker once, join them all, then post one redacted
/// agent message per worker to the forum in selection order.
pub async fn run_round(
    forum: &Forum,
    redactor: &Redactor,
    round: u32,
    selected: &[(String, Arc<dyn Worker>)],
    ctx: &Arc<WorkerContext>,
    timeout: Duration,
) -> Vec<WorkerResult> {
    tracing::debug!(
        round,
        workers = selected.len(),
        timeout_s = timeout.as_secs_f64(),
        "dispatching round"
    );

    // Dispatch everything up front; awaiting the handles afterwards in
    // selection order is the join barrier and fixes the result order.
    let handles: Vec<_> = selected
        .iter()
        .map(|(name, worker)| {
            let name = name.clone();
            let worker = Arc::clone(worker);
            let ctx = Arc::clone(ctx);
            tokio::spawn(async move { invoker::invoke(&name, worker, ctx, timeout).await })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for ((name, _), handle) in selected.iter().zip(handles) {
        let result = match handle.await {
            Ok(result) => result,
            // invoke() absorbs worker faults, so this only fires if the
            // dispatch task itself was cancelled or the runtime shut down.
            Err(join_err) => {
                tracing::warn!(agent = %name, error = %join_err, "dispatch task failed");
                WorkerResult::error(name.clone(), format!("dispatch failed: {join_err}"), Duration::ZERO)
            }
        };
        results.push(result);
    }

    // The workers never touch the forum themselves; all posts happen here,
    // after the join, serialized and in selection order.
    for result in &results {
        let content = redactor.redact(&result.summary());
        forum.post(Role::Agent, result.agent_name.clone(), content, round);
    }

    tracing::debug!(
        round,
        succeeded = results.iter().filter(|r| r.is_success()).count(),
        total = results.len(),
        "round complete"
    );
    results
}
