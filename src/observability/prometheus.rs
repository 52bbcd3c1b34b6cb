//! Prometheus text exposition rendering for session metrics.
//!
//! The core only produces the string; writing it anywhere is the caller's
//! concern (the CLI writes it to `observability.metrics_path`).

use crate::orchestrator::OrchestrationOutcome;
use std::fmt::Write as _;
use std::time::Duration;

/// Render one session's metrics in the Prometheus text exposition format.
#[must_use]
pub fn render(agent: &str, duration: Duration, outcome: &OrchestrationOutcome) -> String {
    let mut out = String::new();

    out.push_str("# HELP ftsystem_run_duration_seconds Agent execution duration.\n");
    out.push_str("# TYPE ftsystem_run_duration_seconds gauge\n");
    let _ = writeln!(
        out,
        "ftsystem_run_duration_seconds{{agent=\"{agent}\"}} {:.6}",
        duration.as_secs_f64()
    );

    out.push_str("# HELP ftsystem_rounds_total Number of orchestration rounds.\n");
    out.push_str("# TYPE ftsystem_rounds_total gauge\n");
    let _ = writeln!(
        out,
        "ftsystem_rounds_total{{agent=\"{agent}\"}} {}",
        outcome.rounds
    );

    if !outcome.metrics.is_empty() {
        out.push_str(
            "# HELP ftsystem_subagent_latency_seconds Sub-agent average latency in seconds.\n",
        );
        out.push_str("# TYPE ftsystem_subagent_latency_seconds gauge\n");
        for (name, stats) in outcome.metrics.iter() {
            let _ = writeln!(
                out,
                "ftsystem_subagent_latency_seconds{{agent=\"{agent}\",subagent=\"{name}\"}} {:.6}",
                stats.average_latency_ms() / 1000.0
            );
        }

        out.push_str("# HELP ftsystem_subagent_success_total Sub-agent successful invocations.\n");
        out.push_str("# TYPE ftsystem_subagent_success_total gauge\n");
        for (name, stats) in outcome.metrics.iter() {
            let _ = writeln!(
                out,
                "ftsystem_subagent_success_total{{agent=\"{agent}\",subagent=\"{name}\"}} {}",
                stats.successes
            );
        }
    }

    out
}
