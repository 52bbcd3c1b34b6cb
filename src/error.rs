use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `ftSystem`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum FtError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Security / Policy ───────────────────────────────────────────────
    #[error("policy: {0}")]
    Policy(#[from] PolicyError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Policy errors ──────────────────────────────────────────────────────────

/// Session-fatal policy violations.
///
/// These are the only errors an orchestration session surfaces to its caller;
/// per-worker faults are absorbed into `WorkerResult` records instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("agent {name} is not in the allowlist")]
    AgentNotAllowed { name: String },

    #[error("agent {name} is not registered")]
    UnknownAgent { name: String },

    #[error("invalid round count {requested}: at least one round is required")]
    InvalidRounds { requested: u32 },
}
