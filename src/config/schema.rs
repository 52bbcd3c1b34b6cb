use crate::error::ConfigError;
use crate::security::RedactionLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub orchestration: OrchestrationConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ── Orchestration ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationConfig {
    /// Names of the helper agents to run each round. Empty means the
    /// coordinator picks a default subset of the registry.
    #[serde(default)]
    pub subagents: Vec<String>,

    /// Number of orchestration rounds to request.
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Per-worker deadline for a single invocation, in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: f64,
}

fn default_rounds() -> u32 {
    1
}

fn default_timeout_seconds() -> f64 {
    30.0
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            subagents: Vec::new(),
            rounds: default_rounds(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

// ── Security ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowlist of agent names permitted to run. Empty means no
    /// restriction.
    #[serde(default)]
    pub allowed_agents: Vec<String>,

    /// Hard cap on requested rounds. Absent means requests pass through
    /// unclamped.
    #[serde(default)]
    pub max_rounds: Option<u32>,

    /// Redaction level applied to worker output before it reaches the
    /// forum: "normal" or "strict".
    #[serde(default)]
    pub redaction_level: RedactionLevel,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_agents: Vec::new(),
            max_rounds: None,
            redaction_level: RedactionLevel::default(),
        }
    }
}

// ── Observability ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Optional path for Prometheus exposition-format metrics. Written by
    /// the CLI after a session; the orchestration core itself never touches
    /// the filesystem.
    #[serde(default)]
    pub metrics_path: Option<PathBuf>,
}

impl Config {
    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&raw).map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `FTSYSTEM_*` environment variables on top of file values.
    ///
    /// Recognised: `FTSYSTEM_ALLOWED_AGENTS` (comma-separated names),
    /// `FTSYSTEM_MAX_ROUNDS`, `FTSYSTEM_REDACTION_LEVEL`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(raw) = std::env::var("FTSYSTEM_ALLOWED_AGENTS") {
            let names: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if !names.is_empty() {
                self.security.allowed_agents = names;
            }
        }
        if let Ok(raw) = std::env::var("FTSYSTEM_MAX_ROUNDS") {
            match raw.trim().parse::<u32>() {
                Ok(max) if max >= 1 => self.security.max_rounds = Some(max),
                _ => tracing::warn!(value = %raw, "ignoring invalid FTSYSTEM_MAX_ROUNDS"),
            }
        }
        if let Ok(raw) = std::env::var("FTSYSTEM_REDACTION_LEVEL") {
            match raw.trim().parse::<RedactionLevel>() {
                Ok(level) => self.security.redaction_level = level,
                Err(_) => {
                    tracing::warn!(value = %raw, "ignoring invalid FTSYSTEM_REDACTION_LEVEL");
                }
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.orchestration.timeout_seconds <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "timeout_seconds must be positive, got {}",
                self.orchestration.timeout_seconds
            )));
        }
        if self.security.max_rounds == Some(0) {
            return Err(ConfigError::Validation(
                "max_rounds must be at least 1 when set".into(),
            ));
        }
        Ok(())
    }
}
