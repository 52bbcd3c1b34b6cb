#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_precision_loss,
    clippy::return_self_not_must_use
)]

pub mod agents;
pub mod config;
pub mod error;
pub mod observability;
pub mod orchestrator;
pub mod security;

pub use agents::{AgentRegistry, Worker, WorkerContext};
pub use config::Config;
pub use error::{ConfigError, FtError, PolicyError};
pub use orchestrator::{
    Forum, ForumMessage, MasterCoordinator, OrchestrationOutcome, Role, SessionMetrics,
    SessionPolicy, SessionRequest, WorkerResult, WorkerStatus,
};
pub use security::{RedactionLevel, Redactor};
