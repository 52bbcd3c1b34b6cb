//! Round-based orchestration engine: forum, policy, invoker, scheduler,
//! and the master coordinator.

pub mod forum;
pub mod invoker;
pub mod master;
pub mod metrics;
pub mod policy;
pub mod scheduler;

pub use forum::{Forum, ForumMessage, Role};
pub use invoker::{WorkerResult, WorkerStatus, invoke};
pub use master::{
    JoinSynthesizer, MasterCoordinator, OrchestrationOutcome, SessionRequest, Synthesizer,
};
pub use metrics::{AgentStats, SessionMetrics};
pub use policy::SessionPolicy;
pub use scheduler::run_round;
