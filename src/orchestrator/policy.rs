//! Session security policy: agent allowlisting and round caps.
//!
//! The policy is a pure evaluator built from config at session start. It is
//! passed into the coordinator explicitly, never read from process-wide
//! state, so two sessions in one process can run under different policies.

use crate::config::SecurityConfig;
use crate::error::PolicyError;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct SessionPolicy {
    /// `None` means unrestricted; an empty configured set is treated the
    /// same way.
    allowed: Option<BTreeSet<String>>,
    max_rounds: Option<u32>,
}

impl SessionPolicy {
    #[must_use]
    pub fn new(allowed_agents: Option<Vec<String>>, max_rounds: Option<u32>) -> Self {
        let allowed = allowed_agents
            .map(|names| names.into_iter().collect::<BTreeSet<_>>())
            .filter(|set| !set.is_empty());
        Self {
            allowed,
            max_rounds: max_rounds.filter(|&max| max >= 1),
        }
    }

    #[must_use]
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(Some(config.allowed_agents.clone()), config.max_rounds)
    }

    #[must_use]
    pub fn is_allowed(&self, agent_name: &str) -> bool {
        self.allowed
            .as_ref()
            .is_none_or(|set| set.contains(agent_name))
    }

    /// Drop disallowed names, preserving order. Used for default selection;
    /// explicitly requested agents go through [`Self::check_selection`]
    /// instead.
    #[must_use]
    pub fn filter(&self, names: &[String]) -> Vec<String> {
        names
            .iter()
            .filter(|name| self.is_allowed(name))
            .cloned()
            .collect()
    }

    /// Reject the whole selection if any requested agent is disallowed.
    pub fn check_selection(&self, names: &[String]) -> Result<(), PolicyError> {
        for name in names {
            if !self.is_allowed(name) {
                return Err(PolicyError::AgentNotAllowed { name: name.clone() });
            }
        }
        Ok(())
    }

    /// Validate and clamp the requested round count.
    pub fn cap_rounds(&self, requested: u32) -> Result<u32, PolicyError> {
        if requested < 1 {
            return Err(PolicyError::InvalidRounds { requested });
        }
        Ok(match self.max_rounds {
            Some(max) => requested.min(max),
            None => requested,
        })
    }

    #[must_use]
    pub fn max_rounds(&self) -> Option<u32> {
        self.max_rounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_allowlist_allows_everyone() {
        let policy = SessionPolicy::new(Some(vec![]), None);
        assert!(policy.is_allowed("Anyone"));
        assert!(policy.check_selection(&["A".into(), "B".into()]).is_ok());
    }

    #[test]
    fn allowlist_rejects_outsiders() {
        let policy = SessionPolicy::new(Some(vec!["HelloAgent".into()]), None);
        assert!(policy.is_allowed("HelloAgent"));
        assert!(!policy.is_allowed("SlowAgent"));
        assert_eq!(
            policy.check_selection(&["HelloAgent".into(), "SlowAgent".into()]),
            Err(PolicyError::AgentNotAllowed {
                name: "SlowAgent".into()
            })
        );
    }

    #[test]
    fn filter_preserves_order() {
        let policy = SessionPolicy::new(Some(vec!["B".into(), "A".into()]), None);
        let kept = policy.filter(&["C".into(), "B".into(), "A".into()]);
        assert_eq!(kept, vec!["B".to_string(), "A".to_string()]);
    }

    #[test]
    fn cap_rounds_clamps_to_max() {
        let policy = SessionPolicy::new(None, Some(5));
        assert_eq!(policy.cap_rounds(3).unwrap(), 3);
        assert_eq!(policy.cap_rounds(9).unwrap(), 5);
    }

    #[test]
    fn cap_rounds_without_max_passes_through() {
        let policy = SessionPolicy::default();
        assert_eq!(policy.cap_rounds(42).unwrap(), 42);
    }

    #[test]
    fn zero_rounds_is_a_violation() {
        let policy = SessionPolicy::default();
        assert_eq!(
            policy.cap_rounds(0),
            Err(PolicyError::InvalidRounds { requested: 0 })
        );
    }
}
