//! Authority gate — set-membership checks over configured action lists.
//!
//! Callers consult the gate before invoking privileged memory operations.
//! Action names not present in either list are denied: an action the
//! constitution never mentions is not one the agent may invent.

use skymem_config::AuthorityConfig;
use std::collections::HashSet;

/// Result of checking an action against the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthorityDecision {
    /// Action is allowed
    Allowed,
    /// Action is explicitly restricted and needs an owner override
    Restricted { action: String, reason: String },
    /// Action is not recognized (deny by default)
    Unknown { action: String },
}

impl AuthorityDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorityDecision::Allowed)
    }
}

/// Gate over the configured allowed/restricted action sets.
#[derive(Debug, Clone)]
pub struct AuthorityGate {
    allowed: HashSet<String>,
    restricted: HashSet<String>,
}

impl AuthorityGate {
    pub fn new(config: &AuthorityConfig) -> Self {
        Self {
            allowed: config.allowed_actions.iter().cloned().collect(),
            restricted: config.restricted_actions.iter().cloned().collect(),
        }
    }

    /// Check an action name.
    ///
    /// Rules:
    /// - explicitly restricted wins over allowed;
    /// - otherwise the action must be in the allowed set;
    /// - anything else is `Unknown` (denied).
    pub fn check(&self, action: &str) -> AuthorityDecision {
        if self.restricted.contains(action) {
            return AuthorityDecision::Restricted {
                action: action.into(),
                reason: "action requires an owner override".into(),
            };
        }

        if self.allowed.contains(action) {
            AuthorityDecision::Allowed
        } else {
            AuthorityDecision::Unknown {
                action: action.into(),
            }
        }
    }

    /// Convenience: true only for an explicitly allowed action.
    pub fn allowed(&self, action: &str) -> bool {
        self.check(action).is_allowed()
    }
}
