//! Importance scoring — pure routing decisions for new content.
//!
//! When the caller supplies an explicit importance it is authoritative.
//! Otherwise a keyword heuristic stands in until an LLM scorer exists:
//! content mentioning durable-sounding terms scores high, everything else
//! low. The same configured threshold decides the tier here and drives the
//! promotion scan, so the two can never disagree.

use skymem_core::record::Tier;

/// Substrings that mark content as long-term material.
pub const HIGH_SIGNAL_KEYWORDS: [&str; 4] = ["policy", "preference", "persistent", "recurring"];

/// Importance assigned on a keyword hit.
pub const KEYWORD_IMPORTANCE: f64 = 0.8;

/// Importance assigned when no keyword matches.
pub const DEFAULT_IMPORTANCE: f64 = 0.4;

/// The scoring policy. Pure — never touches storage.
#[derive(Debug, Clone, Copy)]
pub struct ScoringPolicy {
    promote_threshold: f64,
}

impl ScoringPolicy {
    pub fn new(promote_threshold: f64) -> Self {
        Self { promote_threshold }
    }

    /// The threshold at and above which content is long-term material.
    pub fn threshold(&self) -> f64 {
        self.promote_threshold
    }

    /// Decide importance and tier for a piece of content.
    pub fn score(&self, content: &str, explicit_importance: Option<f64>) -> (f64, Tier) {
        let importance = match explicit_importance {
            Some(importance) => importance,
            None => {
                let lower = content.to_lowercase();
                if HIGH_SIGNAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
                    KEYWORD_IMPORTANCE
                } else {
                    DEFAULT_IMPORTANCE
                }
            }
        };
        (importance, self.tier_for(importance))
    }

    /// The tier an importance value routes to.
    pub fn tier_for(&self, importance: f64) -> Tier {
        if importance >= self.promote_threshold {
            Tier::Long
        } else {
            Tier::Short
        }
    }
}
