//! Memory records — the unit of persistence for the Sky memory subsystem.
//!
//! A record is created short-term by the write path (or long-term via an
//! explicit remember call), moved to long-term only by promotion, and
//! destroyed only by explicit deletion or archival eviction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::MemoryError;

/// Which stream a record belongs to.
///
/// A record's tier is `Short` until explicitly promoted; promotion is
/// one-directional. The tier also names the backing stream file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Short,
    Long,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Short => write!(f, "short"),
            Tier::Long => write!(f, "long"),
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "short" => Ok(Tier::Short),
            "long" => Ok(Tier::Long),
            other => Err(MemoryError::Validation(format!("unknown tier '{other}'"))),
        }
    }
}

/// A single memory record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Stable identifier: digest of creation timestamp + content, computed
    /// once at write time and stored. Independent of file position, so it
    /// survives rewrites that reorder or remove neighboring lines.
    #[serde(default)]
    pub id: String,

    /// When this record was created
    pub timestamp: DateTime<Utc>,

    /// The memory content
    pub content: String,

    /// Tags for categorization (insertion order preserved)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Importance in [0.0, 1.0]; governs routing and retention.
    /// Absent on disk reads as 0.0 — never auto-promoted.
    #[serde(default)]
    pub importance: f64,

    /// Which stream the record currently belongs to
    pub tier: Tier,

    /// Set exactly once, when promotion flips the tier to long
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoted_at: Option<DateTime<Utc>>,

    /// Source-specific extras (source system, original message, ...) —
    /// opaque to the lifecycle.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl MemoryRecord {
    /// Construct a new record with the current timestamp and a derived id.
    pub fn new(content: impl Into<String>, tags: Vec<String>, importance: f64, tier: Tier) -> Self {
        let content = content.into();
        let timestamp = Utc::now();
        let id = derive_id(&timestamp, &content);
        Self {
            id,
            timestamp,
            content,
            tags,
            importance,
            tier,
            promoted_at: None,
            metadata: serde_json::Map::new(),
        }
    }

    /// Fill in the id for records whose persisted line predates stored ids.
    /// The derivation matches `new`, so an unmodified store yields the same
    /// id on every read.
    pub fn ensure_id(&mut self) {
        if self.id.is_empty() {
            self.id = derive_id(&self.timestamp, &self.content);
        }
    }

    /// Flip the record to long-term: set `promoted_at`, raise importance to
    /// at least `floor`. Promotion may raise importance, never lower it.
    pub fn into_promoted(mut self, floor: f64) -> Self {
        self.tier = Tier::Long;
        self.promoted_at = Some(Utc::now());
        self.importance = self.importance.max(floor);
        self
    }
}

/// Derive a stable record id from creation time and content.
fn derive_id(timestamp: &DateTime<Utc>, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(timestamp.to_rfc3339().as_bytes());
    hasher.update(b":");
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    // 16 hex chars is plenty for a personal store
    hex_prefix(&digest, 16)
}

fn hex_prefix(bytes: &[u8], len: usize) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(len + 1);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
        if out.len() >= len {
            break;
        }
    }
    out.truncate(len);
    out
}
