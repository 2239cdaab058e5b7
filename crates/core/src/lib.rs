//! # Skymem Core
//!
//! Domain types, traits, and error definitions for the Sky memory subsystem.
//! This crate has **zero framework dependencies** — it defines the domain
//! model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! External collaborators (the indexer, the audit log, the authority gate)
//! are defined as traits or live in their own crates. Implementations depend
//! inward on core, never the other way around. This enables:
//! - Swapping collaborators via configuration
//! - Easy testing with mock/stub implementations
//! - Durability guarantees that don't depend on collaborator availability

pub mod error;
pub mod indexer;
pub mod record;

// Re-export key types at crate root for ergonomics
pub use error::{Error, MemoryError, Result};
pub use indexer::{Indexer, NoopIndexer};
pub use record::{MemoryRecord, Tier};
