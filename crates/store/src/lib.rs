//! Durable stream storage for the Sky memory subsystem.

pub mod jsonl;

pub use jsonl::{JsonlStore, StreamGuard};
