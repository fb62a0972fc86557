//! Deterministic dataset preparation for chat-style fine-tuning.
//!
//! Filters raw records by category, guarantees a leading system message,
//! bounds conversation length, and serializes partitions to line-delimited
//! JSON with a stable content digest.

pub mod jsonl;
pub mod prepare;
pub mod schema;

pub use jsonl::{digest, from_jsonl, to_jsonl, JsonlError};
pub use prepare::{normalize, prepare, PrepareConfig};
pub use schema::{Conversation, Message, Partition, Record, Role};
