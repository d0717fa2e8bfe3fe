//! # memhook Core
//!
//! Domain types, traits, and error definitions for the memhook
//! context-injection pipeline. This crate has **no transport dependencies**:
//! it defines the model that the store client and the pipeline implement
//! against.
//!
//! ## Layout
//!
//! - [`memory`]: memory items as they arrive from the store, tagged by category
//! - [`store`]: the `MemoryStore` trait plus its request/response shapes
//! - [`hook`]: the JSON envelopes exchanged with the host agent over stdio
//! - [`error`]: the error taxonomy

pub mod error;
pub mod hook;
pub mod memory;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result, StoreError};
pub use hook::{HookInput, HookOutput};
pub use memory::{Category, MemoryGroup, MemoryItem, MemoryMetadata, RawTimestamp};
pub use store::{CompletionRequest, CubeTarget, MemoryStore, SearchRequest, SearchResponse};
