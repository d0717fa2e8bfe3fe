//! Memory store client implementations for memhook.
//!
//! All stores implement the `memhook_core::MemoryStore` trait.

pub mod http;

pub use http::HttpMemoryStore;
