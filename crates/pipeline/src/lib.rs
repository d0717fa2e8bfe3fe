//! The memhook injection pipeline.
//!
//! Runs once per user turn:
//!
//! 1. **Gate**: skip short or casual prompts without touching the network
//! 2. **Retrieve**: one over-fetching search split into text, skill and
//!    preference candidates
//! 3. **Filter**: optional remote relevance judgment on text candidates,
//!    falling back to "keep everything" on any failure
//! 4. **Format**: per-category blocks under fixed character budgets
//! 5. **Assemble**: wrap the non-empty blocks into one context payload
//!
//! Every stage can end the run with no output; none of them returns an
//! error to the caller.

pub mod assembler;
pub mod format;
pub mod gate;
pub mod json_extract;
pub mod pipeline;
pub mod recency;
pub mod relevance;
pub mod retriever;
pub mod text;

pub use assembler::{CONTEXT_CLOSE, CONTEXT_OPEN, assemble};
pub use format::{BudgetFormatter, FormattedBlock, TextBudget};
pub use gate::should_query;
pub use json_extract::extract_json_array;
pub use pipeline::{InjectionPipeline, Outcome};
pub use relevance::Verdict;
pub use retriever::Candidates;

#[cfg(test)]
pub(crate) mod test_helpers;
