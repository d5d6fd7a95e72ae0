// ABOUTME: Main library entry point for linkpeek, a link-preview extraction pipeline.
// ABOUTME: Re-exports the public API: Client, PeekResult, Extraction, profiles, summarizer boundary.

//! linkpeek - fetch a linked page, find its article text, hand it to a
//! summarizer.
//!
//! The heart of the crate is the content extractor: a layered, domain-aware
//! strategy for locating the primary text of an arbitrary HTML document and
//! normalizing it for a summarization engine. Fetching is a thin async
//! boundary with a short timeout; summarization is an external capability
//! behind the [`Summarizer`] trait.
//!
//! # Example
//!
//! ```no_run
//! use linkpeek::{Client, LeadSummarizer, PeekError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), PeekError> {
//!     let client = Client::builder().build();
//!     let result = client.peek("https://example.com/article").await?;
//!     if let Some(text) = result.text() {
//!         println!("[{}] {}", result.language, text);
//!     }
//!     let engine = LeadSummarizer::default();
//!     let summary = client
//!         .summarize_with(&engine, "https://example.com/article", None)
//!         .await?;
//!     println!("{}", summary.summary);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod lang;
pub mod options;
pub mod profiles;
pub mod result;
pub mod selectors;
pub mod summarize;

pub use crate::client::Client;
pub use crate::error::{ErrorCode, PeekError};
pub use crate::extract::{extract, Extraction, SelectorTier, Strategy, DEFAULT_MAX_CHARS};
pub use crate::lang::{detect_language, normalize_lang};
pub use crate::options::{ClientBuilder, Options};
pub use crate::profiles::{
    host_from_url, load_builtin_profiles, DomainProfile, ProfileRegistry, GENERIC_SELECTORS,
};
pub use crate::result::{PeekResult, Summary};
pub use crate::summarize::{
    engine_output_language, shared_context_for, LeadSummarizer, SharedContext, SummarizeOptions,
    Summarizer, SummarizerCache, SummaryFormat, SummaryKind, SummaryLength,
};

// Re-exported so callers can drive `extract` and `detect_language` directly
// over documents they parsed themselves.
pub use scraper::Html;
