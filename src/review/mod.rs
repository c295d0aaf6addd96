//! Executive feedback
//!
//! - Review records and submission validation
//! - File-backed and in-memory stores behind the `ReviewStore` trait
//! - Aggregate statistics and most-recent-first pagination

pub mod pagination;
pub mod store;
pub mod summary;
pub mod types;

pub use pagination::{get_page, total_pages, ReviewPage, DEFAULT_PAGE_SIZE};
pub use store::{
    InMemoryReviewStore, JsonFileReviewStore, ReviewStore, ReviewStoreError, ReviewStoreResult,
};
pub use summary::{summarize, ReviewSummary, ReviewerBias, Sentiment};
pub use types::{
    Relationship, Review, ReviewDraft, ReviewMap, SubmissionError, SubmissionResult, ANONYMOUS,
};
