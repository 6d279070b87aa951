//! Rating-biased reranking and review keyword extraction.
//!
//! Everything here is synchronous and free of I/O; callers own retrieval and storage.

mod balanced;
mod buckets;
mod keywords;

pub use balanced::{
    AttemptOutcome, BalancedReranker, InsufficientReason, RerankConfig, RerankError, RerankStats,
    Reranked, rerank,
};
pub use buckets::{mean, RatingBuckets};
pub use keywords::{extract_keywords, Keywords, NEGATIVE_PREFIX, POSITIVE_PREFIX};
