//! Traits for the retrieval engine and the review/metadata catalog.

use crate::{Candidate, CatalogEntry, ResultEntry, SortMode};
use async_trait::async_trait;

/// Retrieval engine: query string -> relevance-ordered candidates.
///
/// Implementations must return candidates sorted by relevance descending with unique ids;
/// callers do not re-sort.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<Candidate>, RetrieverError>;
}

/// Read-only keyed lookup over reviews and metadata.
pub trait Catalog: Send + Sync {
    /// Get one item by id.
    fn get(&self, id: &str) -> Option<&CatalogEntry>;

    /// Average rating of an item, if it has reviews.
    fn average_rating(&self, id: &str) -> Option<f64> {
        self.get(id).map(|e| e.average_rating)
    }

    /// Number of items in the catalog.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Caller-facing search: query + sort mode -> ordered result entries.
#[async_trait]
pub trait ProductSearch: Send + Sync {
    async fn get_results(&self, query: &str, mode: SortMode)
        -> Result<Vec<ResultEntry>, SearchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RetrieverError {
    #[error("retrieval engine error: {0}")]
    Other(String),
    #[error("retrieval engine returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Caller-facing search error. Every variant is recoverable: the caller shows an empty
/// or degraded list and may issue a new query.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("retrieval unavailable: {0}")]
    RetrievalUnavailable(#[from] RetrieverError),
    #[error("insufficient candidates: {0}")]
    InsufficientCandidates(String),
    #[error("missing review data for item {0}")]
    MissingReviewData(String),
}
