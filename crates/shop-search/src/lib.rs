//! Catalog search orchestration: retrieval, balanced rating rerank, result formatting.

mod format;
mod service;

pub use format::{format_average, result_entry};
pub use service::{CatalogSearch, SearchLimits};
pub use shop_types::{ProductSearch, SearchError};
