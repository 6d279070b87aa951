//! Retrieval engine adapters implementing [`Retriever`].

mod http;
#[cfg(feature = "test-util")]
pub mod mock;

pub use http::HttpRetriever;
pub use shop_types::{Candidate, Retriever, RetrieverError};

#[cfg(feature = "test-util")]
pub use mock::StaticRetriever;
