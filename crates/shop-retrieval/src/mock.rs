//! Fixed retriever for tests: returns canned candidates, no index or network.

use shop_types::{Candidate, Retriever, RetrieverError};
use std::collections::HashMap;

/// Retriever that answers every query from a fixed table.
///
/// Queries not in the table get the default list; `failing()` errors on every call.
pub struct StaticRetriever {
    by_query: HashMap<String, Vec<Candidate>>,
    default: Vec<Candidate>,
    fail: bool,
}

impl StaticRetriever {
    pub fn new(default: Vec<Candidate>) -> Self {
        Self {
            by_query: HashMap::new(),
            default,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn with_query(mut self, query: &str, candidates: Vec<Candidate>) -> Self {
        self.by_query.insert(query.to_string(), candidates);
        self
    }
}

#[async_trait::async_trait]
impl Retriever for StaticRetriever {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Candidate>, RetrieverError> {
        if self.fail {
            return Err(RetrieverError::Other("static retriever offline".to_string()));
        }
        let list = self.by_query.get(query).unwrap_or(&self.default);
        Ok(list.iter().take(max_results).cloned().collect())
    }
}
