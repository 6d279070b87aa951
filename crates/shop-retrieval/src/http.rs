//! HTTP client for an external search engine.

use serde::Deserialize;
use shop_types::{Candidate, Retriever, RetrieverError};
use std::time::Duration;

/// Retriever that calls an HTTP search API.
/// Sends POST to `url` with JSON body:
///   { "query": "<query>", "max_results": 100 }
/// and expects, already ordered by relevance descending:
///   { "results": [ { "id": "B000...", "score": 12.7 }, ... ] }
/// `name`/`asin` are accepted for the id and `relevance` for the score.
pub struct HttpRetriever {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpRetriever {
    pub fn new(url: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            api_key,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Deserialize)]
struct SearchResultItem {
    #[serde(alias = "name", alias = "asin")]
    id: String,
    #[serde(alias = "relevance")]
    score: f64,
}

#[derive(Deserialize)]
struct SearchApiResponse {
    results: Vec<SearchResultItem>,
}

#[async_trait::async_trait]
impl Retriever for HttpRetriever {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<Candidate>, RetrieverError> {
        let body = serde_json::json!({
            "query": query,
            "max_results": max_results,
        });

        let mut req = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&body);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }

        let res = req
            .send()
            .await
            .map_err(|e| RetrieverError::Other(e.to_string()))?;
        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(RetrieverError::Status { status, body });
        }

        let parsed: SearchApiResponse = res
            .json()
            .await
            .map_err(|e| RetrieverError::Other(e.to_string()))?;

        let hits: Vec<Candidate> = parsed
            .results
            .into_iter()
            .take(max_results)
            .map(|r| Candidate::new(r.id, r.score))
            .collect();
        tracing::debug!(query, hits = hits.len(), "http retrieval finished");
        Ok(hits)
    }
}
