//! CatalogSearch: query context composing a retriever, the catalog and rerank tuning.

use crate::format::result_entry;
use shop_rank::{BalancedReranker, RerankConfig};
use shop_types::{
    Candidate, Catalog, ItemId, ProductSearch, ResultEntry, Retriever, SearchError, SortMode,
};
use std::collections::HashMap;

/// How many candidates to request per mode, and how many entries to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub relevance_depth: usize,
    pub rating_depth: usize,
    pub display_count: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            relevance_depth: 10,
            rating_depth: 100,
            display_count: 10,
        }
    }
}

/// Search context built once at startup and read-only afterwards.
pub struct CatalogSearch<R, C> {
    pub retriever: R,
    pub catalog: C,
    pub rerank: RerankConfig,
    pub limits: SearchLimits,
}

impl<R, C> CatalogSearch<R, C>
where
    R: Retriever,
    C: Catalog,
{
    pub fn new(retriever: R, catalog: C) -> Self {
        let limits = SearchLimits::default();
        Self {
            retriever,
            catalog,
            rerank: RerankConfig::default().with_result_count(limits.display_count),
            limits,
        }
    }

    /// Replace the rerank tuning; `result_count` follows `limits.display_count`.
    pub fn with_rerank_config(mut self, config: RerankConfig) -> Self {
        self.rerank = config.with_result_count(self.limits.display_count);
        self
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self.rerank.result_count = limits.display_count;
        self
    }

    fn normalize_query(query: &str) -> String {
        query.trim().to_lowercase()
    }

    /// Every candidate must have a catalog entry; a miss means retrieval and store disagree.
    fn ensure_known(&self, candidates: &[Candidate]) -> Result<(), SearchError> {
        match candidates.iter().find(|c| self.catalog.get(&c.id).is_none()) {
            Some(missing) => Err(SearchError::MissingReviewData(missing.id.clone())),
            None => Ok(()),
        }
    }

    fn format(&self, ids: &[ItemId]) -> Result<Vec<ResultEntry>, SearchError> {
        ids.iter()
            .take(self.limits.display_count)
            .map(|id| {
                self.catalog
                    .get(id)
                    .map(result_entry)
                    .ok_or_else(|| SearchError::MissingReviewData(id.clone()))
            })
            .collect()
    }

    async fn by_relevance(&self, query: &str) -> Result<Vec<ResultEntry>, SearchError> {
        let candidates = self
            .retriever
            .search(query, self.limits.relevance_depth)
            .await?;
        self.ensure_known(&candidates)?;
        let ids: Vec<ItemId> = candidates.into_iter().map(|c| c.id).collect();
        self.format(&ids)
    }

    async fn by_rating(&self, query: &str) -> Result<Vec<ResultEntry>, SearchError> {
        let candidates = self
            .retriever
            .search(query, self.limits.rating_depth)
            .await?;
        self.ensure_known(&candidates)?;

        let ratings: HashMap<&str, f64> = candidates
            .iter()
            .filter_map(|c| {
                self.catalog
                    .average_rating(&c.id)
                    .map(|r| (c.id.as_str(), r))
            })
            .collect();
        let reranker = BalancedReranker::new(
            &candidates,
            |id| ratings.get(id).copied().unwrap_or(f64::NEG_INFINITY),
            &self.rerank,
        );
        let reranked = reranker.rerank()?;
        let stats = &reranked.stats;
        tracing::debug!(
            candidates = candidates.len(),
            threshold = stats.threshold,
            attempts = stats.attempts,
            mean_error = stats.mean_error,
            mean_baseline = stats.mean_baseline,
            relative_error = stats.relative_error(),
            "balanced rerank finished"
        );
        self.format(&reranked.ids)
    }
}

#[async_trait::async_trait]
impl<R, C> ProductSearch for CatalogSearch<R, C>
where
    R: Retriever,
    C: Catalog,
{
    async fn get_results(
        &self,
        query: &str,
        mode: SortMode,
    ) -> Result<Vec<ResultEntry>, SearchError> {
        let query = Self::normalize_query(query);
        let result = match mode {
            SortMode::Relevance => self.by_relevance(&query).await,
            SortMode::Rating => self.by_rating(&query).await,
        };
        match &result {
            Ok(entries) => tracing::info!(%mode, results = entries.len(), "search completed"),
            Err(e) => tracing::warn!(%mode, error = %e, "search failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_retrieval::StaticRetriever;
    use shop_store::{InMemoryCatalog, ProductMeta, ReviewRecord};

    /// Twelve items: relevance 20.0 down in steps of 0.5, ratings cycling 1..5.
    fn catalog() -> InMemoryCatalog {
        let mut b = InMemoryCatalog::builder();
        for i in 0..12 {
            let id = format!("item{i:02}");
            let rating = 1.0 + (i % 5) as f64;
            b.add_review(id.as_str(), ReviewRecord::new(rating, format!("review of {id}")));
            b.add_meta(
                id.as_str(),
                ProductMeta {
                    title: format!("Title {i:02}"),
                    image_url: None,
                },
            );
        }
        b.build()
    }

    fn candidates(n: usize) -> Vec<Candidate> {
        (0..n)
            .map(|i| Candidate::new(format!("item{i:02}"), 20.0 - 0.5 * i as f64))
            .collect()
    }

    fn titles(entries: &[ResultEntry]) -> Vec<String> {
        entries.iter().map(|e| e.title.clone()).collect()
    }

    #[tokio::test]
    async fn relevance_mode_preserves_engine_order() {
        let search = CatalogSearch::new(StaticRetriever::new(candidates(12)), catalog());
        let out = search.get_results("Guitar", SortMode::Relevance).await.unwrap();
        let expected: Vec<String> = (0..10).map(|i| format!("Title {i:02}")).collect();
        assert_eq!(titles(&out), expected);
    }

    #[tokio::test]
    async fn query_is_lowercased_before_retrieval() {
        let retriever = StaticRetriever::new(vec![])
            .with_query("guitar strings", candidates(3));
        let search = CatalogSearch::new(retriever, catalog());
        let out = search
            .get_results("  Guitar Strings ", SortMode::Relevance)
            .await
            .unwrap();
        assert_eq!(out.len(), 3);
    }

    #[tokio::test]
    async fn rating_mode_orders_by_average_rating() {
        let search = CatalogSearch::new(StaticRetriever::new(candidates(12)), catalog());
        let out = search.get_results("guitar", SortMode::Rating).await.unwrap();
        assert_eq!(out.len(), 10);
        let ratings: Vec<f64> = out
            .iter()
            .map(|e| {
                e.rating_line
                    .trim_start_matches("Avg Rating: ")
                    .split(' ')
                    .next()
                    .unwrap()
                    .parse()
                    .unwrap()
            })
            .collect();
        assert!(ratings.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(ratings[0], 5.0);
    }

    #[tokio::test]
    async fn rating_mode_with_too_few_candidates_is_insufficient() {
        let search = CatalogSearch::new(StaticRetriever::new(candidates(4)), catalog());
        let err = search.get_results("guitar", SortMode::Rating).await.unwrap_err();
        assert!(matches!(err, SearchError::InsufficientCandidates(_)));
    }

    #[tokio::test]
    async fn unknown_candidate_is_missing_review_data() {
        let mut c = candidates(3);
        c.push(Candidate::new("ghost", 1.0));
        let search = CatalogSearch::new(StaticRetriever::new(c), catalog());
        let err = search.get_results("guitar", SortMode::Relevance).await.unwrap_err();
        assert!(matches!(err, SearchError::MissingReviewData(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn retrieval_failure_is_surfaced() {
        let search = CatalogSearch::new(StaticRetriever::failing(), catalog());
        let err = search.get_results("guitar", SortMode::Rating).await.unwrap_err();
        assert!(matches!(err, SearchError::RetrievalUnavailable(_)));
    }

    #[tokio::test]
    async fn limits_drive_rerank_result_count() {
        let search = CatalogSearch::new(StaticRetriever::new(candidates(12)), catalog())
            .with_limits(SearchLimits {
                relevance_depth: 5,
                rating_depth: 12,
                display_count: 3,
            });
        assert_eq!(search.rerank.result_count, 3);
        let out = search.get_results("guitar", SortMode::Rating).await.unwrap();
        assert_eq!(out.len(), 3);
        let out = search.get_results("guitar", SortMode::Relevance).await.unwrap();
        assert_eq!(out.len(), 3);
    }
}
