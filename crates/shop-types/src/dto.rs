//! Data model and request/response DTOs for catalog search.

use serde::{Deserialize, Serialize};

/// Catalog item identifier (the product ASIN in the review dataset).
pub type ItemId = String;

/// One retrieval hit: item id and its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: ItemId,
    pub relevance: f64,
}

impl Candidate {
    pub fn new(id: impl Into<ItemId>, relevance: f64) -> Self {
        Self {
            id: id.into(),
            relevance,
        }
    }
}

/// Single review: star rating (1..5) and its summary text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub rating: f64,
    pub text: String,
}

impl ReviewRecord {
    pub fn new(rating: f64, text: impl Into<String>) -> Self {
        Self {
            rating,
            text: text.into(),
        }
    }
}

/// Display metadata for a catalog item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductMeta {
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Everything the catalog knows about one item.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: ItemId,
    pub meta: ProductMeta,
    /// Reviews in ingestion order.
    pub reviews: Vec<ReviewRecord>,
    pub average_rating: f64,
}

/// How results are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Relevance,
    Rating,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::Rating => "rating",
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-facing output unit: one item's title, optional image and rating/keyword line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub rating_line: String,
}

/// Search request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSearchRequest {
    pub query: String,
    #[serde(default)]
    pub mode: SortMode,
}

/// Base response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseResponse<T> {
    #[serde(default = "default_code")]
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
}

fn default_code() -> i32 {
    200
}

/// Search result data: the query id, the mode used and the ordered entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponseData {
    pub query_id: String,
    pub mode: SortMode,
    #[serde(default)]
    pub results: Vec<ResultEntry>,
}

/// Search response.
pub type SearchResponse = BaseResponse<SearchResponseData>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_defaults_to_relevance() {
        let req: ApiSearchRequest = serde_json::from_str(r#"{"query":"guitar strings"}"#).unwrap();
        assert_eq!(req.mode, SortMode::Relevance);

        let req: ApiSearchRequest =
            serde_json::from_str(r#"{"query":"capo","mode":"rating"}"#).unwrap();
        assert_eq!(req.mode, SortMode::Rating);
    }

    #[test]
    fn entry_without_image_omits_field() {
        let entry = ResultEntry {
            title: "Tuner".to_string(),
            image_url: None,
            rating_line: "Avg Rating: 4.5 ".to_string(),
        };
        let v = serde_json::to_value(&entry).unwrap();
        assert!(v.get("image_url").is_none());
        assert_eq!(v["title"], "Tuner");
    }
}
