//! JSONL loading of review and metadata records.
//!
//! Review lines: `{"asin": "...", "overall": 5.0, "summary": "..."}`.
//! Metadata lines: `{"asin": "...", "title": "...", "image": ["https://..."]}`.
//! Malformed lines are skipped with a warning; only unreadable files are errors.

use crate::memory::{CatalogBuilder, InMemoryCatalog};
use serde::Deserialize;
use shop_types::{ProductMeta, ReviewRecord};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Counts from one load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub reviews: usize,
    pub items: usize,
    pub meta_records: usize,
    pub skipped_lines: usize,
}

#[derive(Debug, Deserialize)]
struct RawReview {
    asin: String,
    overall: f64,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct RawMeta {
    asin: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    image: Vec<String>,
}

fn non_empty_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}

/// Parse review lines into `builder`; returns (accepted, skipped).
fn ingest_reviews(builder: &mut CatalogBuilder, source: &str, content: &str) -> (usize, usize) {
    let (mut accepted, mut skipped) = (0, 0);
    for (line_no, line) in non_empty_lines(content) {
        match serde_json::from_str::<RawReview>(line) {
            Ok(raw) if raw.overall.is_finite() && (1.0..=5.0).contains(&raw.overall) => {
                builder.add_review(raw.asin, ReviewRecord::new(raw.overall, raw.summary));
                accepted += 1;
            }
            Ok(raw) => {
                tracing::warn!(
                    source,
                    line = line_no,
                    asin = %raw.asin,
                    rating = raw.overall,
                    "skipping review with out-of-range rating"
                );
                skipped += 1;
            }
            Err(e) => {
                tracing::warn!(source, line = line_no, error = %e, "skipping malformed review");
                skipped += 1;
            }
        }
    }
    (accepted, skipped)
}

/// Parse metadata lines into `builder`, keeping only items that already have reviews.
fn ingest_meta(builder: &mut CatalogBuilder, source: &str, content: &str) -> (usize, usize) {
    let (mut accepted, mut skipped) = (0, 0);
    for (line_no, line) in non_empty_lines(content) {
        match serde_json::from_str::<RawMeta>(line) {
            Ok(raw) => {
                if !builder.has_reviews(&raw.asin) {
                    continue;
                }
                let title = if raw.title.is_empty() {
                    raw.asin.clone()
                } else {
                    raw.title
                };
                builder.add_meta(
                    raw.asin,
                    ProductMeta {
                        title,
                        image_url: raw.image.into_iter().next(),
                    },
                );
                accepted += 1;
            }
            Err(e) => {
                tracing::warn!(source, line = line_no, error = %e, "skipping malformed metadata");
                skipped += 1;
            }
        }
    }
    (accepted, skipped)
}

/// Build a catalog from in-memory JSONL text.
fn parse_catalog(reviews: &str, meta: &str) -> (InMemoryCatalog, LoadReport) {
    let mut builder = CatalogBuilder::new();
    let (review_count, skipped_reviews) = ingest_reviews(&mut builder, "reviews", reviews);
    let (meta_records, skipped_meta) = ingest_meta(&mut builder, "metadata", meta);
    let catalog = builder.build();
    let report = LoadReport {
        reviews: review_count,
        items: shop_types::Catalog::len(&catalog),
        meta_records,
        skipped_lines: skipped_reviews + skipped_meta,
    };
    (catalog, report)
}

async fn read(path: &Path) -> Result<String, LoadError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })
}

impl InMemoryCatalog {
    /// Load reviews and metadata from JSONL files.
    pub async fn load(
        reviews_path: impl AsRef<Path>,
        meta_path: impl AsRef<Path>,
    ) -> Result<(Self, LoadReport), LoadError> {
        let reviews = read(reviews_path.as_ref()).await?;
        let meta = read(meta_path.as_ref()).await?;
        let (catalog, report) = parse_catalog(&reviews, &meta);
        tracing::info!(
            reviews = report.reviews,
            items = report.items,
            meta_records = report.meta_records,
            skipped = report.skipped_lines,
            "catalog loaded"
        );
        Ok((catalog, report))
    }

    /// Build from in-memory JSONL text.
    pub fn from_jsonl(reviews: &str, meta: &str) -> (Self, LoadReport) {
        parse_catalog(reviews, meta)
    }
}
