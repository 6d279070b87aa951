//! In-memory catalog, built once and read-only afterwards.

use shop_rank::mean;
use shop_types::{Catalog, CatalogEntry, ItemId, ProductMeta, ReviewRecord};
use std::collections::HashMap;

/// Accumulates reviews and metadata, then freezes them into an [`InMemoryCatalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    reviews: HashMap<ItemId, Vec<ReviewRecord>>,
    meta: HashMap<ItemId, ProductMeta>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a review; reviews of one item keep their insertion order.
    pub fn add_review(&mut self, id: impl Into<ItemId>, review: ReviewRecord) -> &mut Self {
        self.reviews.entry(id.into()).or_default().push(review);
        self
    }

    /// Set display metadata. A later record for the same id replaces the earlier one.
    pub fn add_meta(&mut self, id: impl Into<ItemId>, meta: ProductMeta) -> &mut Self {
        self.meta.insert(id.into(), meta);
        self
    }

    pub fn has_reviews(&self, id: &str) -> bool {
        self.reviews.contains_key(id)
    }

    /// Only items with at least one review become entries; metadata for other ids is dropped.
    /// Items without metadata use their id as title.
    pub fn build(self) -> InMemoryCatalog {
        let CatalogBuilder { reviews, mut meta } = self;
        let entries = reviews
            .into_iter()
            .filter_map(|(id, reviews)| {
                let average_rating = mean(reviews.iter().map(|r| r.rating))?;
                let meta = meta.remove(&id).unwrap_or_else(|| ProductMeta {
                    title: id.clone(),
                    image_url: None,
                });
                Some((
                    id.clone(),
                    CatalogEntry {
                        id,
                        meta,
                        reviews,
                        average_rating,
                    },
                ))
            })
            .collect();
        InMemoryCatalog { entries }
    }
}

/// Read-only catalog: id -> reviews, metadata and average rating.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    entries: HashMap<ItemId, CatalogEntry>,
}

impl InMemoryCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// All entries, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }
}

impl Catalog for InMemoryCatalog {
    fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rating_is_arithmetic_mean() {
        let mut b = InMemoryCatalog::builder();
        b.add_review("B0001", ReviewRecord::new(5.0, "Great"))
            .add_review("B0001", ReviewRecord::new(4.0, "Good"))
            .add_review("B0001", ReviewRecord::new(4.0, "Fine"))
            .add_review("B0002", ReviewRecord::new(2.0, "Bad"));
        let catalog = b.build();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.average_rating("B0001"), Some(13.0 / 3.0));
        assert_eq!(catalog.average_rating("B0002"), Some(2.0));
        assert_eq!(catalog.average_rating("missing"), None);
    }

    #[test]
    fn reviews_keep_ingestion_order() {
        let mut b = CatalogBuilder::new();
        for (i, text) in ["first", "second", "third"].iter().enumerate() {
            b.add_review("x", ReviewRecord::new(1.0 + i as f64, *text));
        }
        let catalog = b.build();
        let texts: Vec<&str> = catalog
            .get("x")
            .unwrap()
            .reviews
            .iter()
            .map(|r| r.text.as_str())
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn metadata_without_reviews_is_dropped_and_missing_metadata_falls_back() {
        let mut b = CatalogBuilder::new();
        b.add_meta(
            "only-meta",
            ProductMeta {
                title: "Orphan".to_string(),
                image_url: None,
            },
        );
        b.add_review("no-meta", ReviewRecord::new(3.0, "ok"));
        let catalog = b.build();
        assert!(catalog.get("only-meta").is_none());
        let entry = catalog.get("no-meta").unwrap();
        assert_eq!(entry.meta.title, "no-meta");
        assert_eq!(entry.meta.image_url, None);
    }
}
