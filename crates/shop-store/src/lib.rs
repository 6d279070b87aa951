//! Review store: catalog of reviews and metadata keyed by item id.

mod jsonl;
mod memory;

pub use jsonl::{LoadError, LoadReport};
pub use memory::{CatalogBuilder, InMemoryCatalog};
pub use shop_types::{Catalog, CatalogEntry, ItemId, ProductMeta, ReviewRecord};
