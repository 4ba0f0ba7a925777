use anyhow::Result;

use crate::catalogue::item::{CatalogueItem, ItemPatch};
use crate::catalogue::query::{Facet, Predicate};

/// The only seam that touches persistent storage.
///
/// Read operations never expose the storage row id; the write side hands it
/// out once from `insert` and accepts it back for `update_fields`. The same
/// predicate is passed to both `find_page` and `count` so pagination totals
/// always match the listing.
pub trait CatalogueStore {
    /// Matching items in insertion order, `offset`/`limit` applied.
    fn find_page(&self, predicate: &Predicate, offset: u64, limit: u64)
        -> Result<Vec<CatalogueItem>>;

    fn count(&self, predicate: &Predicate) -> Result<u64>;

    fn find_by_sku(&self, sku: i64) -> Result<Option<CatalogueItem>>;

    fn find_by_id(&self, id: i64) -> Result<Option<CatalogueItem>>;

    /// Bulk fetch for export, insertion order.
    fn find_by_skus(&self, skus: &[i64]) -> Result<Vec<CatalogueItem>>;

    /// Returns the assigned row id.
    fn insert(&self, item: &CatalogueItem) -> Result<i64>;

    /// Applies the present fields of `patch` to one row; returns the number
    /// of rows matched. The patch must carry at least one field.
    fn update_fields(&self, id: i64, patch: &ItemPatch) -> Result<u64>;

    /// Returns the number of rows removed (zero when no item has the sku).
    fn delete_by_sku(&self, sku: i64) -> Result<u64>;

    /// Distinct non-empty values for a facet across the whole collection.
    fn distinct_facet(&self, facet: Facet) -> Result<Vec<String>>;
}
