use serde_json::Value;

use super::error::CatalogueError;
use super::item::{CatalogueItem, ItemPatch};
use super::query::{Facet, Page, Predicate};
use crate::storage::CatalogueStore;

/// One page of results together with the highest page number the same
/// predicate would yield.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemPage {
    pub items: Vec<CatalogueItem>,
    pub max_page: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted: u64,
}

/// Distinct value sets for the UI's filter menus, recomputed per call.
#[derive(Clone, Debug, PartialEq)]
pub struct FacetSets {
    pub categories: Vec<String>,
    pub types: Vec<String>,
    pub manufacturers: Vec<String>,
}

/// Mediates every operation against the store. Mutations run through the
/// SKU-uniqueness protocol here; the UNIQUE index underneath closes the
/// remaining check-then-insert race.
#[derive(Clone)]
pub struct CatalogueService<S> {
    store: S,
}

impl<S: CatalogueStore> CatalogueService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self, page: Page) -> Result<ItemPage, CatalogueError> {
        self.fetch_page(&Predicate::match_all(), page)
    }

    /// Shared by the search and filter views: the caller builds the
    /// predicate, the same predicate feeds both the page and the count.
    pub fn fetch_page(
        &self,
        predicate: &Predicate,
        page: Page,
    ) -> Result<ItemPage, CatalogueError> {
        let items = self.store.find_page(predicate, page.offset(), page.limit)?;
        let total = self.store.count(predicate)?;
        Ok(ItemPage {
            items,
            max_page: page.max_page(total),
        })
    }

    pub fn get(&self, sku: i64) -> Result<Option<CatalogueItem>, CatalogueError> {
        Ok(self.store.find_by_sku(sku)?)
    }

    /// Create protocol: validate, reject duplicate sku, insert, re-fetch.
    pub fn create(&self, body: Value) -> Result<CatalogueItem, CatalogueError> {
        let item: CatalogueItem =
            serde_json::from_value(body).map_err(|err| CatalogueError::Validation(err.to_string()))?;
        item.validate().map_err(CatalogueError::Validation)?;

        if self.sku_exists(item.sku)? {
            return Err(CatalogueError::Conflict);
        }

        let id = self.store.insert(&item)?;
        self.store
            .find_by_id(id)?
            .ok_or_else(|| anyhow::anyhow!("created item {id} not found on re-fetch").into())
    }

    /// Update protocol: validate the patch, resolve the target by row id,
    /// re-check sku uniqueness only when the sku actually changes, then
    /// apply the present fields as one merge.
    pub fn update(&self, id: i64, body: Value) -> Result<UpdateOutcome, CatalogueError> {
        let patch: ItemPatch =
            serde_json::from_value(body).map_err(|err| CatalogueError::Validation(err.to_string()))?;
        patch.validate().map_err(CatalogueError::Validation)?;

        let existing = self.store.find_by_id(id)?.ok_or(CatalogueError::NotFound)?;

        if let Some(sku) = patch.sku {
            if sku != existing.sku && self.sku_exists(sku)? {
                return Err(CatalogueError::Conflict);
            }
        }

        if patch.is_empty() {
            return Ok(UpdateOutcome {
                matched: 1,
                modified: 0,
            });
        }

        let matched = self.store.update_fields(id, &patch)?;
        Ok(UpdateOutcome {
            matched,
            modified: matched,
        })
    }

    pub fn delete(&self, sku: i64) -> Result<DeleteOutcome, CatalogueError> {
        let deleted = self.store.delete_by_sku(sku)?;
        Ok(DeleteOutcome { deleted })
    }

    pub fn available_filters(&self) -> Result<FacetSets, CatalogueError> {
        Ok(FacetSets {
            categories: self.store.distinct_facet(Facet::Category)?,
            types: self.store.distinct_facet(Facet::Type)?,
            manufacturers: self.store.distinct_facet(Facet::Manufacturer)?,
        })
    }

    pub fn export(&self, skus: &[i64]) -> Result<Vec<CatalogueItem>, CatalogueError> {
        Ok(self.store.find_by_skus(skus)?)
    }

    fn sku_exists(&self, sku: i64) -> Result<bool, CatalogueError> {
        Ok(self.store.find_by_sku(sku)?.is_some())
    }
}
