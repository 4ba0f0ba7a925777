use serde::{Deserialize, Serialize};

use crate::catalogue::item::CatalogueItem;
use crate::catalogue::service::{DeleteOutcome, FacetSets, ItemPage, UpdateOutcome};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub catalogue_items: Vec<CatalogueItem>,
    pub max_page: u64,
}

impl From<ItemPage> for PageResponse {
    fn from(page: ItemPage) -> Self {
        Self {
            catalogue_items: page.items,
            max_page: page.max_page,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct AvailableFiltersResponse {
    pub categories: Vec<String>,
    pub types: Vec<String>,
    pub manufacturers: Vec<String>,
}

impl From<FacetSets> for AvailableFiltersResponse {
    fn from(sets: FacetSets) -> Self {
        Self {
            categories: sets.categories,
            types: sets.types,
            manufacturers: sets.manufacturers,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl From<UpdateOutcome> for UpdateResponse {
    fn from(outcome: UpdateOutcome) -> Self {
        Self {
            matched_count: outcome.matched,
            modified_count: outcome.modified,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub deleted_count: u64,
}

impl From<DeleteOutcome> for DeleteResponse {
    fn from(outcome: DeleteOutcome) -> Self {
        Self {
            deleted_count: outcome.deleted,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ExportRequest {
    pub skus: Vec<i64>,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
