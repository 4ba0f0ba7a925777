use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::catalogue::query::{Page, Predicate};
use crate::catalogue::{CatalogueError, CatalogueItem};
use crate::storage::CatalogueStore;

use super::{
    models::{
        AvailableFiltersResponse, DeleteResponse, ErrorResponse, ExportRequest, HealthResponse,
        PageResponse, UpdateResponse,
    },
    AppState,
};

impl IntoResponse for CatalogueError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogueError::Validation(_) | CatalogueError::Conflict => StatusCode::BAD_REQUEST,
            CatalogueError::NotFound => StatusCode::NOT_FOUND,
            CatalogueError::Storage(err) => {
                log::error!("storage error: {:?}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let error = match &self {
            CatalogueError::Storage(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

pub async fn health<S: CatalogueStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            uptime_secs,
        }),
    )
}

pub async fn list_catalogue<S: CatalogueStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<PageResponse>, CatalogueError> {
    let page = Page::from_query(&params);
    let result = state.catalogue.list(page)?;
    Ok(Json(result.into()))
}

pub async fn search_catalogue<S: CatalogueStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<PageResponse>, CatalogueError> {
    let predicate = Predicate::from_search_query(&params);
    let page = Page::from_query(&params);
    let result = state.catalogue.fetch_page(&predicate, page)?;
    Ok(Json(result.into()))
}

pub async fn filter_catalogue<S: CatalogueStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<PageResponse>, CatalogueError> {
    let predicate = Predicate::from_filter_query(&params);
    let page = Page::from_query(&params);
    let result = state.catalogue.fetch_page(&predicate, page)?;
    Ok(Json(result.into()))
}

pub async fn available_filters<S: CatalogueStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<AvailableFiltersResponse>, CatalogueError> {
    let sets = state.catalogue.available_filters()?;
    Ok(Json(sets.into()))
}

/// Fetch by sku. An unparsable path segment matches nothing and yields a
/// `null` body, same as an unknown sku.
pub async fn get_catalogue<S: CatalogueStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Option<CatalogueItem>>, CatalogueError> {
    let Ok(sku) = id.parse::<i64>() else {
        return Ok(Json(None));
    };
    Ok(Json(state.catalogue.get(sku)?))
}

pub async fn create_catalogue<S: CatalogueStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<CatalogueItem>, CatalogueError> {
    let created = state.catalogue.create(body)?;
    Ok(Json(created))
}

/// Update by storage row id (the opaque identity handed out at insert).
pub async fn update_catalogue<S: CatalogueStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<UpdateResponse>, CatalogueError> {
    let id = id
        .parse::<i64>()
        .map_err(|_| CatalogueError::Validation("invalid item id".to_string()))?;
    let outcome = state.catalogue.update(id, body)?;
    Ok(Json(outcome.into()))
}

pub async fn delete_catalogue<S: CatalogueStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, CatalogueError> {
    let Ok(sku) = id.parse::<i64>() else {
        return Ok(Json(DeleteResponse { deleted_count: 0 }));
    };
    let outcome = state.catalogue.delete(sku)?;
    Ok(Json(outcome.into()))
}

/// Bulk export: the full result is buffered and sent as a JSON attachment.
pub async fn export_catalogue<S: CatalogueStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, CatalogueError> {
    let items = state.catalogue.export(&request.skus)?;
    let body = serde_json::to_vec(&items).map_err(anyhow::Error::from)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=catalogues.json",
            ),
        ],
        body,
    )
        .into_response())
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "endpoint not found".to_string(),
        }),
    )
}
