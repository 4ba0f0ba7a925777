use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};

use crate::catalogue::CatalogueService;
use crate::storage::CatalogueStore;

mod handlers;
mod models;

use handlers::{
    available_filters, create_catalogue, delete_catalogue, export_catalogue, filter_catalogue,
    get_catalogue, health, list_catalogue, not_found, search_catalogue, update_catalogue,
};

#[derive(Clone)]
pub struct AppState<S> {
    pub catalogue: CatalogueService<S>,
    pub started_at: std::time::SystemTime,
}

pub fn router<S: CatalogueStore + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health::<S>))
        .route(
            "/catalogue",
            get(list_catalogue::<S>).post(create_catalogue::<S>),
        )
        .route("/catalogue/search", get(search_catalogue::<S>))
        .route("/catalogue/filter", get(filter_catalogue::<S>))
        .route("/catalogue/available-filters", get(available_filters::<S>))
        .route("/catalogue/bulk/export", post(export_catalogue::<S>))
        .route(
            "/catalogue/:id",
            get(get_catalogue::<S>)
                .put(update_catalogue::<S>)
                .delete(delete_catalogue::<S>),
        )
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve<S: CatalogueStore + Clone + Send + Sync + 'static>(
    addr: SocketAddr,
    store: S,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    let state = AppState {
        catalogue: CatalogueService::new(store),
        started_at: std::time::SystemTime::now(),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("🌐 REST listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
