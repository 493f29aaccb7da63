use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::catalog::CatalogClient;
use crate::summary::Summarizer;

mod routes;

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogClient,
    pub summarizer: Arc<Summarizer>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/api/books/:id", get(routes::get_book))
        .route("/api/text-analysis", get(routes::text_analysis))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
