use super::SharedState;
use crate::models::CatalogCategory;
use crate::store::MatchRepository;
use axum::extract::State;
use axum::Json;

/// Public catalog listing, grouped by category. No auth required.
pub async fn list(State(state): State<SharedState>) -> Json<Vec<CatalogCategory>> {
    let state = state.read().await;
    Json(state.store.catalog())
}
