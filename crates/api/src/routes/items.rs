//! Catalog listing endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use order_store::{Catalog, Item, OrderStore};

use super::orders::AppState;
use crate::error::ApiError;

/// GET /items: list every catalog item in id order.
#[tracing::instrument(skip(state))]
pub async fn list<S: OrderStore + Catalog + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state
        .order_service
        .store()
        .list_items()
        .await
        .map_err(domain::DomainError::from)?;
    Ok(Json(items))
}
