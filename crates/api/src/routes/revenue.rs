//! Revenue report endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use order_store::{Catalog, OrderStore};
use serde::Serialize;

use super::orders::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct RevenueResponse {
    pub total_revenue: String,
}

/// GET /revenue: total of all paid line items.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + Catalog + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<RevenueResponse>, ApiError> {
    let total = state.order_service.total_revenue().await?;
    Ok(Json(RevenueResponse {
        total_revenue: total.to_string(),
    }))
}
