//! Order CRUD and search endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use common::{ItemId, LineItemId, OrderId, OrderStatus, TableNumber};
use domain::{
    CreateOrder, LineItemInput, Order, OrderSearch, OrderService, UpdateOrder, UpdateOutcome,
};
use order_store::{Catalog, OrderStore};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::ApiJson;

/// Shared application state accessible from all handlers.
pub struct AppState<S> {
    pub order_service: OrderService<S>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub table_number: i32,
    pub items: Vec<LineItemRequest>,
}

/// Partial update. `items: []` deletes the order; a missing `items` keeps
/// the current ones.
#[derive(Deserialize)]
pub struct UpdateOrderRequest {
    pub status: Option<String>,
    pub items: Option<Vec<LineItemRequest>>,
}

#[derive(Deserialize)]
pub struct LineItemRequest {
    pub item_id: i64,
    pub price: Decimal,
}

impl From<LineItemRequest> for LineItemInput {
    fn from(req: LineItemRequest) -> Self {
        LineItemInput::new(req.item_id, req.price)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub status: Option<String>,
    #[serde(alias = "table_id")]
    pub table_number: Option<String>,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub table_number: TableNumber,
    pub status: OrderStatus,
    pub total_price: String,
    pub items: Vec<LineItemResponse>,
}

#[derive(Serialize)]
pub struct LineItemResponse {
    pub id: LineItemId,
    pub item_id: ItemId,
    pub price: String,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            table_number: order.table_number(),
            status: order.status(),
            total_price: order.total_price().to_string(),
            items: order
                .items()
                .iter()
                .map(|item| LineItemResponse {
                    id: item.id,
                    item_id: item.item_id,
                    price: item.price.to_string(),
                })
                .collect(),
        }
    }
}

// -- Handlers --

/// POST /orders: create a new order with its items.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: OrderStore + Catalog + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(req): ApiJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let items = req.items.into_iter().map(LineItemInput::from).collect();
    let order = state
        .order_service
        .create_order(CreateOrder::new(req.table_number, items))
        .await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

/// GET /orders: list every order in id order.
#[tracing::instrument(skip(state))]
pub async fn list<S: OrderStore + Catalog + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.order_service.list_orders().await?;
    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// GET /orders/search: filter orders by status and table number.
///
/// Empty parameters are treated as absent.
#[tracing::instrument(skip(state))]
pub async fn search<S: OrderStore + Catalog + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let mut search = OrderSearch::new();
    if let Some(table_number) = params.table_number.filter(|t| !t.is_empty()) {
        let table_number: i32 = table_number
            .parse()
            .map_err(|e| ApiError::Validation(format!("Invalid table_number: {e}")))?;
        search = search.table_number(table_number);
    }
    if let Some(status) = params.status.filter(|s| !s.is_empty()) {
        search = search.status(status);
    }

    let orders = state.order_service.find_orders(search).await?;
    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// GET /orders/{id}: load one order.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + Catalog + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.order_service.get_order(order_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// PATCH /orders/{id}: change status and/or replace items.
///
/// Responds 204 when an empty item list removed the order.
#[tracing::instrument(skip(state, req))]
pub async fn update<S: OrderStore + Catalog + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateOrderRequest>,
) -> Result<Response, ApiError> {
    let order_id = parse_order_id(&id)?;

    let mut cmd = UpdateOrder::new(order_id);
    if let Some(status) = req.status {
        cmd = cmd.status(status);
    }
    if let Some(items) = req.items {
        cmd = cmd.items(items.into_iter().map(LineItemInput::from).collect());
    }

    let response = match state.order_service.update_order(cmd).await? {
        UpdateOutcome::Updated(order) => Json(OrderResponse::from(&order)).into_response(),
        UpdateOutcome::Deleted(_) => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}

/// DELETE /orders/{id}: delete an order and its items.
#[tracing::instrument(skip(state))]
pub async fn delete<S: OrderStore + Catalog + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let order_id = parse_order_id(&id)?;
    state.order_service.delete_order(order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let id: i64 = id
        .parse()
        .map_err(|e| ApiError::Validation(format!("Invalid ID format: {e}")))?;
    Ok(OrderId::new(id))
}
