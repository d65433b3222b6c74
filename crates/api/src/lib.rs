//! HTTP API server with observability for the restaurant order backend.
//!
//! Provides REST endpoints for orders, the item catalog and the revenue
//! report, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use domain::{OrderService, PricePolicy};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::{Catalog, OrderStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + Catalog + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/items", get(routes::items::list::<S>))
        .route(
            "/orders",
            get(routes::orders::list::<S>).post(routes::orders::create::<S>),
        )
        .route("/orders/search", get(routes::orders::search::<S>))
        .route(
            "/orders/{id}",
            get(routes::orders::get::<S>)
                .patch(routes::orders::update::<S>)
                .delete(routes::orders::delete::<S>),
        )
        .route("/revenue", get(routes::revenue::get::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over `store` with the given price bound.
pub fn create_state<S: OrderStore + Catalog + Clone + 'static>(
    store: S,
    price_policy: PricePolicy,
) -> Arc<AppState<S>> {
    Arc::new(AppState {
        order_service: OrderService::with_price_policy(store, price_policy),
    })
}

/// Creates application state with the default price policy.
pub fn create_default_state<S: OrderStore + Catalog + Clone + 'static>(
    store: S,
) -> Arc<AppState<S>> {
    create_state(store, PricePolicy::default())
}
