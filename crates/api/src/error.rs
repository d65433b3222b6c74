//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, OrderError};
use serde_json::json;

const VALIDATION_ERROR: &str = "validation_error";

/// API-level error type that maps to HTTP responses.
///
/// Client errors render as `{"error": {"code": ..., "message": ...}}`;
/// storage failures render as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request caught before reaching the domain: unparsable
    /// body, path id or query parameter.
    Validation(String),
    /// Domain logic error.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": { "code": VALIDATION_ERROR, "message": msg } }),
            ),
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, serde_json::Value) {
    if !err.is_client_error() {
        tracing::error!(error = %err, "internal server error");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": err.to_string() }),
        );
    }

    let status = match &err {
        DomainError::Order(OrderError::ItemNotFound { .. })
        | DomainError::OrderNotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    let code = err.code().unwrap_or(VALIDATION_ERROR);

    (
        status,
        json!({ "error": { "code": code, "message": err.to_string() } }),
    )
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{ItemId, OrderId};
    use order_store::StoreError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::Order(OrderError::NoItems), StatusCode::BAD_REQUEST),
            (
                DomainError::Order(OrderError::InvalidStatus {
                    status: "x".to_string(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::Order(OrderError::ItemNotFound {
                    item_id: ItemId::new(4),
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::OrderNotFound {
                    order_id: OrderId::new(1),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::Store(StoreError::InvalidWrite("boom".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(domain_error_to_response(err).0, expected);
        }
    }

    #[test]
    fn test_coded_body_shape() {
        let (_, body) = domain_error_to_response(DomainError::OrderNotFound {
            order_id: OrderId::new(9),
        });
        assert_eq!(body["error"]["code"], "order_not_found");
        assert_eq!(body["error"]["message"], "Order not found: 9");
    }

    #[test]
    fn test_store_error_body_is_plain_message() {
        let (_, body) =
            domain_error_to_response(DomainError::Store(StoreError::InvalidWrite("x".into())));
        assert!(body["error"].is_string());
    }

    #[test]
    fn test_validation_error_is_coded_bad_request() {
        let response = ApiError::Validation("Invalid ID format".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
