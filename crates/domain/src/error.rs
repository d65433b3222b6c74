//! Domain error types.

use order_store::{OrderId, StoreError};
use thiserror::Error;

use crate::order::OrderError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the order store.
    #[error("Order store error: {0}")]
    Store(#[from] StoreError),

    /// The request was rejected by order validation.
    #[error("{0}")]
    Order(#[from] OrderError),

    /// Order not found.
    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: OrderId },
}

impl DomainError {
    /// Returns the stable error code for caller-facing failures.
    ///
    /// Storage failures have no code; callers report them generically.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            DomainError::Order(err) => Some(err.code()),
            DomainError::OrderNotFound { .. } => Some("order_not_found"),
            DomainError::Store(_) => None,
        }
    }

    /// Returns true if the caller caused the failure (bad input or unknown id).
    pub fn is_client_error(&self) -> bool {
        self.code().is_some()
    }
}
