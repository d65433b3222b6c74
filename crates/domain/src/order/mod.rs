//! Orders, their validation rules and the services operating on them.

mod commands;
mod model;
mod revenue;
mod search;
mod service;

pub use commands::{CreateOrder, LineItemInput, PricePolicy, UpdateOrder, parse_status};
pub use model::{LineItem, Order};
pub use search::OrderSearch;
pub use service::{OrderService, UpdateOutcome};

use order_store::{ItemId, Money};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur when validating order input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Table number is zero or negative.
    #[error("Invalid table number: {table_number} (must be greater than 0)")]
    InvalidTableNumber { table_number: i32 },

    /// Order has no items.
    #[error("Order must contain at least one item")]
    NoItems,

    /// Referenced catalog item does not exist.
    #[error("Item not found: {item_id}")]
    ItemNotFound { item_id: ItemId },

    /// Price is outside the accepted range or too precise.
    #[error(
        "Invalid price: {price} (must be greater than 0 and less than {max}, with at most 2 decimal places)"
    )]
    InvalidPrice { price: Decimal, max: Money },

    /// Status is not one of pending, ready or paid.
    #[error("Invalid status: {status} (expected pending, ready or paid)")]
    InvalidStatus { status: String },
}

impl OrderError {
    /// Returns the stable error code reported to callers.
    pub fn code(&self) -> &'static str {
        match self {
            OrderError::InvalidTableNumber { .. } | OrderError::NoItems => "validation_error",
            OrderError::ItemNotFound { .. } => "item_not_found",
            OrderError::InvalidPrice { .. } => "invalid_price",
            OrderError::InvalidStatus { .. } => "invalid_status",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(OrderError::NoItems.code(), "validation_error");
        assert_eq!(
            OrderError::InvalidTableNumber { table_number: 0 }.code(),
            "validation_error"
        );
        assert_eq!(
            OrderError::ItemNotFound {
                item_id: ItemId::new(3)
            }
            .code(),
            "item_not_found"
        );
        assert_eq!(
            OrderError::InvalidStatus {
                status: "lost".to_string()
            }
            .code(),
            "invalid_status"
        );
    }

    #[test]
    fn test_invalid_price_message_names_bound() {
        let err = OrderError::InvalidPrice {
            price: dec!(-1),
            max: Money::from_units(100),
        };
        assert!(err.to_string().contains("less than 100.00"));
    }
}
