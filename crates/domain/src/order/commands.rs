//! Typed order inputs and the pure validation rules applied to them.

use std::collections::HashSet;

use order_store::{ItemId, Money, NewLineItem, OrderId, OrderStatus, TableNumber};
use rust_decimal::Decimal;

use super::OrderError;

/// Accepted price range for a single line item.
///
/// Prices must be strictly positive and strictly below `max_price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePolicy {
    max_price: Money,
}

impl PricePolicy {
    /// Default exclusive upper bound, the smallest value a `NUMERIC(10, 2)`
    /// column cannot hold.
    pub const DEFAULT_MAX_PRICE: i64 = 100_000_000;

    /// Creates a policy with the given exclusive bound.
    ///
    /// Bounds above [`Self::DEFAULT_MAX_PRICE`] are clamped to it; the
    /// `price` column could not store such prices anyway.
    pub fn new(max_price: Money) -> Self {
        Self {
            max_price: max_price.min(Money::from_units(Self::DEFAULT_MAX_PRICE)),
        }
    }

    /// Returns the exclusive upper bound.
    pub fn max_price(&self) -> Money {
        self.max_price
    }

    /// Validates a raw price and converts it into money.
    pub fn check(&self, price: Decimal) -> Result<Money, OrderError> {
        let money = Money::new(price);
        if !money.is_positive() || money >= self.max_price || money.exceeds_scale() {
            return Err(OrderError::InvalidPrice {
                price,
                max: self.max_price,
            });
        }
        Ok(money)
    }
}

impl Default for PricePolicy {
    fn default() -> Self {
        Self::new(Money::from_units(Self::DEFAULT_MAX_PRICE))
    }
}

/// A requested (item, price) pair, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemInput {
    pub item_id: ItemId,
    pub price: Decimal,
}

impl LineItemInput {
    pub fn new(item_id: i64, price: Decimal) -> Self {
        Self {
            item_id: ItemId::new(item_id),
            price,
        }
    }
}

/// Request to open a new order for a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrder {
    pub table_number: TableNumber,
    pub items: Vec<LineItemInput>,
}

impl CreateOrder {
    pub fn new(table_number: impl Into<TableNumber>, items: Vec<LineItemInput>) -> Self {
        Self {
            table_number: table_number.into(),
            items,
        }
    }

    /// Checks the parts of the request that need no catalog lookup.
    pub fn validate_shape(&self) -> Result<(), OrderError> {
        if !self.table_number.is_valid() {
            return Err(OrderError::InvalidTableNumber {
                table_number: self.table_number.as_i32(),
            });
        }
        if self.items.is_empty() {
            return Err(OrderError::NoItems);
        }
        Ok(())
    }
}

/// Partial update of an existing order.
///
/// Status is kept as raw text so an unknown value surfaces as
/// `InvalidStatus`. A present `items` list replaces every line item; an
/// empty list deletes the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOrder {
    pub order_id: OrderId,
    pub status: Option<String>,
    pub items: Option<Vec<LineItemInput>>,
}

impl UpdateOrder {
    /// Creates an update that changes nothing yet.
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            status: None,
            items: None,
        }
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn items(mut self, items: Vec<LineItemInput>) -> Self {
        self.items = Some(items);
        self
    }
}

/// Parses status text, mapping unknown values to `InvalidStatus`.
pub fn parse_status(status: &str) -> Result<OrderStatus, OrderError> {
    status.parse().map_err(|_| OrderError::InvalidStatus {
        status: status.to_string(),
    })
}

/// Validates requested line items against the known catalog keys.
///
/// Pairs are checked in input order and the first failure wins, so a
/// request naming an unknown item and a bad price reports whichever
/// comes first.
pub(crate) fn validate_line_items(
    inputs: &[LineItemInput],
    known_items: &HashSet<ItemId>,
    policy: &PricePolicy,
) -> Result<Vec<NewLineItem>, OrderError> {
    inputs
        .iter()
        .map(|input| {
            if !known_items.contains(&input.item_id) {
                return Err(OrderError::ItemNotFound {
                    item_id: input.item_id,
                });
            }
            let price = policy.check(input.price)?;
            Ok(NewLineItem::new(input.item_id, price))
        })
        .collect()
}
