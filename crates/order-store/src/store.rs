use async_trait::async_trait;

use crate::{
    Item, ItemId, Money, NewLineItem, NewOrder, OrderChanges, OrderId, OrderQuery, OrderRecord,
    OrderStatus, Result, StoreError,
};

/// Read-only registry of orderable items.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Retrieves the items whose keys appear in `ids`.
    ///
    /// Unknown keys are simply absent from the result; duplicates in `ids`
    /// yield a single entry.
    async fn get_items(&self, ids: &[ItemId]) -> Result<Vec<Item>>;

    /// Retrieves every catalog item in ascending key order.
    async fn list_items(&self) -> Result<Vec<Item>>;

    /// Retrieves a single item.
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>> {
        Ok(self.get_items(&[id]).await?.into_iter().next())
    }
}

/// Core trait for order store implementations.
///
/// Every write method is atomic: either all of its changes become visible
/// or none do. All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts an order and all of its line items.
    ///
    /// Fails with `InvalidWrite` if the order has no line items.
    async fn insert_order(&self, order: NewOrder) -> Result<OrderRecord>;

    /// Retrieves an order with its line items.
    async fn get_order(&self, id: OrderId) -> Result<Option<OrderRecord>>;

    /// Applies status and item changes to an order.
    ///
    /// A replacement item list deletes every existing line item before
    /// inserting the new ones. Returns None if the order doesn't exist.
    async fn update_order(&self, id: OrderId, changes: OrderChanges)
    -> Result<Option<OrderRecord>>;

    /// Deletes an order and its line items.
    ///
    /// Returns false if the order doesn't exist.
    async fn delete_order(&self, id: OrderId) -> Result<bool>;

    /// Retrieves the orders matching a query, in ascending key order.
    async fn find_orders(&self, query: OrderQuery) -> Result<Vec<OrderRecord>>;

    /// Sums every line-item price over orders in the given status.
    async fn sum_prices_by_status(&self, status: OrderStatus) -> Result<Money>;
}

/// Validates a line-item set before it is written.
///
/// Persisted orders always own at least one line item.
pub fn validate_line_items_for_write(items: &[NewLineItem]) -> std::result::Result<(), StoreError> {
    if items.is_empty() {
        return Err(StoreError::InvalidWrite(
            "an order must have at least one line item".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_item_set_is_rejected() {
        let result = validate_line_items_for_write(&[]);
        assert!(matches!(result, Err(StoreError::InvalidWrite(_))));
    }

    #[test]
    fn non_empty_item_set_is_accepted() {
        let items = vec![NewLineItem::new(ItemId::new(1), Money::from_units(10))];
        assert!(validate_line_items_for_write(&items).is_ok());
    }
}
