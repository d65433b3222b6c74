use serde::{Deserialize, Serialize};

use crate::{ItemId, LineItemId, Money, OrderId, OrderStatus, TableNumber};

/// An orderable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
}

/// A persisted line item, owned by exactly one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRecord {
    pub id: LineItemId,
    pub item_id: ItemId,
    pub price: Money,
}

/// A persisted order together with its line items.
///
/// Line items are kept in ascending key order, which is insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub table_number: TableNumber,
    pub status: OrderStatus,
    pub items: Vec<LineItemRecord>,
}

/// A line item to be written. The store assigns the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    pub item_id: ItemId,
    pub price: Money,
}

impl NewLineItem {
    pub fn new(item_id: impl Into<ItemId>, price: Money) -> Self {
        Self {
            item_id: item_id.into(),
            price,
        }
    }
}

/// An order to be inserted along with its first set of line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub table_number: TableNumber,
    pub status: OrderStatus,
    pub items: Vec<NewLineItem>,
}

impl NewOrder {
    /// Creates a pending order for a table.
    pub fn pending(table_number: TableNumber, items: Vec<NewLineItem>) -> Self {
        Self {
            table_number,
            status: OrderStatus::Pending,
            items,
        }
    }
}

/// Changes applied to an existing order in one atomic write.
///
/// `items`, when present, replaces every existing line item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderChanges {
    pub status: Option<OrderStatus>,
    pub items: Option<Vec<NewLineItem>>,
}

impl OrderChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn items(mut self, items: Vec<NewLineItem>) -> Self {
        self.items = Some(items);
        self
    }

    /// Returns true if applying the changes would not modify anything.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.items.is_none()
    }
}
