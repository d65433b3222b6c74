use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    Item, ItemId, LineItemId, LineItemRecord, Money, NewLineItem, NewOrder, OrderChanges, OrderId,
    OrderQuery, OrderRecord, OrderStatus, Result, StoreError, TableNumber,
    store::{Catalog, OrderStore, validate_line_items_for_write},
};

#[derive(Debug, Clone)]
struct OrderRow {
    table_number: TableNumber,
    status: OrderStatus,
}

#[derive(Debug, Clone)]
struct LineItemRow {
    order_id: OrderId,
    item_id: ItemId,
    price: Money,
}

#[derive(Debug, Default)]
struct Tables {
    items: BTreeMap<ItemId, Item>,
    orders: BTreeMap<OrderId, OrderRow>,
    line_items: BTreeMap<LineItemId, LineItemRow>,
    next_item_id: i64,
    next_order_id: i64,
    next_line_item_id: i64,
}

impl Tables {
    fn record(&self, id: OrderId, row: &OrderRow) -> OrderRecord {
        let items = self
            .line_items
            .iter()
            .filter(|(_, li)| li.order_id == id)
            .map(|(line_id, li)| LineItemRecord {
                id: *line_id,
                item_id: li.item_id,
                price: li.price,
            })
            .collect();

        OrderRecord {
            id,
            table_number: row.table_number,
            status: row.status,
            items,
        }
    }

    // Mirrors the foreign key from line items to the catalog.
    fn check_item_references(&self, items: &[NewLineItem]) -> Result<()> {
        if let Some(missing) = items.iter().find(|li| !self.items.contains_key(&li.item_id)) {
            return Err(StoreError::InvalidWrite(format!(
                "line item references unknown item {}",
                missing.item_id
            )));
        }
        Ok(())
    }

    fn insert_line_items(&mut self, order_id: OrderId, items: Vec<NewLineItem>) {
        for li in items {
            self.next_line_item_id += 1;
            self.line_items.insert(
                LineItemId::new(self.next_line_item_id),
                LineItemRow {
                    order_id,
                    item_id: li.item_id,
                    price: li.price,
                },
            );
        }
    }

    fn delete_line_items(&mut self, order_id: OrderId) {
        self.line_items.retain(|_, li| li.order_id != order_id);
    }
}

/// In-memory order store implementation for testing.
///
/// All tables sit behind a single lock, so every write method holds the
/// write guard for its whole duration and is trivially atomic. Provides the
/// same interface as the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose catalog holds the given item names,
    /// keyed 1, 2, 3, ... in order.
    pub async fn with_items<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        for name in names {
            store.insert_item(name).await;
        }
        store
    }

    /// Adds an item to the catalog.
    pub async fn insert_item(&self, name: impl Into<String>) -> Item {
        let mut tables = self.tables.write().await;
        tables.next_item_id += 1;
        let item = Item {
            id: ItemId::new(tables.next_item_id),
            name: name.into(),
        };
        tables.items.insert(item.id, item.clone());
        item
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.tables.read().await.orders.len()
    }

    /// Returns the total number of line items stored, across all orders.
    pub async fn line_item_count(&self) -> usize {
        self.tables.read().await.line_items.len()
    }
}

#[async_trait]
impl Catalog for InMemoryOrderStore {
    async fn get_items(&self, ids: &[ItemId]) -> Result<Vec<Item>> {
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .values()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect())
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        let tables = self.tables.read().await;
        Ok(tables.items.values().cloned().collect())
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert_order(&self, order: NewOrder) -> Result<OrderRecord> {
        validate_line_items_for_write(&order.items)?;

        let mut tables = self.tables.write().await;
        tables.check_item_references(&order.items)?;

        tables.next_order_id += 1;
        let id = OrderId::new(tables.next_order_id);
        let row = OrderRow {
            table_number: order.table_number,
            status: order.status,
        };
        tables.orders.insert(id, row.clone());
        tables.insert_line_items(id, order.items);

        Ok(tables.record(id, &row))
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<OrderRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.orders.get(&id).map(|row| tables.record(id, row)))
    }

    async fn update_order(
        &self,
        id: OrderId,
        changes: OrderChanges,
    ) -> Result<Option<OrderRecord>> {
        if let Some(ref items) = changes.items {
            validate_line_items_for_write(items)?;
        }

        let mut tables = self.tables.write().await;
        let Some(mut row) = tables.orders.get(&id).cloned() else {
            return Ok(None);
        };

        // Check everything before the first mutation so a failure leaves
        // the tables untouched.
        if let Some(ref items) = changes.items {
            tables.check_item_references(items)?;
        }

        if let Some(status) = changes.status {
            row.status = status;
            tables.orders.insert(id, row.clone());
        }
        if let Some(items) = changes.items {
            tables.delete_line_items(id);
            tables.insert_line_items(id, items);
        }

        Ok(Some(tables.record(id, &row)))
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.orders.remove(&id).is_none() {
            return Ok(false);
        }
        tables.delete_line_items(id);
        Ok(true)
    }

    async fn find_orders(&self, query: OrderQuery) -> Result<Vec<OrderRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .iter()
            .filter(|(_, row)| query.matches(row.table_number, row.status))
            .map(|(id, row)| tables.record(*id, row))
            .collect())
    }

    async fn sum_prices_by_status(&self, status: OrderStatus) -> Result<Money> {
        let tables = self.tables.read().await;
        Ok(tables
            .line_items
            .values()
            .filter(|li| {
                tables
                    .orders
                    .get(&li.order_id)
                    .is_some_and(|order| order.status == status)
            })
            .map(|li| li.price)
            .sum())
    }
}
