use order_store::{
    ItemId, LineItemId, LineItemRecord, Money, OrderId, OrderRecord, OrderStatus, TableNumber,
};

/// An (item, price) pairing owned by one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub id: LineItemId,
    pub item_id: ItemId,
    pub price: Money,
}

impl From<LineItemRecord> for LineItem {
    fn from(record: LineItemRecord) -> Self {
        Self {
            id: record.id,
            item_id: record.item_id,
            price: record.price,
        }
    }
}

/// A table's order together with its line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    table_number: TableNumber,
    status: OrderStatus,
    items: Vec<LineItem>,
}

impl From<OrderRecord> for Order {
    fn from(record: OrderRecord) -> Self {
        Self {
            id: record.id,
            table_number: record.table_number,
            status: record.status,
            items: record.items.into_iter().map(LineItem::from).collect(),
        }
    }
}

impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn table_number(&self) -> TableNumber {
        self.table_number
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the sum of every line-item price.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(|item| item.price).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record() -> OrderRecord {
        OrderRecord {
            id: OrderId::new(1),
            table_number: TableNumber::new(4),
            status: OrderStatus::Ready,
            items: vec![
                LineItemRecord {
                    id: LineItemId::new(1),
                    item_id: ItemId::new(1),
                    price: Money::new(dec!(12.50)),
                },
                LineItemRecord {
                    id: LineItemId::new(2),
                    item_id: ItemId::new(3),
                    price: Money::new(dec!(7.25)),
                },
            ],
        }
    }

    #[test]
    fn test_total_price_sums_line_items() {
        let order = Order::from(record());
        assert_eq!(order.total_price(), Money::new(dec!(19.75)));
        assert_eq!(order.item_count(), 2);
    }

    #[test]
    fn test_conversion_keeps_fields() {
        let order = Order::from(record());
        assert_eq!(order.id(), OrderId::new(1));
        assert_eq!(order.table_number(), TableNumber::new(4));
        assert_eq!(order.status(), OrderStatus::Ready);
        assert_eq!(order.items()[1].item_id, ItemId::new(3));
    }
}
