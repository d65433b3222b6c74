use crate::{OrderStatus, TableNumber};

/// Builder for constructing order queries.
///
/// Filters combine conjunctively. An empty query matches every order.
/// Results are always returned in ascending order key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    /// Filter by exact table number.
    pub table_number: Option<TableNumber>,

    /// Filter by exact status.
    pub status: Option<OrderStatus>,
}

impl OrderQuery {
    /// Creates a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for orders in a specific status.
    pub fn for_status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Filters by table number.
    pub fn table_number(mut self, table_number: TableNumber) -> Self {
        self.table_number = Some(table_number);
        self
    }

    /// Filters by status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true if the order fields satisfy every filter.
    pub fn matches(&self, table_number: TableNumber, status: OrderStatus) -> bool {
        if let Some(t) = self.table_number
            && t != table_number
        {
            return false;
        }
        if let Some(s) = self.status
            && s != status
        {
            return false;
        }
        true
    }
}
