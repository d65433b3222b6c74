use order_store::{Catalog, OrderQuery, OrderStore, TableNumber};

use crate::error::DomainError;

use super::service::rejected;
use super::{Order, OrderService, parse_status};

/// Optional filters for finding orders. All supplied filters must match.
///
/// Status is raw text; an unknown value is an error, not an empty result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSearch {
    pub table_number: Option<TableNumber>,
    pub status: Option<String>,
}

impl OrderSearch {
    /// Creates a search with no filters, matching every order.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table_number(mut self, table_number: impl Into<TableNumber>) -> Self {
        self.table_number = Some(table_number.into());
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

impl<S: OrderStore + Catalog> OrderService<S> {
    /// Finds orders matching the search, in ascending id order.
    #[tracing::instrument(skip(self))]
    pub async fn find_orders(&self, search: OrderSearch) -> Result<Vec<Order>, DomainError> {
        let mut query = OrderQuery::new();
        if let Some(table_number) = search.table_number {
            query = query.table_number(table_number);
        }
        if let Some(status) = search.status.as_deref() {
            query = query.status(parse_status(status).map_err(rejected)?);
        }

        let records = self.store().find_orders(query).await?;
        Ok(records.into_iter().map(Order::from).collect())
    }

    /// Lists every order, in ascending id order.
    pub async fn list_orders(&self) -> Result<Vec<Order>, DomainError> {
        self.find_orders(OrderSearch::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{CreateOrder, LineItemInput, OrderError, UpdateOrder};
    use order_store::{InMemoryOrderStore, OrderStatus};
    use rust_decimal_macros::dec;

    async fn service_with_orders() -> OrderService<InMemoryOrderStore> {
        let store = InMemoryOrderStore::with_items(["Soup"]).await;
        let service = OrderService::new(store);
        for table in [4, 7, 4] {
            service
                .create_order(CreateOrder::new(table, vec![LineItemInput::new(1, dec!(5))]))
                .await
                .unwrap();
        }
        let first = service.list_orders().await.unwrap()[0].id();
        service
            .update_order(UpdateOrder::new(first).status("paid"))
            .await
            .unwrap();
        service
    }

    #[tokio::test]
    async fn test_no_filters_returns_all_in_id_order() {
        let service = service_with_orders().await;

        let orders = service.find_orders(OrderSearch::new()).await.unwrap();
        let ids: Vec<i64> = orders.iter().map(|o| o.id().as_i64()).collect();

        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_filters_combine() {
        let service = service_with_orders().await;

        let table_four = service
            .find_orders(OrderSearch::new().table_number(4))
            .await
            .unwrap();
        assert_eq!(table_four.len(), 2);

        let pending_four = service
            .find_orders(OrderSearch::new().table_number(4).status("pending"))
            .await
            .unwrap();
        assert_eq!(pending_four.len(), 1);
        assert_eq!(pending_four[0].status(), OrderStatus::Pending);
        assert_eq!(pending_four[0].id().as_i64(), 3);
    }

    #[tokio::test]
    async fn test_invalid_status_is_an_error() {
        let service = service_with_orders().await;

        let result = service
            .find_orders(OrderSearch::new().status("PAID"))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::InvalidStatus { .. }))
        ));
    }
}
