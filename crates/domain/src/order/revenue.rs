use order_store::{Catalog, Money, OrderStatus, OrderStore};

use crate::error::DomainError;

use super::OrderService;

impl<S: OrderStore + Catalog> OrderService<S> {
    /// Returns the sum of every line-item price on paid orders.
    ///
    /// Zero when nothing has been paid.
    #[tracing::instrument(skip(self))]
    pub async fn total_revenue(&self) -> Result<Money, DomainError> {
        Ok(self.store().sum_prices_by_status(OrderStatus::Paid).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{CreateOrder, LineItemInput, UpdateOrder};
    use order_store::InMemoryOrderStore;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_revenue_counts_only_paid_orders() {
        let store = InMemoryOrderStore::with_items(["Soup", "Salad"]).await;
        let service = OrderService::new(store);
        assert_eq!(service.total_revenue().await.unwrap(), Money::ZERO);

        let paid = service
            .create_order(CreateOrder::new(
                1,
                vec![LineItemInput::new(1, dec!(1)), LineItemInput::new(2, dec!(500))],
            ))
            .await
            .unwrap();
        service
            .create_order(CreateOrder::new(2, vec![LineItemInput::new(1, dec!(80))]))
            .await
            .unwrap();
        assert_eq!(service.total_revenue().await.unwrap(), Money::ZERO);

        service
            .update_order(UpdateOrder::new(paid.id()).status("paid"))
            .await
            .unwrap();

        assert_eq!(service.total_revenue().await.unwrap(), Money::new(dec!(501)));
    }
}
