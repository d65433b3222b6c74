//! Order lifecycle service: validated create, update and delete.

use std::collections::HashSet;

use order_store::{Catalog, ItemId, NewLineItem, NewOrder, OrderChanges, OrderId, OrderStore};

use crate::error::DomainError;

use super::commands::validate_line_items;
use super::{CreateOrder, LineItemInput, Order, OrderError, PricePolicy, UpdateOrder, parse_status};

/// Result of an update.
///
/// An update that supplies an empty item list removes the order instead of
/// leaving it without items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(Order),
    Deleted(OrderId),
}

/// Service for managing orders.
///
/// Requests are validated in full before the store is touched; each store
/// write is a single atomic unit.
pub struct OrderService<S> {
    store: S,
    price_policy: PricePolicy,
}

impl<S: OrderStore + Catalog> OrderService<S> {
    /// Creates a new order service with the default price policy.
    pub fn new(store: S) -> Self {
        Self::with_price_policy(store, PricePolicy::default())
    }

    pub fn with_price_policy(store: S, price_policy: PricePolicy) -> Self {
        Self {
            store,
            price_policy,
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn price_policy(&self) -> &PricePolicy {
        &self.price_policy
    }

    /// Creates a new pending order for a table.
    #[tracing::instrument(skip(self, cmd), fields(table_number = %cmd.table_number))]
    pub async fn create_order(&self, cmd: CreateOrder) -> Result<Order, DomainError> {
        cmd.validate_shape().map_err(rejected)?;
        let items = self.resolve_line_items(&cmd.items).await?;

        let record = self
            .store
            .insert_order(NewOrder::pending(cmd.table_number, items))
            .await?;
        let order = Order::from(record);

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(
            order_id = %order.id(),
            items = order.item_count(),
            total = %order.total_price(),
            "order created"
        );
        Ok(order)
    }

    /// Applies a partial update to an existing order.
    #[tracing::instrument(skip(self, cmd), fields(order_id = %cmd.order_id))]
    pub async fn update_order(&self, cmd: UpdateOrder) -> Result<UpdateOutcome, DomainError> {
        let order_id = cmd.order_id;
        let status = cmd
            .status
            .as_deref()
            .map(parse_status)
            .transpose()
            .map_err(rejected)?;

        let Some(current) = self.store.get_order(order_id).await? else {
            return Err(DomainError::OrderNotFound { order_id });
        };

        let items = match cmd.items {
            Some(inputs) if inputs.is_empty() => {
                self.remove(order_id).await?;
                tracing::info!(%order_id, "order emptied by update, deleted");
                return Ok(UpdateOutcome::Deleted(order_id));
            }
            Some(inputs) => Some(self.resolve_line_items(&inputs).await?),
            None => None,
        };

        let changes = OrderChanges { status, items };
        if changes.is_empty() {
            return Ok(UpdateOutcome::Updated(Order::from(current)));
        }

        let record = self
            .store
            .update_order(order_id, changes)
            .await?
            .ok_or(DomainError::OrderNotFound { order_id })?;
        let order = Order::from(record);

        metrics::counter!("orders_updated_total").increment(1);
        tracing::info!(
            %order_id,
            status = %order.status(),
            items = order.item_count(),
            "order updated"
        );
        Ok(UpdateOutcome::Updated(order))
    }

    /// Deletes an order together with its line items.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, order_id: OrderId) -> Result<(), DomainError> {
        self.remove(order_id).await?;
        tracing::info!(%order_id, "order deleted");
        Ok(())
    }

    /// Loads an order by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<Order, DomainError> {
        self.store
            .get_order(order_id)
            .await?
            .map(Order::from)
            .ok_or(DomainError::OrderNotFound { order_id })
    }

    async fn remove(&self, order_id: OrderId) -> Result<(), DomainError> {
        if !self.store.delete_order(order_id).await? {
            return Err(DomainError::OrderNotFound { order_id });
        }
        metrics::counter!("orders_deleted_total").increment(1);
        Ok(())
    }

    /// Resolves requested items against the catalog and checks their prices.
    async fn resolve_line_items(
        &self,
        inputs: &[LineItemInput],
    ) -> Result<Vec<NewLineItem>, DomainError> {
        let mut requested: Vec<ItemId> = inputs.iter().map(|input| input.item_id).collect();
        requested.sort_unstable();
        requested.dedup();

        let known: HashSet<ItemId> = self
            .store
            .get_items(&requested)
            .await?
            .into_iter()
            .map(|item| item.id)
            .collect();

        validate_line_items(inputs, &known, &self.price_policy).map_err(rejected)
    }
}

pub(super) fn rejected(err: OrderError) -> DomainError {
    metrics::counter!("order_validation_failures_total").increment(1);
    tracing::warn!(code = err.code(), error = %err, "order request rejected");
    DomainError::Order(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_store::{InMemoryOrderStore, Money, OrderStatus};
    use rust_decimal_macros::dec;

    async fn service() -> OrderService<InMemoryOrderStore> {
        let store = InMemoryOrderStore::with_items(["Soup", "Salad", "Tea"]).await;
        OrderService::new(store)
    }

    async fn place(service: &OrderService<InMemoryOrderStore>, items: Vec<LineItemInput>) -> Order {
        service
            .create_order(CreateOrder::new(1, items))
            .await
            .unwrap()
    }

    fn updated(outcome: UpdateOutcome) -> Order {
        match outcome {
            UpdateOutcome::Updated(order) => order,
            UpdateOutcome::Deleted(id) => panic!("order {id} was deleted"),
        }
    }

    #[tokio::test]
    async fn test_create_order() {
        let service = service().await;

        let order = place(
            &service,
            vec![LineItemInput::new(1, dec!(10)), LineItemInput::new(3, dec!(2.50))],
        )
        .await;

        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.total_price(), Money::new(dec!(12.50)));
        assert_eq!(service.store().order_count().await, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_table_number() {
        let service = service().await;

        let result = service
            .create_order(CreateOrder::new(0, vec![LineItemInput::new(1, dec!(1))]))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::InvalidTableNumber { .. }))
        ));
        assert_eq!(service.store().order_count().await, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_item() {
        let service = service().await;

        let result = service
            .create_order(CreateOrder::new(
                1,
                vec![LineItemInput::new(1, dec!(1)), LineItemInput::new(42, dec!(1))],
            ))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::ItemNotFound { .. }))
        ));
        assert_eq!(service.store().line_item_count().await, 0);
    }

    #[tokio::test]
    async fn test_custom_price_policy_applies() {
        let store = InMemoryOrderStore::with_items(["Soup"]).await;
        let service =
            OrderService::with_price_policy(store, PricePolicy::new(Money::from_units(20)));

        let result = service
            .create_order(CreateOrder::new(1, vec![LineItemInput::new(1, dec!(25))]))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::InvalidPrice { .. }))
        ));
    }

    #[tokio::test]
    async fn test_update_with_no_changes_returns_current_order() {
        let service = service().await;
        let order = place(&service, vec![LineItemInput::new(2, dec!(4))]).await;

        let outcome = service
            .update_order(UpdateOrder::new(order.id()))
            .await
            .unwrap();

        assert_eq!(updated(outcome), order);
    }

    #[tokio::test]
    async fn test_update_invalid_status_changes_nothing() {
        let service = service().await;
        let order = place(&service, vec![LineItemInput::new(2, dec!(4))]).await;

        let result = service
            .update_order(
                UpdateOrder::new(order.id())
                    .status("cooking")
                    .items(vec![LineItemInput::new(1, dec!(9))]),
            )
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::InvalidStatus { .. }))
        ));
        assert_eq!(service.get_order(order.id()).await.unwrap(), order);
    }

    #[tokio::test]
    async fn test_update_with_bad_price_keeps_status() {
        let service = service().await;
        let order = place(&service, vec![LineItemInput::new(2, dec!(4))]).await;

        let result = service
            .update_order(
                UpdateOrder::new(order.id())
                    .status("paid")
                    .items(vec![LineItemInput::new(1, dec!(-3))]),
            )
            .await;

        assert!(matches!(
            result,
            Err(DomainError::Order(OrderError::InvalidPrice { .. }))
        ));
        let current = service.get_order(order.id()).await.unwrap();
        assert_eq!(current.status(), OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_with_empty_items_deletes_order() {
        let service = service().await;
        let order = place(&service, vec![LineItemInput::new(2, dec!(4))]).await;

        let outcome = service
            .update_order(UpdateOrder::new(order.id()).status("ready").items(vec![]))
            .await
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::Deleted(order.id()));
        assert_eq!(service.store().order_count().await, 0);
        assert_eq!(service.store().line_item_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_unknown_order() {
        let service = service().await;

        let result = service
            .update_order(UpdateOrder::new(OrderId::new(5)).status("paid"))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::OrderNotFound { order_id }) if order_id == OrderId::new(5)
        ));
    }

    #[tokio::test]
    async fn test_delete_and_get() {
        let service = service().await;
        let order = place(&service, vec![LineItemInput::new(1, dec!(1))]).await;

        assert_eq!(service.get_order(order.id()).await.unwrap(), order);

        service.delete_order(order.id()).await.unwrap();
        assert!(matches!(
            service.get_order(order.id()).await,
            Err(DomainError::OrderNotFound { .. })
        ));
        assert!(matches!(
            service.delete_order(order.id()).await,
            Err(DomainError::OrderNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_item_ids_are_separate_line_items() {
        let service = service().await;

        let order = place(
            &service,
            vec![LineItemInput::new(1, dec!(3)), LineItemInput::new(1, dec!(3))],
        )
        .await;

        assert_eq!(order.item_count(), 2);
        assert_eq!(order.total_price(), Money::from_units(6));
    }
}
