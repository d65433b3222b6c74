//! Domain layer for the restaurant order backend.
//!
//! This crate provides:
//! - Typed order inputs and their pure validation rules
//! - The order lifecycle service (create, update, delete)
//! - Order search and the paid-order revenue report

pub mod error;
pub mod order;

pub use common::{ItemId, LineItemId, Money, OrderId, OrderStatus, TableNumber};
pub use error::DomainError;
pub use order::{
    CreateOrder, LineItem, LineItemInput, Order, OrderError, OrderSearch, OrderService,
    PricePolicy, UpdateOrder, UpdateOutcome,
};
