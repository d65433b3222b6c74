//! Shared value types for the order management backend.

pub mod money;
pub mod status;
pub mod types;

pub use money::Money;
pub use status::{OrderStatus, ParseStatusError};
pub use types::{ItemId, LineItemId, OrderId, TableNumber};
