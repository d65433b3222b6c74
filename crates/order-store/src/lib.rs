pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod record;
pub mod store;

pub use common::{ItemId, LineItemId, Money, OrderId, OrderStatus, TableNumber};
pub use error::{Result, StoreError};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use query::OrderQuery;
pub use record::{Item, LineItemRecord, NewLineItem, NewOrder, OrderChanges, OrderRecord};
pub use store::{Catalog, OrderStore, validate_line_items_for_write};
