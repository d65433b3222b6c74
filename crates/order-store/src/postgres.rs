use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction};

use crate::{
    Item, ItemId, LineItemId, LineItemRecord, Money, NewLineItem, NewOrder, OrderChanges, OrderId,
    OrderQuery, OrderRecord, OrderStatus, Result, StoreError, TableNumber,
    store::{Catalog, OrderStore, validate_line_items_for_write},
};

/// PostgreSQL-backed order store implementation.
///
/// Every write runs inside one transaction; returning early with an error
/// drops the transaction, which rolls it back. Reads that touch both tables
/// share one REPEATABLE READ snapshot, so an order is never returned with
/// the line items of a different commit.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url` with a small pool.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    /// Adds an item to the catalog.
    pub async fn insert_item(&self, name: &str) -> Result<Item> {
        let row = sqlx::query("INSERT INTO items (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Self::row_to_item(row)
    }

    fn row_to_item(row: PgRow) -> Result<Item> {
        Ok(Item {
            id: ItemId::new(row.try_get("id")?),
            name: row.try_get("name")?,
        })
    }

    fn row_to_line_item(row: &PgRow) -> Result<(OrderId, LineItemRecord)> {
        let order_id = OrderId::new(row.try_get("order_id")?);
        let record = LineItemRecord {
            id: LineItemId::new(row.try_get("id")?),
            item_id: ItemId::new(row.try_get("item_id")?),
            price: Money::new(row.try_get::<Decimal, _>("price")?),
        };
        Ok((order_id, record))
    }

    fn row_to_order(row: &PgRow, items: Vec<LineItemRecord>) -> Result<OrderRecord> {
        let status: String = row.try_get("status")?;
        let status: OrderStatus = status
            .parse()
            .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))?;

        Ok(OrderRecord {
            id: OrderId::new(row.try_get("id")?),
            table_number: TableNumber::new(row.try_get("table_number")?),
            status,
            items,
        })
    }

    /// Loads orders and attaches their line items with a second query.
    async fn load_orders(conn: &mut PgConnection, rows: Vec<PgRow>) -> Result<Vec<OrderRecord>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids = rows
            .iter()
            .map(|row| row.try_get::<i64, _>("id"))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let item_rows = sqlx::query(
            r#"
            SELECT id, order_id, item_id, price
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await?;

        let mut items_by_order: HashMap<OrderId, Vec<LineItemRecord>> = HashMap::new();
        for row in &item_rows {
            let (order_id, record) = Self::row_to_line_item(row)?;
            items_by_order.entry(order_id).or_default().push(record);
        }

        rows.iter()
            .map(|row| {
                let id = OrderId::new(row.try_get("id")?);
                let items = items_by_order.remove(&id).unwrap_or_default();
                Self::row_to_order(row, items)
            })
            .collect()
    }

    async fn fetch_order(conn: &mut PgConnection, id: OrderId) -> Result<Option<OrderRecord>> {
        let row = sqlx::query("SELECT id, table_number, status FROM orders WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(row) => Ok(Self::load_orders(conn, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Starts a read-only transaction whose statements all see one snapshot.
    async fn begin_read(&self) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// Inserts a batch of line items with a single statement.
    async fn insert_line_items(
        conn: &mut PgConnection,
        order_id: OrderId,
        items: &[NewLineItem],
    ) -> Result<()> {
        let item_ids: Vec<i64> = items.iter().map(|li| li.item_id.as_i64()).collect();
        let prices: Vec<Decimal> = items.iter().map(|li| li.price.amount()).collect();

        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, item_id, price)
            SELECT $1, item_id, price
            FROM UNNEST($2::BIGINT[], $3::NUMERIC[]) WITH ORDINALITY AS t(item_id, price, ord)
            ORDER BY ord
            "#,
        )
        .bind(order_id.as_i64())
        .bind(&item_ids)
        .bind(&prices)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl Catalog for PostgresOrderStore {
    async fn get_items(&self, ids: &[ItemId]) -> Result<Vec<Item>> {
        let ids: Vec<i64> = ids.iter().map(ItemId::as_i64).collect();
        let rows = sqlx::query("SELECT id, name FROM items WHERE id = ANY($1) ORDER BY id ASC")
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_item).collect()
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        let rows = sqlx::query("SELECT id, name FROM items ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_item).collect()
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert_order(&self, order: NewOrder) -> Result<OrderRecord> {
        validate_line_items_for_write(&order.items)?;

        let mut tx = self.pool.begin().await?;

        let order_id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (table_number, status) VALUES ($1, $2) RETURNING id",
        )
        .bind(order.table_number.as_i32())
        .bind(order.status.as_str())
        .fetch_one(&mut *tx)
        .await?;
        let order_id = OrderId::new(order_id);

        // A foreign key violation here aborts the transaction together
        // with the order row inserted above.
        Self::insert_line_items(&mut tx, order_id, &order.items).await?;

        let record = Self::fetch_order(&mut tx, order_id)
            .await?
            .ok_or_else(|| StoreError::InvalidWrite(format!("order {order_id} vanished")))?;

        tx.commit().await?;
        tracing::debug!(%order_id, items = record.items.len(), "order inserted");
        Ok(record)
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<OrderRecord>> {
        let mut tx = self.begin_read().await?;
        let record = Self::fetch_order(&mut tx, id).await?;
        tx.commit().await?;
        Ok(record)
    }

    async fn update_order(
        &self,
        id: OrderId,
        changes: OrderChanges,
    ) -> Result<Option<OrderRecord>> {
        if let Some(ref items) = changes.items {
            validate_line_items_for_write(items)?;
        }

        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query("SELECT id FROM orders WHERE id = $1 FOR UPDATE")
            .bind(id.as_i64())
            .fetch_optional(&mut *tx)
            .await?
            .is_some();
        if !exists {
            return Ok(None);
        }

        if let Some(status) = changes.status {
            sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
                .bind(status.as_str())
                .bind(id.as_i64())
                .execute(&mut *tx)
                .await?;
        }

        if let Some(items) = changes.items {
            sqlx::query("DELETE FROM order_items WHERE order_id = $1")
                .bind(id.as_i64())
                .execute(&mut *tx)
                .await?;
            Self::insert_line_items(&mut tx, id, &items).await?;
        }

        let record = Self::fetch_order(&mut tx, id).await?;
        tx.commit().await?;
        Ok(record)
    }

    async fn delete_order(&self, id: OrderId) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(deleted > 0)
    }

    async fn find_orders(&self, query: OrderQuery) -> Result<Vec<OrderRecord>> {
        let mut sql = String::from("SELECT id, table_number, status FROM orders WHERE 1=1");
        let mut param_count = 0;

        // Build dynamic query
        if query.table_number.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND table_number = ${param_count}"));
        }
        if query.status.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND status = ${param_count}"));
        }
        sql.push_str(" ORDER BY id ASC");

        let mut sqlx_query = sqlx::query(&sql);
        if let Some(table_number) = query.table_number {
            sqlx_query = sqlx_query.bind(table_number.as_i32());
        }
        if let Some(status) = query.status {
            sqlx_query = sqlx_query.bind(status.as_str());
        }

        let mut tx = self.begin_read().await?;
        let rows = sqlx_query.fetch_all(&mut *tx).await?;
        let records = Self::load_orders(&mut tx, rows).await?;
        tx.commit().await?;
        Ok(records)
    }

    async fn sum_prices_by_status(&self, status: OrderStatus) -> Result<Money> {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(oi.price), 0)
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            WHERE o.status = $1
            "#,
        )
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::new(total))
    }
}
