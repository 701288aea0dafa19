//! Order Items Repository

use sqlx::{FromRow, Row, Sqlite, Transaction, query_as, sqlite::SqliteRow};

use crate::domain::orders::models::{NewOrderItem, OrderId, OrderItem};

use super::orders::{try_get_amount, try_into_amount};

const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("../sql/list_order_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct SqliteOrderItemsRepository;

impl SqliteOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: OrderId,
        item: &NewOrderItem,
    ) -> Result<OrderItem, sqlx::Error> {
        query_as::<Sqlite, OrderItem>(CREATE_ORDER_ITEM_SQL)
            .bind(order.get())
            .bind(&item.code)
            .bind(&item.description)
            .bind(try_into_amount(item.price)?)
            .bind(i64::from(item.quantity))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_order_items(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: OrderId,
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        query_as::<Sqlite, OrderItem>(LIST_ORDER_ITEMS_SQL)
            .bind(order.get())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, SqliteRow> for OrderItem {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let quantity: i64 = row.try_get("quantity")?;

        Ok(Self {
            id: row.try_get("id")?,
            order_id: OrderId::new(row.try_get("order_id")?),
            code: row.try_get("code")?,
            description: row.try_get("description")?,
            price: try_get_amount(row, "price")?,
            quantity: u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
                index: "quantity".to_string(),
                source: Box::new(e),
            })?,
        })
    }
}
