//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::orders::{
        errors::OrdersServiceError,
        models::{NewOrderItem, Order, OrderId, OrderItem},
        repositories::{SqliteOrderItemsRepository, SqliteOrdersRepository},
    },
};

#[derive(Debug, Clone)]
pub struct SqliteOrdersService {
    db: Db,
    orders_repository: SqliteOrdersRepository,
    items_repository: SqliteOrderItemsRepository,
}

impl SqliteOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: SqliteOrdersRepository::new(),
            items_repository: SqliteOrderItemsRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for SqliteOrdersService {
    async fn open(&self) -> Result<(), OrdersServiceError> {
        self.db.pool().await?;

        Ok(())
    }

    async fn save_order(
        &self,
        total: u64,
        items: Vec<NewOrderItem>,
    ) -> Result<OrderId, OrdersServiceError> {
        validate_order(total, &items)?;

        let mut tx = self.db.pool().await?.begin().await?;

        let order = self
            .orders_repository
            .create_order(&mut tx, total, Timestamp::now())
            .await?;

        for item in &items {
            self.items_repository
                .create_order_item(&mut tx, order.id, item)
                .await?;
        }

        tx.commit().await?;

        info!(order_id = %order.id, total, items = items.len(), "saved order");

        Ok(order.id)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.pool().await?.begin().await?;

        let orders = self.orders_repository.list_orders(&mut tx).await?;

        tx.commit().await?;

        debug!(count = orders.len(), "listed orders");

        Ok(orders)
    }

    async fn list_order_items(&self, order: OrderId) -> Result<Vec<OrderItem>, OrdersServiceError> {
        let mut tx = self.db.pool().await?.begin().await?;

        let items = self
            .items_repository
            .list_order_items(&mut tx, order)
            .await?;

        tx.commit().await?;

        Ok(items)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Open the local store, creating the order stores if they are missing.
    ///
    /// Idempotent; every client holds at most one connection.
    async fn open(&self) -> Result<(), OrdersServiceError>;

    /// Persist an order and its items together, returning the new order's identifier.
    async fn save_order(
        &self,
        total: u64,
        items: Vec<NewOrderItem>,
    ) -> Result<OrderId, OrdersServiceError>;

    /// List every saved order.
    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError>;

    /// List the items of one order. Unknown orders have no items.
    async fn list_order_items(&self, order: OrderId) -> Result<Vec<OrderItem>, OrdersServiceError>;
}

/// Reject orders the stores could not hold before anything is written.
pub(crate) fn validate_order(total: u64, items: &[NewOrderItem]) -> Result<(), OrdersServiceError> {
    i64::try_from(total)?;

    for item in items {
        if item.quantity == 0 {
            return Err(OrdersServiceError::InvalidData);
        }

        i64::try_from(item.price)?;
    }

    Ok(())
}
