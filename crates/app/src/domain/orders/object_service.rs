//! Orders service backed by the embedded object store.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::{
    domain::orders::{
        DATABASE_NAME, KEY_PATH, ORDER_ITEMS_STORE, ORDERS_STORE, SCHEMA_VERSION,
        errors::OrdersServiceError,
        models::{NewOrderItem, Order, OrderId, OrderItem},
        records::{OrderItemRecord, OrderRecord},
        service::{OrdersService, validate_order},
    },
    object_store::{Location, ObjectDb, ObjectStoreError, VersionChange},
};

#[derive(Debug, Clone)]
pub struct ObjectStoreOrdersService {
    location: Location,
    connection: Arc<OnceCell<ObjectDb>>,
}

impl ObjectStoreOrdersService {
    #[must_use]
    pub fn new(location: Location) -> Self {
        Self {
            location,
            connection: Arc::new(OnceCell::new()),
        }
    }

    async fn db(&self) -> Result<&ObjectDb, OrdersServiceError> {
        self.connection
            .get_or_try_init(|| {
                ObjectDb::open(
                    self.location.clone(),
                    DATABASE_NAME,
                    SCHEMA_VERSION,
                    ensure_schema,
                )
            })
            .await
            .map_err(|error| OrdersServiceError::StorageUnavailable(Box::new(error)))
    }
}

#[async_trait]
impl OrdersService for ObjectStoreOrdersService {
    async fn open(&self) -> Result<(), OrdersServiceError> {
        self.db().await?;

        Ok(())
    }

    async fn save_order(
        &self,
        total: u64,
        items: Vec<NewOrderItem>,
    ) -> Result<OrderId, OrdersServiceError> {
        validate_order(total, &items)?;

        let order = OrderRecord {
            id: None,
            total,
            created_at: Timestamp::now(),
        };

        let id = self
            .db()
            .await?
            .write(&[ORDERS_STORE, ORDER_ITEMS_STORE], |tx| {
                let id = tx.add(ORDERS_STORE, &order)?;

                for item in &items {
                    tx.add(ORDER_ITEMS_STORE, &OrderItemRecord::new(id, item))?;
                }

                Ok(id)
            })
            .await?;

        info!(order_id = id, total, items = items.len(), "saved order");

        Ok(OrderId::new(id))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        let records: Vec<OrderRecord> = self
            .db()
            .await?
            .read(&[ORDERS_STORE], |tx| tx.get_all(ORDERS_STORE))
            .await?;

        debug!(count = records.len(), "listed orders");

        records.into_iter().map(Order::try_from).collect()
    }

    async fn list_order_items(&self, order: OrderId) -> Result<Vec<OrderItem>, OrdersServiceError> {
        let records: Vec<OrderItemRecord> = self
            .db()
            .await?
            .read(&[ORDER_ITEMS_STORE], |tx| tx.get_all(ORDER_ITEMS_STORE))
            .await?;

        records
            .into_iter()
            .filter(|record| record.order_id == order.get())
            .map(OrderItem::try_from)
            .collect()
    }
}

fn ensure_schema(change: &mut VersionChange<'_>) -> Result<(), ObjectStoreError> {
    for store in [ORDERS_STORE, ORDER_ITEMS_STORE] {
        if !change.contains(store) {
            change.create_object_store(store, KEY_PATH)?;

            info!(store, "created object store");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use testresult::TestResult;

    use crate::test::helpers::{DEMO_TOTAL, demo_items};

    use super::*;

    #[tokio::test]
    async fn lists_orders_in_key_order() -> TestResult {
        let service = ObjectStoreOrdersService::new(Location::Memory);

        let first = service.save_order(100, Vec::new()).await?;
        let second = service.save_order(200, Vec::new()).await?;

        let ids: Vec<OrderId> = service
            .list_orders()
            .await?
            .into_iter()
            .map(|order| order.id)
            .collect();

        assert_eq!(first, OrderId::new(1));
        assert_eq!(ids, [first, second]);

        Ok(())
    }

    #[tokio::test]
    async fn orders_survive_a_new_client() -> TestResult {
        let dir = TempDir::new()?;
        let location = Location::File(dir.path().join("arturia_db.json"));

        let id = ObjectStoreOrdersService::new(location.clone())
            .save_order(DEMO_TOTAL, demo_items())
            .await?;

        let reopened = ObjectStoreOrdersService::new(location);

        assert_eq!(reopened.list_order_items(id).await?.len(), 2);
        assert_eq!(
            reopened.list_orders().await?.first().map(|o| o.total),
            Some(DEMO_TOTAL)
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_item_insert_leaves_no_order() -> TestResult {
        let dir = TempDir::new()?;
        let location = Location::File(dir.path().join("arturia_db.json"));

        ObjectDb::open(location.clone(), DATABASE_NAME, SCHEMA_VERSION, |change| {
            change.create_object_store(ORDERS_STORE, KEY_PATH)
        })
        .await?;

        let service = ObjectStoreOrdersService::new(location);

        let result = service.save_order(DEMO_TOTAL, demo_items()).await;

        assert!(matches!(result, Err(OrdersServiceError::ObjectStore(_))));
        assert!(service.list_orders().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn corrupt_database_file_is_storage_unavailable() -> TestResult {
        let dir = TempDir::new()?;
        let path = dir.path().join("arturia_db.json");

        std::fs::write(&path, "not json")?;

        let result = ObjectStoreOrdersService::new(Location::File(path))
            .open()
            .await;

        assert!(result.is_err_and(|error| error.is_storage_unavailable()));

        Ok(())
    }

    #[tokio::test]
    async fn newer_database_version_is_storage_unavailable() -> TestResult {
        let dir = TempDir::new()?;
        let location = Location::File(dir.path().join("arturia_db.json"));

        ObjectDb::open(location.clone(), DATABASE_NAME, SCHEMA_VERSION + 1, ensure_schema)
            .await?;

        let result = ObjectStoreOrdersService::new(location).open().await;

        assert!(result.is_err_and(|error| error.is_storage_unavailable()));

        Ok(())
    }
}
