//! App Context

use std::{io, sync::Arc};

use arturia::{
    catalog::Catalog,
    fixtures::{FixtureError, demo_catalog, load_catalog_file},
};
use thiserror::Error;
use tracing::info;

use crate::{
    config::{StorageBackend, StorageConfig},
    database::Db,
    domain::orders::{
        ObjectStoreOrdersService, OrdersService, OrdersServiceError, SqliteOrdersService,
    },
    object_store::Location,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to load catalog")]
    Catalog(#[from] FixtureError),

    #[error("failed to create data directory")]
    DataDir(#[source] io::Error),

    #[error("failed to open local storage")]
    Storage(#[source] OrdersServiceError),
}

#[derive(Clone)]
pub struct AppContext {
    pub orders: Arc<dyn OrdersService>,
    pub catalog: Arc<Catalog>,
    pub storage: StorageBackend,
}

impl AppContext {
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersService>, catalog: Catalog, storage: StorageBackend) -> Self {
        Self {
            orders,
            catalog: Arc::new(catalog),
            storage,
        }
    }

    /// Load the catalog and open the configured orders store.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog is invalid, the data directory cannot be created,
    /// or the local store cannot be opened.
    pub async fn init(config: &StorageConfig) -> Result<Self, AppInitError> {
        let catalog = match &config.catalog {
            Some(path) => load_catalog_file(path)?,
            None => demo_catalog()?,
        };

        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .map_err(AppInitError::DataDir)?;

        let path = config.database_path();

        let orders: Arc<dyn OrdersService> = match config.storage {
            StorageBackend::Sqlite => Arc::new(SqliteOrdersService::new(Db::from_path(&path))),
            StorageBackend::ObjectStore => {
                Arc::new(ObjectStoreOrdersService::new(Location::File(path.clone())))
            }
        };

        orders.open().await.map_err(AppInitError::Storage)?;

        info!(
            storage = config.storage.label(),
            path = %path.display(),
            products = catalog.len(),
            "opened store"
        );

        Ok(Self::new(orders, catalog, config.storage))
    }
}
