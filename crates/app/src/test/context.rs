//! Test context for service-level integration tests.

use std::path::PathBuf;

use tempfile::TempDir;

use crate::{
    database::Db,
    domain::orders::{ObjectStoreOrdersService, OrdersService, SqliteOrdersService},
    object_store::Location,
};

/// Both orders clients, opened against fresh files in a temporary directory.
pub(crate) struct TestContext {
    pub dir: TempDir,
    pub db: Db,
    pub sqlite: SqliteOrdersService,
    pub object_store: ObjectStoreOrdersService,
}

impl TestContext {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temporary directory");

        let db = Db::from_path(dir.path().join("arturia_db.sqlite3"));
        let sqlite = SqliteOrdersService::new(db.clone());
        let object_store =
            ObjectStoreOrdersService::new(Location::File(dir.path().join("arturia_db.json")));

        sqlite.open().await.expect("Failed to open SQLite orders");
        object_store
            .open()
            .await
            .expect("Failed to open object store orders");

        Self {
            dir,
            db,
            sqlite,
            object_store,
        }
    }

    pub fn sqlite_path(&self) -> PathBuf {
        self.dir.path().join("arturia_db.sqlite3")
    }

    /// Every orders client, labelled for assertion messages.
    pub fn services(&self) -> [(&'static str, &dyn OrdersService); 2] {
        [("sqlite", &self.sqlite), ("object store", &self.object_store)]
    }
}
