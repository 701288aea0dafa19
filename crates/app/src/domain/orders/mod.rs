//! Orders
//!
//! Persisted order history. Two interchangeable clients implement [`OrdersService`]: one
//! backed by `SQLite` and one backed by the embedded object store.

pub mod errors;
pub mod models;
mod object_service;
mod records;
mod repositories;
pub mod service;

pub use errors::OrdersServiceError;
pub use object_service::ObjectStoreOrdersService;
pub use service::*;

/// Name of the local database holding the order stores.
pub const DATABASE_NAME: &str = "arturia_db";

/// Version of the order stores' schema.
pub const SCHEMA_VERSION: u32 = 1;

/// Object store holding orders.
pub const ORDERS_STORE: &str = "orders";

/// Object store holding order items.
pub const ORDER_ITEMS_STORE: &str = "order_items";

/// Key path of both object stores.
pub const KEY_PATH: &str = "id";
