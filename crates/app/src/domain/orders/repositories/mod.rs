//! Order Repositories

mod items;
mod orders;

pub(crate) use items::SqliteOrderItemsRepository;
pub(crate) use orders::SqliteOrdersRepository;
