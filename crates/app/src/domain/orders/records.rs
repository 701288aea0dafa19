//! Order Records
//!
//! JSON shapes of orders and order items in the object store. Keys are absent until the
//! store assigns them.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::domain::orders::{
    errors::OrdersServiceError,
    models::{NewOrderItem, Order, OrderId, OrderItem},
};

/// Order Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct OrderRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub total: u64,
    pub created_at: Timestamp,
}

/// OrderItem Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct OrderItemRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub order_id: i64,
    pub code: String,
    pub description: String,
    pub price: u64,
    pub quantity: u32,
}

impl OrderItemRecord {
    pub(crate) fn new(order_id: i64, item: &NewOrderItem) -> Self {
        Self {
            id: None,
            order_id,
            code: item.code.clone(),
            description: item.description.clone(),
            price: item.price,
            quantity: item.quantity,
        }
    }
}

impl TryFrom<OrderRecord> for Order {
    type Error = OrdersServiceError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderId::new(record.id.ok_or(OrdersServiceError::MissingRequiredData)?),
            total: record.total,
            created_at: record.created_at,
        })
    }
}

impl TryFrom<OrderItemRecord> for OrderItem {
    type Error = OrdersServiceError;

    fn try_from(record: OrderItemRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id.ok_or(OrdersServiceError::MissingRequiredData)?,
            order_id: OrderId::new(record.order_id),
            code: record.code,
            description: record.description,
            price: record.price,
            quantity: record.quantity,
        })
    }
}
