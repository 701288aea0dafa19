//! Order Models

use std::{fmt, num::ParseIntError, str::FromStr};

use jiff::Timestamp;

/// Store-assigned order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderId(i64);

impl OrderId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for OrderId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}

/// Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub total: u64,
    pub created_at: Timestamp,
}

/// OrderItem Model
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: OrderId,
    pub code: String,
    pub description: String,
    pub price: u64,
    pub quantity: u32,
}

/// New OrderItem Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub code: String,
    pub description: String,
    pub price: u64,
    pub quantity: u32,
}
