//! Test Helpers

use crate::domain::orders::models::NewOrderItem;

/// Total of [`demo_items`]: one $199.90 headphones and two $129.00 keyboards.
pub(crate) const DEMO_TOTAL: u64 = 45_790;

pub(crate) fn item(code: &str, price: u64, quantity: u32) -> NewOrderItem {
    NewOrderItem {
        code: code.to_string(),
        description: format!("Product {code}"),
        price,
        quantity,
    }
}

pub(crate) fn demo_items() -> Vec<NewOrderItem> {
    vec![
        NewOrderItem {
            code: "P001".to_string(),
            description: "Wireless Headphones".to_string(),
            price: 19_990,
            quantity: 1,
        },
        NewOrderItem {
            code: "P002".to_string(),
            description: "Mechanical Keyboard".to_string(),
            price: 12_900,
            quantity: 2,
        },
    ]
}
