//! Checkout
//!
//! Turns the cart into a saved order. The cart is only cleared once the order and all of
//! its items have been stored.

use std::num::TryFromIntError;

use arturia::{
    cart::{Cart, CartError},
    pricing::PricingError,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::orders::{
    OrdersService, OrdersServiceError,
    models::{NewOrderItem, OrderId},
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("cart amounts cannot be negative")]
    InvalidAmount(#[from] TryFromIntError),

    #[error("failed to save order")]
    Orders(#[from] OrdersServiceError),
}

/// Order lines for every cart entry, in cart order.
///
/// # Errors
///
/// Returns [`CheckoutError::InvalidAmount`] if a price is negative, or
/// [`CheckoutError::Pricing`] if it is not a whole number of minor units.
pub fn order_items(cart: &Cart) -> Result<Vec<NewOrderItem>, CheckoutError> {
    cart.entries()
        .iter()
        .map(|entry| {
            Ok(NewOrderItem {
                code: entry.code.clone(),
                description: entry.description.clone(),
                price: u64::try_from(
                    entry
                        .price
                        .try_to_minor_units()
                        .map_err(PricingError::from)?,
                )?,
                quantity: entry.quantity,
            })
        })
        .collect()
}

/// Save the cart as an order and clear it, returning the new order identifier.
///
/// The cart is left untouched when anything fails.
///
/// # Errors
///
/// Returns an error if the cart is empty, its total cannot be calculated, or the order
/// cannot be saved.
pub async fn checkout(cart: &mut Cart, orders: &dyn OrdersService) -> Result<OrderId, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let total = cart
        .total()?
        .try_to_minor_units()
        .map_err(PricingError::from)?;
    let total = u64::try_from(total)?;
    let items = order_items(cart)?;

    match orders.save_order(total, items).await {
        Ok(order_id) => {
            cart.clear();

            info!(%order_id, total, "checkout completed");

            Ok(order_id)
        }
        Err(error) => {
            warn!(%error, "checkout failed");

            Err(error.into())
        }
    }
}
