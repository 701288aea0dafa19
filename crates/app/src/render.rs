//! Tables for the catalog, the cart sidebar and the orders page.

use std::num::TryFromIntError;

use arturia::{
    cart::{Cart, CartError},
    catalog::Catalog,
    pricing::{PricingError, format_money, format_price},
};
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    domain::orders::models::{Order, OrderId, OrderItem},
    session::notice::Notice,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("amount out of range")]
    Amount(#[from] TryFromIntError),
}

/// Products with their prices.
#[must_use]
pub fn catalog_table(catalog: &Catalog) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Code", "Description", "Price"]);

    for product in catalog.iter() {
        builder.push_record([
            product.code.clone(),
            product.description.clone(),
            format_money(&product.price),
        ]);
    }

    finish(builder, 2)
}

/// Cart sidebar: one row per entry with its unit and line price, the total, and the current
/// notice if any.
///
/// # Errors
///
/// Returns an error if a line or the cart total overflows.
pub fn cart_sidebar(cart: &Cart, notice: Option<&Notice>) -> Result<String, RenderError> {
    let mut sidebar = if cart.is_empty() {
        "Your cart is empty.".to_string()
    } else {
        let mut builder = Builder::default();

        builder.push_record(["Cart", "Each", "Price"]);

        for entry in cart.entries() {
            builder.push_record([
                format!("{} (x{})", entry.description, entry.quantity),
                format_money(&entry.price),
                format_money(&entry.line_total()?),
            ]);
        }

        builder.push_record([
            "Total".to_string(),
            String::new(),
            format_money(&cart.total()?),
        ]);

        finish(builder, 1)
    };

    if let Some(notice) = notice {
        sidebar.push('\n');
        sidebar.push_str(&notice.to_string());
    }

    Ok(sidebar)
}

/// Orders page listing.
///
/// # Errors
///
/// Returns an error if a total does not fit a signed amount.
pub fn orders_table(orders: &[Order], currency: &Currency) -> Result<String, RenderError> {
    if orders.is_empty() {
        return Ok("No orders yet.".to_string());
    }

    let mut builder = Builder::default();

    builder.push_record(["Order", "Total", "Created"]);

    for order in orders {
        builder.push_record([
            format!("#{}", order.id),
            format_price(i64::try_from(order.total)?, currency.iso_alpha_code),
            order.created_at.strftime("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ]);
    }

    Ok(finish(builder, 1))
}

/// Line items of one order.
///
/// # Errors
///
/// Returns an error if a price does not fit a signed amount.
pub fn order_items_table(
    order: OrderId,
    items: &[OrderItem],
    currency: &Currency,
) -> Result<String, RenderError> {
    if items.is_empty() {
        return Ok(format!("Order #{order} has no items."));
    }

    let mut builder = Builder::default();

    builder.push_record(["Code", "Description", "Qty", "Price"]);

    for item in items {
        builder.push_record([
            item.code.clone(),
            item.description.clone(),
            item.quantity.to_string(),
            format_price(i64::try_from(item.price)?, currency.iso_alpha_code),
        ]);
    }

    Ok(format!("Order #{order}\n{}", finish(builder, 2)))
}

fn finish(builder: Builder, right_aligned_from: usize) -> String {
    let mut table = builder.build();

    table.with(Theme::from(Style::modern_rounded()));
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(right_aligned_from..), Alignment::right());

    table.to_string()
}
