//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    catalog::Product,
    pricing::{PricingError, line_total},
};

/// Errors related to cart updates or totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A product's currency differs from the cart currency (code, product currency, cart currency).
    #[error("Product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// The quantity of an entry cannot be incremented any further.
    #[error("quantity limit reached for product {0}")]
    QuantityOverflow(String),

    /// Wrapped price calculation error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// A product queued for purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct CartEntry {
    /// Product code
    pub code: String,

    /// Product description
    pub description: String,

    /// Unit price
    pub price: Money<'static, Currency>,

    /// Number of units, never below 1
    pub quantity: u32,
}

impl CartEntry {
    /// Price of all units in this entry.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the line total overflows.
    pub fn line_total(&self) -> Result<Money<'static, Currency>, PricingError> {
        line_total(&self.price, self.quantity)
    }
}

impl From<&Product> for CartEntry {
    fn from(product: &Product) -> Self {
        Self {
            code: product.code.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity: 1,
        }
    }
}

/// Shopping cart keyed by product code, in the order products were first added.
#[derive(Debug, Clone)]
pub struct Cart {
    entries: Vec<CartEntry>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            entries: Vec::new(),
            currency,
        }
    }

    /// Add one unit of a product, returning the entry's new quantity.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product is priced in another currency or the quantity
    /// would overflow.
    pub fn add(&mut self, product: &Product) -> Result<u32, CartError> {
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                product.code.clone(),
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.code == product.code)
        {
            entry.quantity = entry
                .quantity
                .checked_add(1)
                .ok_or_else(|| CartError::QuantityOverflow(product.code.clone()))?;

            return Ok(entry.quantity);
        }

        self.entries.push(CartEntry::from(product));

        Ok(1)
    }

    /// Remove the entry for a product code.
    pub fn remove(&mut self, code: &str) -> Option<CartEntry> {
        let position = self.entries.iter().position(|entry| entry.code == code)?;

        Some(self.entries.remove(position))
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get the entry for a product code.
    pub fn get(&self, code: &str) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.code == code)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Calculate the cart total, the sum of price × quantity over all entries.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if a line total or their sum does not fit in minor units.
    pub fn total(&self) -> Result<Money<'static, Currency>, CartError> {
        let minor_units = self.entries.iter().try_fold(0_i64, |acc, entry| {
            let line = entry.line_total()?.try_to_minor_units()?;

            acc.checked_add(line).ok_or(PricingError::Overflow)
        })?;

        Ok(Money::from_minor(minor_units, self.currency))
    }

    /// Total number of units across all entries.
    pub fn units(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| u64::from(entry.quantity))
            .sum()
    }

    /// Get the number of distinct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
