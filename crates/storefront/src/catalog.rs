//! Catalog

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors related to catalog construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog has no products, so its currency cannot be determined.
    #[error("catalog has no products")]
    NoProducts,

    /// Two products share the same code.
    #[error("duplicate product code: {0}")]
    DuplicateCode(String),

    /// A product's currency differs from the rest of the catalog (code, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product code, unique within a catalog
    pub code: String,

    /// Product description
    pub description: String,

    /// Product price
    pub price: Money<'static, Currency>,
}

/// A fixed list of products sharing one currency.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<String, usize>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create a catalog from the given products, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the list is empty, a code repeats or the currencies differ.
    pub fn new(products: impl Into<Vec<Product>>) -> Result<Self, CatalogError> {
        let products = products.into();

        let currency = products
            .first()
            .map(|product| product.price.currency())
            .ok_or(CatalogError::NoProducts)?;

        let mut index = FxHashMap::default();

        for (position, product) in products.iter().enumerate() {
            let product_currency = product.price.currency();

            if product_currency != currency {
                return Err(CatalogError::CurrencyMismatch(
                    product.code.clone(),
                    product_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if index.insert(product.code.clone(), position).is_some() {
                return Err(CatalogError::DuplicateCode(product.code.clone()));
            }
        }

        Ok(Self {
            products,
            index,
            currency,
        })
    }

    /// Look up a product by code.
    pub fn get(&self, code: &str) -> Option<&Product> {
        self.index
            .get(code)
            .and_then(|&position| self.products.get(position))
    }

    /// Iterate over products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Get the number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get the currency shared by every product.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
