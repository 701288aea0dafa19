//! Arturia prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartEntry, CartError},
    catalog::{Catalog, CatalogError, Product},
    fixtures::{FixtureError, demo_catalog, load_catalog, load_catalog_file},
    pricing::{PricingError, format_money, format_price, line_total},
};
