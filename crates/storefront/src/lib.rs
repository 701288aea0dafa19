//! Arturia
//!
//! Storefront domain for the Arturia Store: a fixed product catalog, an in-memory shopping
//! cart and the money handling shared by both.

pub mod cart;
pub mod catalog;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
