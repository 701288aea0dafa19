//! Arturia Store application: order persistence, checkout and the interactive shell.

pub mod checkout;
pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod object_store;
pub mod observability;
pub mod render;
pub mod session;

#[cfg(test)]
mod test;
