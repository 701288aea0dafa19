//! Arturia Domain Concerns

pub mod orders;
