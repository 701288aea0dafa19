//! Test support shared by service and shell tests.

mod context;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
