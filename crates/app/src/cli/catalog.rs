use std::io::Write;

use arturia_app::{context::AppContext, render::catalog_table};

use super::CliError;

pub(crate) fn run(context: &AppContext, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "{}", catalog_table(&context.catalog))?;

    Ok(())
}
