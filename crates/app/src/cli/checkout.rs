use std::io::Write;

use arturia::cart::Cart;
use clap::Args;
use tokio::time::Instant;

use arturia_app::{checkout::checkout, context::AppContext, render::cart_sidebar, session::Notice};

use super::CliError;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Product codes to buy
    #[arg(required = true)]
    pub(crate) codes: Vec<String>,
}

pub(crate) async fn run(
    context: &AppContext,
    args: CheckoutArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut cart = Cart::new(context.catalog.currency());

    for code in &args.codes {
        let product = context
            .catalog
            .get(code)
            .ok_or_else(|| CliError::UnknownProduct(code.clone()))?;

        cart.add(product)?;
    }

    writeln!(out, "{}", cart_sidebar(&cart, None)?)?;

    match checkout(&mut cart, context.orders.as_ref()).await {
        Ok(order) => {
            writeln!(out, "{}", Notice::order_created(order, Instant::now()).message())?;

            Ok(())
        }
        Err(error) => {
            writeln!(out, "{}", Notice::order_failed(Instant::now()).message())?;

            Err(error.into())
        }
    }
}
