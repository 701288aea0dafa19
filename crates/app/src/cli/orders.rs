use std::io::Write;

use clap::{Args, Subcommand};

use arturia_app::{
    context::AppContext,
    domain::orders::models::OrderId,
    render::{order_items_table, orders_table},
};

use super::CliError;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    pub(crate) command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum OrdersSubcommand {
    /// List saved orders
    List,

    /// Show the items of one order
    Show(ShowOrderArgs),
}

#[derive(Debug, Args)]
pub(crate) struct ShowOrderArgs {
    /// Order number
    pub(crate) id: OrderId,
}

pub(crate) async fn run(
    context: &AppContext,
    command: OrdersCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let currency = context.catalog.currency();

    match command.command {
        OrdersSubcommand::List => {
            let orders = context.orders.list_orders().await?;

            writeln!(out, "{}", orders_table(&orders, currency)?)?;
        }
        OrdersSubcommand::Show(args) => {
            let items = context.orders.list_order_items(args.id).await?;

            writeln!(out, "{}", order_items_table(args.id, &items, currency)?)?;
        }
    }

    Ok(())
}
