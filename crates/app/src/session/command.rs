//! Shell commands

use std::str::FromStr;

use thiserror::Error;

use crate::domain::orders::models::OrderId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Catalog,
    Orders,
    Info,
    Add(String),
    Remove(String),
    Clear,
    Cart,
    Checkout,
    Open(OrderId),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("type a command, or 'help' to list them")]
    Empty,

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid order number '{0}'")]
    InvalidOrderId(String),
}

pub const HELP: &str = "\
Pages:
  catalog          list products
  orders           list saved orders
  info             about this store

Cart:
  add <code>       add one unit of a product
  remove <code>    remove a product from the cart
  clear            empty the cart
  cart             show the cart
  checkout         buy everything in the cart

Orders:
  open <id>        show the items of an order

  help             show this help
  quit             leave the shell";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();

        let Some(name) = words.next() else {
            return Err(CommandError::Empty);
        };

        let argument = words.next();

        if words.next().is_some() {
            return Err(usage(name));
        }

        let command = match (name.to_ascii_lowercase().as_str(), argument) {
            ("catalog" | "products", None) => Self::Catalog,
            ("orders", None) => Self::Orders,
            ("info" | "about", None) => Self::Info,
            ("add", Some(code)) => Self::Add(code.to_string()),
            ("remove" | "rm", Some(code)) => Self::Remove(code.to_string()),
            ("clear", None) => Self::Clear,
            ("cart", None) => Self::Cart,
            ("checkout" | "buy", None) => Self::Checkout,
            ("open", Some(id)) => Self::Open(
                id.parse()
                    .map_err(|_err| CommandError::InvalidOrderId(id.to_string()))?,
            ),
            ("help" | "?", None) => Self::Help,
            ("quit" | "exit" | "q", None) => Self::Quit,
            _ => return Err(usage(name)),
        };

        Ok(command)
    }
}

fn usage(name: &str) -> CommandError {
    match name.to_ascii_lowercase().as_str() {
        "add" => CommandError::Usage("add <code>"),
        "remove" | "rm" => CommandError::Usage("remove <code>"),
        "open" => CommandError::Usage("open <id>"),
        "catalog" | "products" | "orders" | "info" | "about" | "clear" | "cart" | "checkout"
        | "buy" | "help" | "?" | "quit" | "exit" | "q" => {
            CommandError::Usage("this command takes no arguments")
        }
        _ => CommandError::Unknown(name.to_string()),
    }
}
