//! Shell Session
//!
//! State behind the interactive shell: the current page, the cart and the latest notice.

use std::io::{self, Write};

use arturia::cart::Cart;
use thiserror::Error;
use tokio::time::Instant;

use crate::{
    checkout::{CheckoutError, checkout},
    context::AppContext,
    domain::orders::{OrdersServiceError, models::OrderId},
    render::{RenderError, cart_sidebar, catalog_table, order_items_table, orders_table},
};

pub mod command;
pub mod notice;

pub use command::{Command, CommandError, HELP};
pub use notice::{NOTICE_TTL, Notice, NoticeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Catalog,
    Orders,
    Order(OrderId),
    Info,
}

impl Page {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Orders | Self::Order(_) => "orders",
            Self::Info => "info",
        }
    }
}

/// Whether the shell should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to write output")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to load orders")]
    Orders(#[from] OrdersServiceError),
}

pub struct Session {
    context: AppContext,
    cart: Cart,
    page: Page,
    notice: Option<Notice>,
}

impl Session {
    #[must_use]
    pub fn new(context: AppContext) -> Self {
        Self {
            cart: Cart::new(context.catalog.currency()),
            context,
            page: Page::Catalog,
            notice: None,
        }
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    #[must_use]
    pub fn prompt(&self) -> String {
        match self.cart.units() {
            0 => format!("arturia:{}> ", self.page.name()),
            units => format!("arturia:{} [{units}]> ", self.page.name()),
        }
    }

    /// Drop the notice once it has been visible for [`NOTICE_TTL`].
    pub fn expire_notice(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|notice| notice.is_expired(now)) {
            self.notice = None;
        }
    }

    /// Run one command, writing its output to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if output cannot be written or rendered, or orders cannot be read.
    pub async fn handle(
        &mut self,
        command: Command,
        out: &mut impl Write,
    ) -> Result<Flow, SessionError> {
        self.expire_notice(Instant::now());

        match command {
            Command::Catalog => {
                self.page = Page::Catalog;

                writeln!(out, "{}", catalog_table(&self.context.catalog))?;
            }
            Command::Orders => {
                self.page = Page::Orders;

                let orders = self.context.orders.list_orders().await?;

                writeln!(
                    out,
                    "{}",
                    orders_table(&orders, self.context.catalog.currency())?
                )?;
            }
            Command::Info => {
                self.page = Page::Info;

                writeln!(out, "{}", self.info())?;
            }
            Command::Add(code) => self.add(&code, out)?,
            Command::Remove(code) => {
                if self.cart.remove(&code).is_none() {
                    writeln!(out, "{code} is not in the cart.")?;
                }

                self.show_cart(out)?;
            }
            Command::Clear => {
                self.cart.clear();
                self.show_cart(out)?;
            }
            Command::Cart => self.show_cart(out)?,
            Command::Checkout => self.checkout(out).await?,
            Command::Open(order) => {
                self.page = Page::Order(order);

                let items = self.context.orders.list_order_items(order).await?;

                writeln!(
                    out,
                    "{}",
                    order_items_table(order, &items, self.context.catalog.currency())?
                )?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn add(&mut self, code: &str, out: &mut impl Write) -> Result<(), SessionError> {
        let catalog = &self.context.catalog;

        let Some(product) = catalog
            .get(code)
            .or_else(|| catalog.get(&code.to_ascii_uppercase()))
        else {
            writeln!(out, "Unknown product code '{code}'.")?;

            return Ok(());
        };

        if let Err(error) = self.cart.add(product) {
            writeln!(out, "Cannot add {code}: {error}")?;
        }

        self.show_cart(out)
    }

    async fn checkout(&mut self, out: &mut impl Write) -> Result<(), SessionError> {
        match checkout(&mut self.cart, self.context.orders.as_ref()).await {
            Ok(order) => self.notice = Some(Notice::order_created(order, Instant::now())),
            Err(CheckoutError::EmptyCart) => {
                writeln!(out, "Your cart is empty. Add products before checking out.")?;
            }
            Err(_) => self.notice = Some(Notice::order_failed(Instant::now())),
        }

        self.show_cart(out)
    }

    fn show_cart(&self, out: &mut impl Write) -> Result<(), SessionError> {
        writeln!(out, "{}", cart_sidebar(&self.cart, self.notice.as_ref())?)?;

        Ok(())
    }

    fn info(&self) -> String {
        format!(
            "Arturia Store v{}\n\
             Browse the catalog, fill your cart and check out. \
             Orders are kept on this device ({} storage).\n\
             The catalog has {} products priced in {}.",
            env!("CARGO_PKG_VERSION"),
            self.context.storage.label(),
            self.context.catalog.len(),
            self.context.catalog.currency().iso_alpha_code,
        )
    }
}
