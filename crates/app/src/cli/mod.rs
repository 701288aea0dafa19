use std::io;

use arturia::cart::CartError;
use clap::{Parser, Subcommand};
use thiserror::Error;
use tokio::io::BufReader;

use arturia_app::{
    checkout::CheckoutError,
    config::AppConfig,
    context::{AppContext, AppInitError},
    domain::orders::OrdersServiceError,
    observability::{ObservabilityError, init_subscriber},
    render::RenderError,
    session::SessionError,
};

mod catalog;
mod checkout;
mod orders;
mod shell;

#[derive(Debug, Parser)]
#[command(name = "arturia", about = "Arturia Store", version, long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the products in the catalog
    Catalog,

    /// Browse saved orders
    Orders(orders::OrdersCommand),

    /// Buy products by code; repeat a code to buy more than one unit
    Checkout(checkout::CheckoutArgs),

    /// Start the interactive shell (default)
    Shell,
}

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Init(#[from] AppInitError),

    #[error(transparent)]
    Observability(#[from] ObservabilityError),

    #[error("failed to write output")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to read orders")]
    Orders(#[from] OrdersServiceError),

    #[error("checkout failed")]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("unknown product code '{0}'")]
    UnknownProduct(String),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), CliError> {
        init_subscriber(&self.config.logging)?;

        let context = AppContext::init(&self.config.storage).await?;
        let mut out = io::stdout().lock();

        match self.command.unwrap_or(Commands::Shell) {
            Commands::Catalog => catalog::run(&context, &mut out),
            Commands::Orders(command) => orders::run(&context, command, &mut out).await,
            Commands::Checkout(args) => checkout::run(&context, args, &mut out).await,
            Commands::Shell => {
                shell::run(context, BufReader::new(tokio::io::stdin()), &mut out).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use arturia_app::{
        config::{LogFormat, StorageBackend},
        domain::orders::models::OrderId,
    };
    use testresult::TestResult;

    use super::*;

    #[test]
    fn no_subcommand_means_shell() -> TestResult {
        let cli = Cli::try_parse_from(["arturia"])?;

        assert!(cli.command.is_none());

        Ok(())
    }

    #[test]
    fn parses_checkout_codes_and_global_flags() -> TestResult {
        let cli = Cli::try_parse_from([
            "arturia",
            "checkout",
            "P001",
            "P002",
            "P002",
            "--storage",
            "object-store",
            "--data-dir",
            "/tmp/store",
            "--log-format",
            "json",
        ])?;

        assert_eq!(cli.config.storage.storage, StorageBackend::ObjectStore);
        assert_eq!(cli.config.storage.data_dir.to_str(), Some("/tmp/store"));
        assert_eq!(cli.config.logging.log_format, LogFormat::Json);
        assert!(matches!(
            cli.command,
            Some(Commands::Checkout(args)) if args.codes == ["P001", "P002", "P002"]
        ));

        Ok(())
    }

    #[test]
    fn parses_orders_show() -> TestResult {
        let cli = Cli::try_parse_from(["arturia", "orders", "show", "42"])?;

        assert!(matches!(
            cli.command,
            Some(Commands::Orders(orders::OrdersCommand {
                command: orders::OrdersSubcommand::Show(args)
            })) if args.id == OrderId::new(42)
        ));

        Ok(())
    }

    #[test]
    fn checkout_requires_a_code() {
        assert!(Cli::try_parse_from(["arturia", "checkout"]).is_err());
    }
}
