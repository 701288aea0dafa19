//! Application configuration

use clap::Args;

pub mod logging;
pub mod storage;

pub use logging::{LogFormat, LoggingConfig};
pub use storage::{StorageBackend, StorageConfig};

/// Settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Local storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
