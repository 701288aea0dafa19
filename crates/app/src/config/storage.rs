//! Storage Config

use std::path::{Path, PathBuf};

use clap::Args;

use crate::domain::orders::DATABASE_NAME;

/// Where orders are persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StorageBackend {
    /// `SQLite` database file.
    Sqlite,

    /// Embedded object store persisted as JSON.
    ObjectStore,
}

impl StorageBackend {
    /// Database file for this backend inside `data_dir`.
    #[must_use]
    pub fn database_path(self, data_dir: &Path) -> PathBuf {
        let extension = match self {
            Self::Sqlite => "sqlite3",
            Self::ObjectStore => "json",
        };

        data_dir.join(format!("{DATABASE_NAME}.{extension}"))
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Sqlite => "SQLite",
            Self::ObjectStore => "object store",
        }
    }
}

/// Local storage settings.
#[derive(Debug, Clone, Args)]
pub struct StorageConfig {
    /// Storage backend for orders (sqlite, object-store)
    #[arg(
        long,
        env = "ARTURIA_STORAGE",
        value_enum,
        default_value_t = StorageBackend::Sqlite,
        global = true
    )]
    pub storage: StorageBackend,

    /// Directory holding the local database files
    #[arg(long, env = "ARTURIA_DATA_DIR", default_value = ".arturia", global = true)]
    pub data_dir: PathBuf,

    /// Catalog fixture (YAML); the bundled demo catalog when omitted
    #[arg(long, env = "ARTURIA_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,
}

impl StorageConfig {
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage.database_path(&self.data_dir)
    }
}
