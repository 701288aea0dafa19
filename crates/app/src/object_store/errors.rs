//! Object store errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("failed to access database file")]
    Io(#[from] std::io::Error),

    #[error("failed to encode or decode record")]
    Serde(#[from] serde_json::Error),

    #[error("database file belongs to '{found}', expected '{expected}'")]
    NameMismatch { expected: String, found: String },

    #[error("database version must be greater than zero")]
    InvalidVersion,

    #[error("requested version {requested} is lower than stored version {stored}")]
    VersionDowngrade { stored: u32, requested: u32 },

    #[error("object store '{0}' not found")]
    StoreNotFound(String),

    #[error("object store '{0}' already exists")]
    StoreExists(String),

    #[error("object store '{0}' is not in the transaction scope")]
    NotInScope(String),

    #[error("records in object store '{0}' must be objects")]
    NotAnObject(String),

    #[error("key {key} already exists in object store '{store}'")]
    KeyExists { store: String, key: i64 },

    #[error("invalid key in object store '{0}'")]
    InvalidKey(String),

    #[error("key generator for object store '{0}' is exhausted")]
    KeyGeneratorExhausted(String),
}
