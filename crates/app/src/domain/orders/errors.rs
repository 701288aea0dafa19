//! Orders service errors.

use std::num::TryFromIntError;

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{database, object_store::ObjectStoreError};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("local storage is unavailable")]
    StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("order already exists")]
    AlreadyExists,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("object store error")]
    ObjectStore(#[source] ObjectStoreError),

    #[error("invalid amount value")]
    InvalidAmount(#[from] TryFromIntError),
}

impl OrdersServiceError {
    /// Whether the local store could not be opened at all.
    #[must_use]
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::ForeignKeyViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<database::DatabaseError> for OrdersServiceError {
    fn from(error: database::DatabaseError) -> Self {
        Self::StorageUnavailable(Box::new(error))
    }
}

impl From<ObjectStoreError> for OrdersServiceError {
    fn from(error: ObjectStoreError) -> Self {
        match error {
            ObjectStoreError::KeyExists { .. } => Self::AlreadyExists,
            other => Self::ObjectStore(other),
        }
    }
}
