//! Shared error mapping for sqlx persistence layer

use application::StoreError;

/// Map a sqlx error to the store port's error
pub fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        other => StoreError::backend(other),
    }
}
