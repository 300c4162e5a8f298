use thiserror::Error;

/// Storage failures callers need to tell apart
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Map a unique-constraint violation on insert to `DuplicateEmail`
    pub(crate) fn from_insert(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateEmail
            }
            _ => StoreError::Database(err),
        }
    }
}
