use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("analytics id already exists: {0}")]
    DuplicateAnalyticsId(String),

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("unsupported value in column {column}")]
    UnsupportedValue { column: String },

    #[error("core error: {0}")]
    Core(#[from] trackreg_core::CoreError),
}
