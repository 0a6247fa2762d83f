use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unexpected cell type for column {column}: expected {expected}")]
    CellType {
        column: String,
        expected: &'static str,
    },

    #[error("missing column: {0}")]
    MissingColumn(String),
}
