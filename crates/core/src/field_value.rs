use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A single cell exchanged with a persistence provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

/// A result row keyed by column name.
pub type Row = BTreeMap<String, FieldValue>;

/// Fetch a required text column from a row.
pub fn text_column(row: &Row, column: &str) -> Result<String, CoreError> {
    match row.get(column) {
        Some(FieldValue::Text(s)) => Ok(s.clone()),
        // A NULL text column reads as the empty string.
        Some(FieldValue::Null) => Ok(String::new()),
        Some(_) => Err(CoreError::CellType {
            column: column.to_string(),
            expected: "text",
        }),
        None => Err(CoreError::MissingColumn(column.to_string())),
    }
}

/// Fetch a required integer column from a row.
pub fn integer_column(row: &Row, column: &str) -> Result<i64, CoreError> {
    match row.get(column) {
        Some(FieldValue::Integer(n)) => Ok(*n),
        Some(_) => Err(CoreError::CellType {
            column: column.to_string(),
            expected: "integer",
        }),
        None => Err(CoreError::MissingColumn(column.to_string())),
    }
}
