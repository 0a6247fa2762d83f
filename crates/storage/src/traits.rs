use trackreg_core::{FieldValue, Row};

use crate::error::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Auto-incrementing integer primary key.
    Key,
    /// Text column. `width` is the declared maximum length in characters.
    Text { width: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

impl Column {
    pub fn key(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ColumnType::Key,
        }
    }

    pub fn text(name: &str, width: usize) -> Self {
        Self {
            name: name.to_string(),
            ty: ColumnType::Text { width },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
    /// Columns carrying a single-column unique index.
    pub unique: Vec<String>,
}

/// A single-table read: optional equality filter, ordering and row cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub table: String,
    /// Empty selects every column.
    pub columns: Vec<String>,
    pub filter: Option<(String, FieldValue)>,
    pub order_by: Option<String>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn table(name: &str) -> Self {
        Self {
            table: name.to_string(),
            columns: Vec::new(),
            filter: None,
            order_by: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn filter_eq(mut self, column: &str, value: impl Into<FieldValue>) -> Self {
        self.filter = Some((column.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by = Some(column.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// The relational capabilities the record store needs from its host.
pub trait Persistence {
    fn create_table_if_absent(&mut self, schema: &TableSchema) -> Result<(), StorageError>;

    fn table_exists(&self, table: &str) -> Result<bool, StorageError>;

    fn query(&self, query: &Query) -> Result<Vec<Row>, StorageError>;

    /// Insert one row and return the id the backend assigned to it.
    fn insert_row(&mut self, table: &str, fields: &[(&str, FieldValue)]) -> Result<i64, StorageError>;
}

/// The host's persistent key-value options.
pub trait SettingsStore {
    fn get_option(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_option(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}
