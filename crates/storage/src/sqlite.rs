use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension};
use trackreg_core::{FieldValue, Row};

use crate::error::StorageError;
use crate::traits::{ColumnType, Persistence, Query, SettingsStore, TableSchema};

/// Quote a table or column name. Only ASCII alphanumerics and `_` are accepted,
/// so names coming from configuration can never reshape a statement.
fn ident(name: &str) -> Result<String, StorageError> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StorageError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("\"{name}\""))
}

fn to_sql(value: &FieldValue) -> rusqlite::types::Value {
    match value {
        FieldValue::Null => rusqlite::types::Value::Null,
        FieldValue::Text(s) => rusqlite::types::Value::Text(s.clone()),
        FieldValue::Integer(n) => rusqlite::types::Value::Integer(*n),
    }
}

fn from_sql(column: &str, value: ValueRef<'_>) -> Result<FieldValue, StorageError> {
    match value {
        ValueRef::Null => Ok(FieldValue::Null),
        ValueRef::Integer(n) => Ok(FieldValue::Integer(n)),
        ValueRef::Text(bytes) => Ok(FieldValue::Text(String::from_utf8_lossy(bytes).into_owned())),
        ValueRef::Real(_) | ValueRef::Blob(_) => Err(StorageError::UnsupportedValue {
            column: column.to_string(),
        }),
    }
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        tracing::debug!(path, "opened sqlite storage");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl Persistence for SqliteStorage {
    fn create_table_if_absent(&mut self, schema: &TableSchema) -> Result<(), StorageError> {
        let table = ident(&schema.name)?;
        let mut defs = Vec::with_capacity(schema.columns.len());
        for column in &schema.columns {
            let name = ident(&column.name)?;
            defs.push(match column.ty {
                ColumnType::Key => format!("{name} INTEGER PRIMARY KEY AUTOINCREMENT"),
                // SQLite ignores declared widths; the record store truncates.
                ColumnType::Text { width } => format!("{name} VARCHAR({width}) NULL"),
            });
        }

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} ({})",
            defs.join(", ")
        ))?;
        for column in &schema.unique {
            let index = ident(&format!("{}_{}_unique", schema.name, column))?;
            tx.execute_batch(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {index} ON {table} ({})",
                ident(column)?
            ))?;
        }
        tx.commit()?;
        tracing::debug!(table = %schema.name, "ensured table");
        Ok(())
    }

    fn table_exists(&self, table: &str) -> Result<bool, StorageError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            rusqlite::params![table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn query(&self, query: &Query) -> Result<Vec<Row>, StorageError> {
        let columns = if query.columns.is_empty() {
            "*".to_string()
        } else {
            query
                .columns
                .iter()
                .map(|c| ident(c))
                .collect::<Result<Vec<_>, _>>()?
                .join(", ")
        };
        let mut sql = format!("SELECT {columns} FROM {}", ident(&query.table)?);
        let mut params = Vec::new();
        if let Some((column, value)) = &query.filter {
            sql.push_str(&format!(" WHERE {} = ?1", ident(column)?));
            params.push(to_sql(value));
        }
        if let Some(column) = &query.order_by {
            sql.push_str(&format!(" ORDER BY {} ASC", ident(column)?));
        }
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;

        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let mut out = Row::new();
            for (i, name) in names.iter().enumerate() {
                out.insert(name.clone(), from_sql(name, row.get_ref(i)?)?);
            }
            result.push(out);
        }
        Ok(result)
    }

    fn insert_row(&mut self, table: &str, fields: &[(&str, FieldValue)]) -> Result<i64, StorageError> {
        let names = fields
            .iter()
            .map(|(name, _)| ident(name))
            .collect::<Result<Vec<_>, _>>()?;
        let placeholders: Vec<String> = (1..=fields.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            ident(table)?,
            names.join(", "),
            placeholders.join(", ")
        );
        let values: Vec<rusqlite::types::Value> = fields.iter().map(|(_, v)| to_sql(v)).collect();

        match self.conn.execute(&sql, rusqlite::params_from_iter(values.iter())) {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(err, msg))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::ConstraintViolation(
                    msg.unwrap_or_else(|| err.to_string()),
                ))
            }
            Err(e) => Err(StorageError::Sqlite(e)),
        }
    }
}

impl SettingsStore for SqliteStorage {
    fn get_option(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM options WHERE name = ?1",
                rusqlite::params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_option(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO options (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }
}
