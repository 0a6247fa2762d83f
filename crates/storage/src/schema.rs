use rusqlite::Connection;
use trackreg_core::account::columns;

use crate::error::StorageError;
use crate::traits::{Column, TableSchema};

pub const SCHEMA_VERSION: i32 = 1;

/// Declared width of every text column of the account table.
pub const COLUMN_WIDTH: usize = trackreg_core::validate::MAX_FIELD_CHARS;

/// Suffix appended to the configured table prefix.
pub const ACCOUNT_TABLE_SUFFIX: &str = "google_analytics";

/// Connection-level setup plus the options table backing [`crate::SettingsStore`].
/// Account tables are created separately through [`crate::Persistence`].
pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
    ",
    )?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at INTEGER NOT NULL
);
INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, unixepoch());

CREATE TABLE IF NOT EXISTS options (
    name TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

pub fn account_table_name(prefix: &str) -> String {
    format!("{prefix}{ACCOUNT_TABLE_SUFFIX}")
}

pub fn account_table(name: &str) -> TableSchema {
    TableSchema {
        name: name.to_string(),
        columns: vec![
            Column::key(columns::ID),
            Column::text(columns::PORTFOLIO, COLUMN_WIDTH),
            Column::text(columns::EMAIL, COLUMN_WIDTH),
            Column::text(columns::ANALYTICS_ID, COLUMN_WIDTH),
        ],
        unique: vec![columns::ANALYTICS_ID.to_string()],
    }
}
