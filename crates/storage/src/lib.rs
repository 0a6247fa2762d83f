pub mod error;
pub mod records;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use error::StorageError;
pub use records::{Listing, RecordStore, ResolvedId};
pub use sqlite::SqliteStorage;
pub use traits::*;
