pub mod account;
pub mod error;
pub mod escape;
pub mod field_value;
pub mod ids;
pub mod snippet;
pub mod validate;

pub use account::{Account, AccountDraft};
pub use error::CoreError;
pub use field_value::{FieldValue, Row};
pub use ids::AccountId;
pub use snippet::render_snippet;
pub use validate::{AnalyticsIdFormat, Field, Rejected, RejectionKind};
