use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::field_value::{Row, integer_column, text_column};
use crate::ids::AccountId;

/// Column names shared by the store and every row decoder.
pub mod columns {
    pub const ID: &str = "id";
    pub const PORTFOLIO: &str = "portfolio";
    pub const EMAIL: &str = "email";
    pub const ANALYTICS_ID: &str = "ga_id";
}

/// A persisted tracking account. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub portfolio: String,
    pub email: String,
    pub analytics_id: String,
}

impl Account {
    pub fn from_row(row: &Row) -> Result<Self, CoreError> {
        Ok(Self {
            id: AccountId::new(integer_column(row, columns::ID)?)?,
            portfolio: text_column(row, columns::PORTFOLIO)?,
            email: text_column(row, columns::EMAIL)?,
            analytics_id: text_column(row, columns::ANALYTICS_ID)?,
        })
    }
}

/// The three validated fields of an account that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub portfolio: String,
    pub email: String,
    pub analytics_id: String,
}

impl AccountDraft {
    pub fn new(
        portfolio: impl Into<String>,
        email: impl Into<String>,
        analytics_id: impl Into<String>,
    ) -> Self {
        Self {
            portfolio: portfolio.into(),
            email: email.into(),
            analytics_id: analytics_id.into(),
        }
    }
}
