use std::fmt;

use trackreg_core::account::columns;
use trackreg_core::snippet::UNRESOLVED;
use trackreg_core::{Account, AccountDraft, AccountId, FieldValue};

use crate::error::StorageError;
use crate::schema::{COLUMN_WIDTH, account_table};
use crate::traits::{Persistence, Query};

pub const DEFAULT_LIST_LIMIT: usize = 1000;

/// Result of listing accounts. An empty table is an expected state, not a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    NoAccounts,
    /// Never empty, ascending by id.
    Accounts(Vec<Account>),
}

impl Listing {
    pub fn accounts(&self) -> &[Account] {
        match self {
            Self::NoAccounts => &[],
            Self::Accounts(accounts) => accounts,
        }
    }

    pub fn first(&self) -> Option<&Account> {
        self.accounts().first()
    }
}

/// Analytics id looked up for the current account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedId {
    Found(String),
    Unresolved,
}

impl ResolvedId {
    /// The id, or the `Error` marker when nothing matched.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Found(id) => id,
            Self::Unresolved => UNRESOLVED,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl fmt::Display for ResolvedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn truncate(value: &str, width: usize) -> &str {
    match value.char_indices().nth(width) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

pub struct RecordStore<P> {
    provider: P,
    table: String,
    limit: usize,
}

impl<P: Persistence> RecordStore<P> {
    pub fn new(provider: P, table: impl Into<String>) -> Self {
        Self {
            provider,
            table: table.into(),
            limit: DEFAULT_LIST_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn into_provider(self) -> P {
        self.provider
    }

    /// Create the account table when missing and confirm it is there.
    pub fn ensure_schema(&mut self) -> Result<(), StorageError> {
        let schema = account_table(&self.table);
        self.provider.create_table_if_absent(&schema)?;
        if !self.provider.table_exists(&self.table)? {
            return Err(StorageError::Schema(format!(
                "couldn't create the account table {}",
                self.table
            )));
        }
        Ok(())
    }

    pub fn list_accounts(&self) -> Result<Listing, StorageError> {
        let rows = self.provider.query(
            &Query::table(&self.table)
                .order_by(columns::ID)
                .limit(self.limit),
        )?;
        if rows.is_empty() {
            return Ok(Listing::NoAccounts);
        }
        let accounts = rows
            .iter()
            .map(Account::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Listing::Accounts(accounts))
    }

    /// Append a row and return its id. Calling twice with different analytics
    /// ids creates two accounts; a repeated analytics id hits the unique index.
    ///
    /// The portfolio label is cut to the column width. Email and analytics id
    /// are stored exactly or not at all.
    pub fn insert_account(&mut self, draft: &AccountDraft) -> Result<AccountId, StorageError> {
        let analytics_id = draft.analytics_id.as_str();
        for (column, value) in [
            (columns::EMAIL, &draft.email),
            (columns::ANALYTICS_ID, &draft.analytics_id),
        ] {
            if value.chars().count() > COLUMN_WIDTH {
                return Err(StorageError::UnsupportedValue {
                    column: column.to_string(),
                });
            }
        }
        let fields = [
            (columns::PORTFOLIO, FieldValue::from(truncate(&draft.portfolio, COLUMN_WIDTH))),
            (columns::EMAIL, FieldValue::from(draft.email.as_str())),
            (columns::ANALYTICS_ID, FieldValue::from(analytics_id)),
        ];
        let raw = match self.provider.insert_row(&self.table, &fields) {
            Ok(raw) => raw,
            Err(StorageError::ConstraintViolation(_)) => {
                return Err(StorageError::DuplicateAnalyticsId(analytics_id.to_string()));
            }
            Err(e) => return Err(e),
        };
        let id = AccountId::new(raw)?;
        tracing::info!(table = %self.table, %id, analytics_id, "inserted account");
        Ok(id)
    }

    pub fn find_account(&self, id: AccountId) -> Result<Option<Account>, StorageError> {
        let rows = self.provider.query(
            &Query::table(&self.table)
                .filter_eq(columns::ID, id.get())
                .limit(1),
        )?;
        rows.first().map(Account::from_row).transpose().map_err(Into::into)
    }

    pub fn find_account_by_id(&self, id: AccountId) -> Result<ResolvedId, StorageError> {
        let rows = self.provider.query(
            &Query::table(&self.table)
                .select(&[columns::ANALYTICS_ID])
                .filter_eq(columns::ID, id.get())
                .limit(1),
        )?;
        let found = rows
            .first()
            .and_then(|row| row.get(columns::ANALYTICS_ID))
            .and_then(|value| value.as_text())
            .filter(|value| !value.is_empty());
        Ok(match found {
            Some(analytics_id) => ResolvedId::Found(analytics_id.to_string()),
            None => ResolvedId::Unresolved,
        })
    }

    /// Every stored analytics id, for the uniqueness check.
    pub fn analytics_ids(&self) -> Result<Vec<String>, StorageError> {
        let rows = self.provider.query(
            &Query::table(&self.table)
                .select(&[columns::ANALYTICS_ID])
                .order_by(columns::ID),
        )?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get(columns::ANALYTICS_ID))
            .filter_map(|value| value.as_text())
            .map(String::from)
            .collect())
    }

    pub fn analytics_id_exists(&self, analytics_id: &str) -> Result<bool, StorageError> {
        let rows = self.provider.query(
            &Query::table(&self.table)
                .select(&[columns::ID])
                .filter_eq(columns::ANALYTICS_ID, analytics_id)
                .limit(1),
        )?;
        Ok(!rows.is_empty())
    }

    pub fn count(&self) -> Result<usize, StorageError> {
        Ok(self
            .provider
            .query(&Query::table(&self.table).select(&[columns::ID]))?
            .len())
    }
}
