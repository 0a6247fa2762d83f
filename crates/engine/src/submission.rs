use trackreg_core::{AccountDraft, AccountId, Field, Rejected};
use trackreg_storage::{SettingsStore, StorageError};

/// Settings key holding the selected account id.
pub const CURRENT_ACCOUNT_KEY: &str = "current_account_id";

/// Raw values posted by the settings form. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default)]
pub struct SettingsForm {
    pub current_account_id: Option<String>,
    pub add_portfolio: Option<String>,
    pub add_email: Option<String>,
    pub add_gaid: Option<String>,
}

impl SettingsForm {
    pub fn new_account(
        portfolio: impl Into<String>,
        email: impl Into<String>,
        analytics_id: impl Into<String>,
    ) -> Self {
        Self {
            add_portfolio: Some(portfolio.into()),
            add_email: Some(email.into()),
            add_gaid: Some(analytics_id.into()),
            ..Self::default()
        }
    }

    pub fn select(id: AccountId) -> Self {
        Self {
            current_account_id: Some(id.to_string()),
            ..Self::default()
        }
    }
}

/// Pending new-account values, staged in the settings store until a
/// successful insert clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub portfolio: String,
    pub email: String,
    pub analytics_id: String,
}

impl Submission {
    pub fn load(settings: &impl SettingsStore) -> Result<Self, StorageError> {
        let read = |field: Field| -> Result<String, StorageError> {
            Ok(settings.get_option(field.setting_key())?.unwrap_or_default())
        };
        Ok(Self {
            portfolio: read(Field::Portfolio)?,
            email: read(Field::Email)?,
            analytics_id: read(Field::AnalyticsId)?,
        })
    }

    pub fn save(&self, settings: &mut impl SettingsStore) -> Result<(), StorageError> {
        for field in [Field::Portfolio, Field::Email, Field::AnalyticsId] {
            settings.set_option(field.setting_key(), self.get(field))?;
        }
        Ok(())
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Portfolio => &self.portfolio,
            Field::Email => &self.email,
            Field::AnalyticsId => &self.analytics_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.portfolio.is_empty() && self.email.is_empty() && self.analytics_id.is_empty()
    }

    /// All three fields are filled in, so the submission should be validated.
    pub fn is_complete(&self) -> bool {
        !self.portfolio.is_empty() && !self.email.is_empty() && !self.analytics_id.is_empty()
    }

    pub fn to_draft(&self) -> AccountDraft {
        AccountDraft::new(&self.portfolio, &self.email, &self.analytics_id)
    }
}

/// A message shown next to a settings field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNotice {
    /// Settings key of the field the message belongs to.
    pub setting: &'static str,
    pub message: String,
}

impl FieldNotice {
    pub fn from_rejection(rejected: &Rejected, label: &str) -> Option<Self> {
        rejected.message(label).map(|message| Self {
            setting: rejected.field.setting_key(),
            message,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Idle,
    Inserted(AccountId),
    /// At least one field failed validation; nothing was stored.
    Rejected(Vec<Rejected>),
    /// Validation passed but the store refused the row.
    StoreFailed(String),
    Unavailable,
}
