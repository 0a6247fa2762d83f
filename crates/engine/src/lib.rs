pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod render;
pub mod submission;

pub use config::{ConfigError, RegistryConfig};
pub use error::EngineError;
pub use identity::{Anonymous, IdentityProvider, SignedIn};
pub use submission::{FieldNotice, SettingsForm, Submission, SubmissionOutcome};

use trackreg_core::render_snippet;
use trackreg_core::validate::{validate_analytics_id_with, validate_email, validate_portfolio};
use trackreg_core::{Account, AccountId, Field, Rejected, RejectionKind};
use trackreg_storage::{
    Listing, Persistence, RecordStore, ResolvedId, SettingsStore, SqliteStorage, StorageError,
};

use crate::render::{AccountsState, NO_ACCOUNT_COMMENT, SettingsView};
use crate::submission::CURRENT_ACCOUNT_KEY;

/// Settings-error key for failures that belong to the whole section.
pub const SECTION_NOTICE_KEY: &str = "google-analytics";

/// The account selected for the radio list, next to what is actually stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentSelection {
    /// Value of the `current_account_id` setting.
    pub stored: Option<AccountId>,
    /// `stored`, or the first listed account when nothing is stored.
    pub selected: Option<AccountId>,
}

/// Account registry for one process or request scope.
///
/// Opening a registry ensures the account table, loads the current selection
/// and the pending submission from the settings store, and processes that
/// submission. A registry whose table cannot be verified keeps working in a
/// degraded mode that behaves as if no accounts existed.
pub struct Registry<S = SqliteStorage> {
    store: RecordStore<S>,
    config: RegistryConfig,
    current: Option<AccountId>,
    pending: Submission,
    notices: Vec<FieldNotice>,
    schema_ready: bool,
}

impl<S: Persistence + SettingsStore> Registry<S> {
    pub fn open(storage: S, config: RegistryConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let mut store = RecordStore::new(storage, config.table_name()).with_limit(config.list_limit);

        let schema_ready = match store.ensure_schema() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(table = %store.table(), error = %e, "account table unavailable, running degraded");
                false
            }
        };

        let current = store
            .provider()
            .get_option(CURRENT_ACCOUNT_KEY)?
            .as_deref()
            .and_then(AccountId::from_setting);
        let pending = Submission::load(store.provider())?;

        let mut registry = Self {
            store,
            config,
            current,
            pending,
            notices: Vec::new(),
            schema_ready,
        };
        registry.process_pending()?;
        Ok(registry)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn into_storage(self) -> S {
        self.store.into_provider()
    }

    pub fn is_degraded(&self) -> bool {
        !self.schema_ready
    }

    /// The stored selection, without the first-account default.
    pub fn current_id(&self) -> Option<AccountId> {
        self.current
    }

    pub fn pending(&self) -> &Submission {
        &self.pending
    }

    pub fn notices(&self) -> &[FieldNotice] {
        &self.notices
    }

    pub fn notices_for(&self, field: Field) -> impl Iterator<Item = &FieldNotice> {
        self.notices
            .iter()
            .filter(move |notice| notice.setting == field.setting_key())
    }

    // ========================================================================
    // Submissions
    // ========================================================================

    /// Apply a posted settings form: store the selection and the raw new-account
    /// fields, then process the pending submission.
    pub fn submit(&mut self, form: SettingsForm) -> Result<SubmissionOutcome, EngineError> {
        if let Some(raw) = form.current_account_id.as_deref() {
            let id = AccountId::from_setting(raw);
            let stored = id.map(|id| id.to_string()).unwrap_or_default();
            self.store
                .provider_mut()
                .set_option(CURRENT_ACCOUNT_KEY, &stored)?;
            self.current = id;
            tracing::info!(current = ?id, "current account selection saved");
        }

        let mut touched = false;
        for (field, value) in [
            (Field::Portfolio, form.add_portfolio),
            (Field::Email, form.add_email),
            (Field::AnalyticsId, form.add_gaid),
        ] {
            if let Some(value) = value {
                match field {
                    Field::Portfolio => self.pending.portfolio = value,
                    Field::Email => self.pending.email = value,
                    Field::AnalyticsId => self.pending.analytics_id = value,
                }
                touched = true;
            }
        }
        if touched {
            self.pending.save(self.store.provider_mut())?;
        }

        self.process_pending()
    }

    /// Select the current account. The id is not checked against the table; a
    /// dangling selection renders the unresolved marker.
    pub fn select_current(&mut self, id: AccountId) -> Result<(), EngineError> {
        self.submit(SettingsForm::select(id))?;
        Ok(())
    }

    /// Validate and insert the pending submission when all three fields are set.
    ///
    /// Rejections and store failures leave the pending fields untouched and are
    /// reported through [`Registry::notices`]. Only a failure to clear the
    /// pending fields after a successful insert is returned as an error.
    pub fn process_pending(&mut self) -> Result<SubmissionOutcome, EngineError> {
        self.notices.clear();

        if !self.pending.is_complete() {
            return Ok(SubmissionOutcome::Idle);
        }
        if !self.schema_ready {
            tracing::warn!("pending account kept, account table unavailable");
            return Ok(SubmissionOutcome::Unavailable);
        }

        let existing = match self.store.analytics_ids() {
            Ok(ids) => ids,
            Err(e) => return Ok(self.store_failed(e)),
        };
        let rejected: Vec<Rejected> = [
            validate_portfolio(&self.pending.portfolio).err(),
            validate_email(&self.pending.email).err(),
            validate_analytics_id_with(
                &self.pending.analytics_id,
                &existing,
                self.config.analytics_id_format,
            )
            .err(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if !rejected.is_empty() {
            self.reject(&rejected);
            return Ok(SubmissionOutcome::Rejected(rejected));
        }

        match self.store.insert_account(&self.pending.to_draft()) {
            Ok(id) => {
                self.pending = Submission::default();
                self.pending.save(self.store.provider_mut())?;
                Ok(SubmissionOutcome::Inserted(id))
            }
            Err(StorageError::DuplicateAnalyticsId(_)) => {
                let rejected = vec![Rejected::new(Field::AnalyticsId, RejectionKind::DuplicateId)];
                self.reject(&rejected);
                Ok(SubmissionOutcome::Rejected(rejected))
            }
            Err(e) => Ok(self.store_failed(e)),
        }
    }

    fn reject(&mut self, rejected: &[Rejected]) {
        for rejection in rejected {
            tracing::warn!(field = %rejection.field, kind = ?rejection.kind, "submission rejected");
            if let Some(notice) = FieldNotice::from_rejection(rejection, &self.config.section_title) {
                self.notices.push(notice);
            }
        }
    }

    fn store_failed(&mut self, error: StorageError) -> SubmissionOutcome {
        tracing::error!(error = %error, "failed to store account");
        self.notices.push(FieldNotice {
            setting: SECTION_NOTICE_KEY,
            message: format!("{}: The account could not be saved", self.config.section_title),
        });
        SubmissionOutcome::StoreFailed(error.to_string())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn accounts(&self) -> Result<Listing, EngineError> {
        if !self.schema_ready {
            return Ok(Listing::NoAccounts);
        }
        Ok(self.store.list_accounts()?)
    }

    pub fn account(&self, id: AccountId) -> Result<Account, EngineError> {
        if !self.schema_ready {
            return Err(EngineError::AccountNotFound(id.to_string()));
        }
        self.store
            .find_account(id)?
            .ok_or_else(|| EngineError::AccountNotFound(id.to_string()))
    }

    /// Resolve the selection for the radio list. Never writes the setting.
    pub fn resolve_current(&self) -> Result<CurrentSelection, EngineError> {
        let selected = match self.current {
            Some(id) => Some(id),
            None => self.accounts()?.first().map(|account| account.id),
        };
        Ok(CurrentSelection {
            stored: self.current,
            selected,
        })
    }

    /// Analytics id of the stored selection, or unresolved when nothing is
    /// selected or the selection points at no account.
    pub fn current_analytics_id(&self) -> Result<ResolvedId, EngineError> {
        match self.current {
            Some(id) if self.schema_ready => Ok(self.store.find_account_by_id(id)?),
            _ => Ok(ResolvedId::Unresolved),
        }
    }

    // ========================================================================
    // Rendering (never fails)
    // ========================================================================

    pub fn tracking_output(&self, identity: &impl IdentityProvider) -> String {
        let mut out = String::new();
        if self.current.is_none() {
            out.push_str(NO_ACCOUNT_COMMENT);
            out.push('\n');
        }

        let resolved = self.current_analytics_id().unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to resolve current account");
            ResolvedId::Unresolved
        });
        if let (Some(id), ResolvedId::Unresolved) = (self.current, &resolved) {
            tracing::warn!(%id, "current account does not resolve");
        }

        let email = identity.current_user_email();
        out.push_str(&render_snippet(resolved.as_str(), email.as_deref()));
        out
    }

    pub fn settings_section(&self) -> String {
        let listing = self.accounts();
        let (accounts, selected) = match &listing {
            Ok(Listing::Accounts(accounts)) => (
                AccountsState::Listed(accounts),
                self.current.or_else(|| accounts.first().map(|account| account.id)),
            ),
            Ok(Listing::NoAccounts) => (AccountsState::NoAccounts, self.current),
            Err(e) => {
                tracing::error!(error = %e, "failed to list accounts");
                (AccountsState::Failed, self.current)
            }
        };

        render::settings_section(&SettingsView {
            title: &self.config.section_title,
            accounts,
            selected,
            pending: &self.pending,
            notices: &self.notices,
        })
    }
}
