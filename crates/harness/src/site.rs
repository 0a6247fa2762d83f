use trackreg_core::AccountId;
use trackreg_engine::{EngineError, Registry, RegistryConfig, SettingsForm, SubmissionOutcome};
use trackreg_storage::SqliteStorage;

/// A registry over an in-memory database, reopened on demand to simulate the
/// next request against the same storage.
pub struct TestSite {
    pub registry: Registry<SqliteStorage>,
}

impl TestSite {
    pub fn new() -> Result<Self, EngineError> {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Result<Self, EngineError> {
        let storage = SqliteStorage::open_in_memory()?;
        Ok(Self {
            registry: Registry::open(storage, config)?,
        })
    }

    /// Submit a new account through the settings form and expect it stored.
    pub fn add_account(
        &mut self,
        portfolio: &str,
        email: &str,
        analytics_id: &str,
    ) -> Result<AccountId, Box<dyn std::error::Error>> {
        match self
            .registry
            .submit(SettingsForm::new_account(portfolio, email, analytics_id))?
        {
            SubmissionOutcome::Inserted(id) => Ok(id),
            other => Err(format!("account {analytics_id} not inserted: {other:?}").into()),
        }
    }

    pub fn submit(&mut self, form: SettingsForm) -> Result<SubmissionOutcome, EngineError> {
        self.registry.submit(form)
    }

    /// Drop the registry and open a fresh one over the same storage.
    pub fn reload(self) -> Result<Self, EngineError> {
        let config = self.registry.config().clone();
        let storage = self.registry.into_storage();
        Ok(Self {
            registry: Registry::open(storage, config)?,
        })
    }
}
