use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use trackreg_core::AnalyticsIdFormat;
use trackreg_storage::records::DEFAULT_LIST_LIMIT;
use trackreg_storage::schema::account_table_name;

pub const ENV_TABLE_PREFIX: &str = "TRACKREG_TABLE_PREFIX";
pub const ENV_LIST_LIMIT: &str = "TRACKREG_LIST_LIMIT";
pub const ENV_SECTION_TITLE: &str = "TRACKREG_SECTION_TITLE";
pub const ENV_ID_FORMAT: &str = "TRACKREG_ID_FORMAT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {error}")]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for {field}: {value:?} ({reason})")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Prepended to the account table name.
    pub table_prefix: String,
    /// Maximum number of accounts listed on the settings page.
    pub list_limit: usize,
    /// Section heading, also used as the prefix of every validation message.
    pub section_title: String,
    pub analytics_id_format: AnalyticsIdFormat,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            table_prefix: "wp_".to_string(),
            list_limit: DEFAULT_LIST_LIMIT,
            section_title: "Google Analytics".to_string(),
            analytics_id_format: AnalyticsIdFormat::Strict,
        }
    }
}

impl RegistryConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_toml_str(&source)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `TRACKREG_*` overrides read through `lookup`.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(prefix) = lookup(ENV_TABLE_PREFIX) {
            self.table_prefix = prefix;
        }
        if let Some(limit) = lookup(ENV_LIST_LIMIT) {
            self.list_limit = limit.trim().parse().map_err(|_| ConfigError::InvalidField {
                field: "list_limit",
                value: limit.clone(),
                reason: "not an unsigned integer",
            })?;
        }
        if let Some(title) = lookup(ENV_SECTION_TITLE) {
            self.section_title = title;
        }
        if let Some(format) = lookup(ENV_ID_FORMAT) {
            self.analytics_id_format = match format.trim() {
                "strict" => AnalyticsIdFormat::Strict,
                "legacy-prefix" => AnalyticsIdFormat::LegacyPrefix,
                _ => {
                    return Err(ConfigError::InvalidField {
                        field: "analytics_id_format",
                        value: format,
                        reason: "expected 'strict' or 'legacy-prefix'",
                    });
                }
            };
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.list_limit == 0 {
            return Err(ConfigError::InvalidField {
                field: "list_limit",
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }
        if !self
            .table_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::InvalidField {
                field: "table_prefix",
                value: self.table_prefix.clone(),
                reason: "only ASCII letters, digits and '_' are allowed",
            });
        }
        Ok(())
    }

    pub fn table_name(&self) -> String {
        account_table_name(&self.table_prefix)
    }
}
