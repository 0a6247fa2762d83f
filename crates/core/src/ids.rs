use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Store-assigned row id of an account. Always positive once persisted.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(i64);

impl AccountId {
    pub fn new(raw: i64) -> Result<Self, CoreError> {
        if raw <= 0 {
            return Err(CoreError::InvalidData(format!("account id must be positive, got {raw}")));
        }
        Ok(Self(raw))
    }

    /// Integer-cast a settings value the way the settings form does: anything
    /// that is not a positive integer means "no selection".
    pub fn from_setting(value: &str) -> Option<Self> {
        value.trim().parse::<i64>().ok().and_then(|raw| Self::new(raw).ok())
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|e| CoreError::InvalidData(format!("invalid account id {s:?}: {e}")))?;
        Self::new(raw)
    }
}
