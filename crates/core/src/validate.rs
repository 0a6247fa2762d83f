use std::fmt;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"^[a-z0-9]+([_.-][a-z0-9]+)*@([a-z0-9]+([.-][a-z0-9]+)*)+\.[a-z]{2,}$")
        .case_insensitive(true)
        .unicode(false)
        .build()
        .expect("email pattern compiles")
});

static ANALYTICS_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^UA-[0-9]+-[0-9]+$").expect("analytics id pattern compiles"));

/// Widest email or analytics id the account table holds, in characters.
pub const MAX_FIELD_CHARS: usize = 45;

fn too_wide(value: &str) -> bool {
    value.chars().count() > MAX_FIELD_CHARS
}

/// A field of the new-account form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Portfolio,
    Email,
    AnalyticsId,
}

impl Field {
    /// Settings key the field is submitted and buffered under.
    pub fn setting_key(&self) -> &'static str {
        match self {
            Self::Portfolio => "add_portfolio",
            Self::Email => "add_email",
            Self::AnalyticsId => "add_gaid",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.setting_key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    EmptyField,
    InvalidFormat,
    DuplicateId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    pub field: Field,
    pub kind: RejectionKind,
}

impl Rejected {
    pub fn new(field: Field, kind: RejectionKind) -> Self {
        Self { field, kind }
    }

    /// User-visible message, prefixed with the section label. Blank inputs are
    /// rejected silently and have no message, and portfolios have no format.
    pub fn message(&self, label: &str) -> Option<String> {
        let text = match (self.field, self.kind) {
            (_, RejectionKind::EmptyField) | (Field::Portfolio, RejectionKind::InvalidFormat) => {
                return None;
            }
            (Field::Email, RejectionKind::InvalidFormat) => {
                "The email address you entered was invalid, valid email addresses should be in the format 'someone@somewhere.com'"
            }
            (Field::AnalyticsId, RejectionKind::InvalidFormat) => {
                "The analytics ID you entered was invalid, valid IDs should be in the format 'UA-XXXXXXXXXX'"
            }
            (_, RejectionKind::DuplicateId) => "ID already exists",
        };
        Some(format!("{label}: {text}"))
    }
}

/// How strictly analytics ids are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyticsIdFormat {
    /// `UA-<digits>-<digits>`.
    #[default]
    Strict,
    /// Legacy rule: the trimmed value merely contains `UA-`. Accepts ids the
    /// tracking vendor would not, kept only for installations that relied on it.
    LegacyPrefix,
}

impl AnalyticsIdFormat {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Strict => ANALYTICS_ID_PATTERN.is_match(value),
            Self::LegacyPrefix => value.trim().contains("UA-"),
        }
    }
}

pub fn validate_portfolio(value: &str) -> Result<&str, Rejected> {
    if value.is_empty() {
        return Err(Rejected::new(Field::Portfolio, RejectionKind::EmptyField));
    }
    Ok(value)
}

pub fn validate_email(value: &str) -> Result<&str, Rejected> {
    if value.is_empty() {
        return Err(Rejected::new(Field::Email, RejectionKind::EmptyField));
    }
    if too_wide(value) || !EMAIL_PATTERN.is_match(value) {
        return Err(Rejected::new(Field::Email, RejectionKind::InvalidFormat));
    }
    Ok(value)
}

/// Checks shape with the strict rule, then uniqueness against `existing`.
pub fn validate_analytics_id<'a>(value: &'a str, existing: &[String]) -> Result<&'a str, Rejected> {
    validate_analytics_id_with(value, existing, AnalyticsIdFormat::Strict)
}

pub fn validate_analytics_id_with<'a>(
    value: &'a str,
    existing: &[String],
    format: AnalyticsIdFormat,
) -> Result<&'a str, Rejected> {
    if value.is_empty() {
        return Err(Rejected::new(Field::AnalyticsId, RejectionKind::EmptyField));
    }
    if too_wide(value) || !format.matches(value) {
        return Err(Rejected::new(Field::AnalyticsId, RejectionKind::InvalidFormat));
    }
    if existing.iter().any(|id| id == value) {
        return Err(Rejected::new(Field::AnalyticsId, RejectionKind::DuplicateId));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_rejected_everywhere() {
        assert_eq!(
            validate_portfolio("").unwrap_err().kind,
            RejectionKind::EmptyField
        );
        assert_eq!(validate_email("").unwrap_err().kind, RejectionKind::EmptyField);
        assert_eq!(
            validate_analytics_id("", &[]).unwrap_err().kind,
            RejectionKind::EmptyField
        );
        assert_eq!(
            validate_analytics_id_with("", &[], AnalyticsIdFormat::LegacyPrefix)
                .unwrap_err()
                .kind,
            RejectionKind::EmptyField
        );
    }

    #[test]
    fn portfolio_is_returned_untouched() {
        assert_eq!(validate_portfolio("  Acme  ").unwrap(), "  Acme  ");
    }

    #[test]
    fn email_shapes() {
        assert_eq!(validate_email("a@b.com").unwrap(), "a@b.com");
        assert!(validate_email("First.Last-x_y@Mail.Example.ORG").is_ok());
        assert!(validate_email("ops@sub-domain.acme.io").is_ok());

        for bad in ["not-an-email", "a@b", "a@b.c", "a..b@c.com", ".a@b.com", "a@b.c0m", "a b@c.com"] {
            let rejected = validate_email(bad).unwrap_err();
            assert_eq!(rejected.field, Field::Email, "{bad}");
            assert_eq!(rejected.kind, RejectionKind::InvalidFormat, "{bad}");
        }
    }

    #[test]
    fn analytics_id_shapes() {
        assert_eq!(validate_analytics_id("UA-12345-1", &[]).unwrap(), "UA-12345-1");
        for bad in ["GA-123", "UA-12345", "ua-1-1", "UA-1-1 ", "UA-x-1", "G-ABC123"] {
            assert_eq!(
                validate_analytics_id(bad, &[]).unwrap_err().kind,
                RejectionKind::InvalidFormat,
                "{bad}"
            );
        }
    }

    #[test]
    fn duplicate_analytics_id() {
        let existing = vec!["UA-12345-1".to_string()];
        let rejected = validate_analytics_id("UA-12345-1", &existing).unwrap_err();
        assert_eq!(rejected.kind, RejectionKind::DuplicateId);
        assert!(validate_analytics_id("UA-12345-2", &existing).is_ok());
    }

    #[test]
    fn legacy_prefix_rule_is_looser() {
        let legacy = AnalyticsIdFormat::LegacyPrefix;
        assert!(validate_analytics_id_with(" UA-abc ", &[], legacy).is_ok());
        assert!(validate_analytics_id_with("xUA-1", &[], legacy).is_ok());
        assert_eq!(
            validate_analytics_id_with("GA-123", &[], legacy).unwrap_err().kind,
            RejectionKind::InvalidFormat
        );
    }

    #[test]
    fn messages_match_admin_wording() {
        let email = Rejected::new(Field::Email, RejectionKind::InvalidFormat);
        assert_eq!(
            email.message("Google Analytics").unwrap(),
            "Google Analytics: The email address you entered was invalid, valid email addresses should be in the format 'someone@somewhere.com'"
        );

        let id = Rejected::new(Field::AnalyticsId, RejectionKind::InvalidFormat);
        assert_eq!(
            id.message("Google Analytics").unwrap(),
            "Google Analytics: The analytics ID you entered was invalid, valid IDs should be in the format 'UA-XXXXXXXXXX'"
        );

        let dup = Rejected::new(Field::AnalyticsId, RejectionKind::DuplicateId);
        assert_eq!(dup.message("Tracking").unwrap(), "Tracking: ID already exists");

        assert!(
            Rejected::new(Field::Portfolio, RejectionKind::EmptyField)
                .message("Google Analytics")
                .is_none()
        );
        assert!(
            Rejected::new(Field::Portfolio, RejectionKind::InvalidFormat)
                .message("Google Analytics")
                .is_none()
        );
    }

    #[test]
    fn email_letters_are_ascii_only() {
        assert!(validate_email("a@b.co\u{212A}").is_err());
        assert!(validate_email("\u{017F}@b.com").is_err());
        assert!(validate_email("a@b.CoK").is_ok());
    }

    #[test]
    fn values_wider_than_the_column_are_rejected() {
        let id = format!("UA-{}-77", "1".repeat(44));
        assert!(ANALYTICS_ID_PATTERN.is_match(&id));
        assert_eq!(
            validate_analytics_id(&id, &[]).unwrap_err().kind,
            RejectionKind::InvalidFormat
        );

        let widest = format!("UA-{}-7", "1".repeat(MAX_FIELD_CHARS - 5));
        assert_eq!(widest.chars().count(), MAX_FIELD_CHARS);
        assert!(validate_analytics_id(&widest, &[]).is_ok());

        let email = format!("{}@acme.io", "a".repeat(40));
        assert_eq!(
            validate_email(&email).unwrap_err().kind,
            RejectionKind::InvalidFormat
        );
    }

    #[test]
    fn setting_keys() {
        assert_eq!(Field::Portfolio.setting_key(), "add_portfolio");
        assert_eq!(Field::Email.to_string(), "add_email");
        assert_eq!(Field::AnalyticsId.setting_key(), "add_gaid");
    }
}
