use trackreg_core::{AccountId, AnalyticsIdFormat, Field, RejectionKind};
use trackreg_engine::{RegistryConfig, SettingsForm, Submission, SubmissionOutcome};
use trackreg_harness::TestSite;
use trackreg_storage::{Listing, ResolvedId, SettingsStore};

// ============================================================================
// Submissions
// ============================================================================

#[test]
fn valid_submission_is_stored_and_buffer_cleared() -> Result<(), Box<dyn std::error::Error>> {
    let mut site = TestSite::new()?;
    let outcome = site.submit(SettingsForm::new_account("Acme", "ops@acme.io", "UA-12345-1"))?;

    let id = match outcome {
        SubmissionOutcome::Inserted(id) => id,
        other => panic!("expected insert, got {other:?}"),
    };
    assert!(site.registry.pending().is_empty());
    assert!(site.registry.notices().is_empty());

    let listing = site.registry.accounts()?;
    assert_eq!(listing.accounts().len(), 1);
    assert_eq!(listing.accounts()[0].id, id);
    assert_eq!(listing.accounts()[0].portfolio, "Acme");

    // The cleared buffer is persisted, so the next request does not insert again.
    let site = site.reload()?;
    assert!(site.registry.pending().is_empty());
    assert_eq!(site.registry.accounts()?.accounts().len(), 1);
    Ok(())
}

#[test]
fn invalid_email_keeps_submission() -> Result<(), Box<dyn std::error::Error>> {
    let mut site = TestSite::new()?;
    let outcome = site.submit(SettingsForm::new_account("Acme", "bad", "UA-1-1"))?;

    match outcome {
        SubmissionOutcome::Rejected(rejected) => {
            assert_eq!(rejected.len(), 1);
            assert_eq!(rejected[0].field, Field::Email);
            assert_eq!(rejected[0].kind, RejectionKind::InvalidFormat);
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    assert_eq!(site.registry.accounts()?, Listing::NoAccounts);
    assert_eq!(
        site.registry.pending(),
        &Submission {
            portfolio: "Acme".into(),
            email: "bad".into(),
            analytics_id: "UA-1-1".into(),
        }
    );

    let notices: Vec<_> = site.registry.notices_for(Field::Email).collect();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].setting, "add_email");
    assert_eq!(
        notices[0].message,
        "Google Analytics: The email address you entered was invalid, valid email addresses should be in the format 'someone@somewhere.com'"
    );

    // Still pending on the next request, still rejected, still not inserted.
    let site = site.reload()?;
    assert_eq!(site.registry.pending().email, "bad");
    assert_eq!(site.registry.notices_for(Field::Email).count(), 1);
    assert_eq!(site.registry.accounts()?, Listing::NoAccounts);
    Ok(())
}

#[test]
fn correcting_the_field_completes_the_submission() -> Result<(), Box<dyn std::error::Error>> {
    let mut site = TestSite::new()?;
    site.submit(SettingsForm::new_account("Acme", "bad", "UA-1-1"))?;

    let outcome = site.submit(SettingsForm {
        add_email: Some("ops@acme.io".into()),
        ..SettingsForm::default()
    })?;
    assert!(matches!(outcome, SubmissionOutcome::Inserted(_)));
    assert!(site.registry.pending().is_empty());
    assert!(site.registry.notices().is_empty());
    Ok(())
}

#[test]
fn duplicate_analytics_id_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut site = TestSite::new()?;
    site.add_account("Acme", "ops@acme.io", "UA-12345-1")?;

    let outcome = site.submit(SettingsForm::new_account("Globex", "it@globex.com", "UA-12345-1"))?;
    match outcome {
        SubmissionOutcome::Rejected(rejected) => {
            assert_eq!(rejected[0].kind, RejectionKind::DuplicateId);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    let notices: Vec<_> = site.registry.notices_for(Field::AnalyticsId).collect();
    assert_eq!(notices[0].message, "Google Analytics: ID already exists");
    assert_eq!(site.registry.accounts()?.accounts().len(), 1);
    Ok(())
}

#[test]
fn invalid_analytics_id_message() -> Result<(), Box<dyn std::error::Error>> {
    let mut site = TestSite::new()?;
    site.submit(SettingsForm::new_account("Acme", "ops@acme.io", "GA-123"))?;
    let notices: Vec<_> = site.registry.notices_for(Field::AnalyticsId).collect();
    assert_eq!(
        notices[0].message,
        "Google Analytics: The analytics ID you entered was invalid, valid IDs should be in the format 'UA-XXXXXXXXXX'"
    );
    Ok(())
}

#[test]
fn over_wide_analytics_id_is_rejected_not_cut() -> Result<(), Box<dyn std::error::Error>> {
    let mut site = TestSite::new()?;
    let analytics_id = format!("UA-{}-77", "1".repeat(44));
    let outcome = site.submit(SettingsForm::new_account("Acme", "ops@acme.io", analytics_id.as_str()))?;

    match outcome {
        SubmissionOutcome::Rejected(rejected) => {
            assert_eq!(rejected[0].field, Field::AnalyticsId);
            assert_eq!(rejected[0].kind, RejectionKind::InvalidFormat);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(site.registry.notices_for(Field::AnalyticsId).count(), 1);
    assert_eq!(site.registry.accounts()?, Listing::NoAccounts);
    assert_eq!(site.registry.pending().analytics_id, analytics_id);
    Ok(())
}

#[test]
fn legacy_format_accepts_loose_ids() -> Result<(), Box<dyn std::error::Error>> {
    let mut site = TestSite::with_config(RegistryConfig {
        analytics_id_format: AnalyticsIdFormat::LegacyPrefix,
        ..RegistryConfig::default()
    })?;
    site.add_account("Acme", "ops@acme.io", "UA-ABCDEF")?;
    assert_eq!(site.registry.accounts()?.accounts()[0].analytics_id, "UA-ABCDEF");
    Ok(())
}

#[test]
fn section_title_prefixes_messages() -> Result<(), Box<dyn std::error::Error>> {
    let mut site = TestSite::with_config(RegistryConfig {
        section_title: "Site Tracking".into(),
        ..RegistryConfig::default()
    })?;
    site.submit(SettingsForm::new_account("Acme", "nope", "UA-1-1"))?;
    assert!(site.registry.notices()[0].message.starts_with("Site Tracking: The email address"));
    Ok(())
}

// ============================================================================
// Current selection
// ============================================================================

#[test]
fn default_selection_does_not_write_setting() -> Result<(), Box<dyn std::error::Error>> {
    let mut site = TestSite::new()?;
    let id = site.add_account("Acme", "ops@acme.io", "UA-1-1")?;
    assert_eq!(id.get(), 1);

    let selection = site.registry.resolve_current()?;
    assert_eq!(selection.stored, None);
    assert_eq!(selection.selected, Some(id));
    assert_eq!(site.registry.current_id(), None);

    let storage = site.registry.into_storage();
    assert!(
        storage
            .get_option("current_account_id")?
            .filter(|v| !v.is_empty())
            .is_none()
    );
    Ok(())
}

#[test]
fn explicit_selection_persists() -> Result<(), Box<dyn std::error::Error>> {
    let mut site = TestSite::new()?;
    site.add_account("Acme", "ops@acme.io", "UA-1-1")?;
    let second = site.add_account("Globex", "it@globex.com", "UA-2-1")?;

    site.registry.select_current(second)?;
    let site = site.reload()?;
    assert_eq!(site.registry.current_id(), Some(second));
    let selection = site.registry.resolve_current()?;
    assert_eq!(selection.stored, Some(second));
    assert_eq!(selection.selected, Some(second));
    assert_eq!(
        site.registry.current_analytics_id()?,
        ResolvedId::Found("UA-2-1".into())
    );
    Ok(())
}

#[test]
fn dangling_selection_is_unresolved() -> Result<(), Box<dyn std::error::Error>> {
    let mut site = TestSite::new()?;
    site.add_account("Acme", "ops@acme.io", "UA-1-1")?;
    site.registry.select_current(AccountId::new(99)?)?;

    let resolved = site.registry.current_analytics_id()?;
    assert_eq!(resolved, ResolvedId::Unresolved);
    assert_eq!(resolved.as_str(), "Error");
    Ok(())
}

#[test]
fn selection_and_submission_in_one_form() -> Result<(), Box<dyn std::error::Error>> {
    let mut site = TestSite::new()?;
    let first = site.add_account("Acme", "ops@acme.io", "UA-1-1")?;

    let outcome = site.submit(SettingsForm {
        current_account_id: Some(first.to_string()),
        ..SettingsForm::new_account("Globex", "it@globex.com", "UA-2-1")
    })?;
    assert!(matches!(outcome, SubmissionOutcome::Inserted(_)));
    assert_eq!(site.registry.current_id(), Some(first));
    assert_eq!(site.registry.accounts()?.accounts().len(), 2);
    Ok(())
}
