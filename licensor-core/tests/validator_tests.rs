mod common;

use std::sync::Arc;
use std::thread;

use chrono::{Duration, Utc};
use common::{day, sample_license};
use licensor_core::{
    validate_at, DefaultLicenseValidator, InvalidLicense, License, LicenseError, LicenseValidator,
};

// ── Window boundaries ────────────────────────────────────────────

#[test]
fn one_second_before_good_after_is_not_yet_valid() {
    common::init_tracing();
    let license = sample_license();
    let err = validate_at(&license, license.good_after() - Duration::seconds(1)).unwrap_err();

    assert!(err.is_invalid_license());
    match err {
        LicenseError::Invalid(InvalidLicense::NotYetValid { good_after, .. }) => {
            assert_eq!(good_after, license.good_after());
        }
        other => panic!("expected NotYetValid, got {other:?}"),
    }
}

#[test]
fn exactly_good_after_passes() {
    let license = sample_license();
    validate_at(&license, license.good_after()).unwrap();
}

#[test]
fn exactly_good_before_passes() {
    let license = sample_license();
    validate_at(&license, license.good_before()).unwrap();
}

#[test]
fn one_second_after_good_before_is_expired() {
    common::init_tracing();
    let license = sample_license();
    let err = validate_at(&license, license.good_before() + Duration::seconds(1)).unwrap_err();

    match err {
        LicenseError::Invalid(InvalidLicense::Expired { good_before, .. }) => {
            assert_eq!(good_before, license.good_before());
        }
        other => panic!("expected Expired, got {other:?}"),
    }
}

#[test]
fn inside_window_passes() {
    validate_at(&sample_license(), day(2027, 6, 1)).unwrap();
}

#[test]
fn default_window_always_passes() {
    let license = License::builder().build();
    DefaultLicenseValidator.validate(&license).unwrap();
    validate_at(&license, day(1900, 1, 1)).unwrap();
    validate_at(&license, day(9999, 12, 31)).unwrap();
}

#[test]
fn inverted_window_is_rejected() {
    let license = License::builder()
        .good_after(day(2030, 1, 1))
        .good_before(day(2020, 1, 1))
        .build();
    assert!(validate_at(&license, day(2010, 1, 1)).is_err());
    assert!(validate_at(&license, day(2025, 1, 1)).is_err());
    assert!(validate_at(&license, day(2040, 1, 1)).is_err());
}

#[test]
fn window_is_independent_of_feature_expiry() {
    let license = License::builder()
        .good_before(day(2000, 1, 1))
        .feature_named("export")
        .build();
    assert!(license.has_entitlement_at("export", day(2001, 1, 1)));
    assert!(validate_at(&license, day(2001, 1, 1)).is_err());
}

// ── Messages ─────────────────────────────────────────────────────

#[test]
fn not_yet_valid_message_names_license_and_instant() {
    let license = sample_license();
    let err = validate_at(&license, day(2025, 1, 1)).unwrap_err();
    let message = err.to_string();

    assert!(message.contains("Engine Designer Pro"), "{message}");
    assert!(message.contains("Ada Lovelace"), "{message}");
    assert!(message.contains("2025-01-15"), "{message}");
}

#[test]
fn expired_message_names_license_and_end_of_window() {
    let license = sample_license();
    let err = validate_at(&license, day(2031, 1, 1)).unwrap_err();
    let message = err.to_string();

    assert!(message.contains("Engine Designer Pro license for Ada Lovelace"), "{message}");
    assert!(message.contains("expired"), "{message}");
    assert!(message.contains("2030-12-31"), "{message}");
    assert!(!message.contains("2025-01-15"), "{message}");
}

#[test]
fn invalid_license_exposes_description() {
    let license = sample_license();
    match validate_at(&license, day(2031, 1, 1)) {
        Err(LicenseError::Invalid(invalid)) => {
            assert_eq!(invalid.description(), "Engine Designer Pro license for Ada Lovelace");
        }
        other => panic!("expected Invalid, got {other:?}"),
    }
}

// ── Wall clock ───────────────────────────────────────────────────

#[test]
fn default_validator_reads_the_clock() {
    let now = Utc::now();
    let current = License::builder()
        .good_after(now - Duration::days(1))
        .good_before(now + Duration::days(1))
        .build();
    let lapsed = License::builder()
        .good_after(now - Duration::days(10))
        .good_before(now - Duration::days(5))
        .build();
    let pending = License::builder()
        .good_after(now + Duration::days(5))
        .build();

    let validator = DefaultLicenseValidator;
    validator.validate(&current).unwrap();
    assert!(matches!(
        validator.validate(&lapsed),
        Err(LicenseError::Invalid(InvalidLicense::Expired { .. }))
    ));
    assert!(matches!(
        validator.validate(&pending),
        Err(LicenseError::Invalid(InvalidLicense::NotYetValid { .. }))
    ));
}

#[test]
fn validator_usable_as_trait_object_across_threads() {
    let validator: Arc<dyn LicenseValidator> = Arc::new(DefaultLicenseValidator);
    let license = Arc::new(License::builder().feature_named("export").build());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let validator = Arc::clone(&validator);
            let license = Arc::clone(&license);
            thread::spawn(move || validator.validate(&license).is_ok())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
