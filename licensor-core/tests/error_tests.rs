use chrono::{TimeZone, Utc};
use licensor_core::{InvalidLicense, LicenseError};
use licensor_crypto::CryptoError;

#[test]
fn algorithm_unsupported_names_algorithm() {
    let err = LicenseError::AlgorithmUnsupported("RSA".into());
    assert!(err.to_string().contains("RSA"));
}

#[test]
fn malformed_carries_detail() {
    let err = LicenseError::Malformed("truncated".into());
    let msg = err.to_string();
    assert!(msg.contains("malformed"));
    assert!(msg.contains("truncated"));
}

#[test]
fn type_mismatch_names_both_types() {
    let err = LicenseError::TypeMismatch {
        expected: "License",
        found: "Feature",
    };
    let msg = err.to_string();
    assert!(msg.contains("License"));
    assert!(msg.contains("Feature"));
}

#[test]
fn empty_password_maps_to_invalid_argument() {
    let err: LicenseError = CryptoError::EmptyPassword.into();
    assert!(matches!(err, LicenseError::InvalidArgument(_)));
}

#[test]
fn other_crypto_errors_map_to_inappropriate_key() {
    let err: LicenseError = CryptoError::BadPassword.into();
    assert!(matches!(err, LicenseError::InappropriateKey(CryptoError::BadPassword)));

    let err: LicenseError = CryptoError::Corrupt("short".into()).into();
    assert!(matches!(err, LicenseError::InappropriateKey(CryptoError::Corrupt(_))));
}

#[test]
fn inappropriate_key_exposes_source() {
    use std::error::Error;
    let err: LicenseError = CryptoError::BadPassword.into();
    assert!(err.source().is_some());
}

#[test]
fn invalid_license_is_transparent() {
    let when = Utc.with_ymd_and_hms(2030, 12, 31, 0, 0, 0).unwrap();
    let invalid = InvalidLicense::Expired {
        description: "Pro license for Ada".into(),
        good_before: when,
    };
    let err: LicenseError = invalid.clone().into();

    assert!(err.is_invalid_license());
    assert_eq!(err.to_string(), invalid.to_string());
    assert_eq!(err.to_string(), "the Pro license for Ada expired on 2030-12-31T00:00:00Z");
}

#[test]
fn not_yet_valid_message() {
    let when = Utc.with_ymd_and_hms(2025, 1, 15, 12, 30, 0).unwrap();
    let invalid = InvalidLicense::NotYetValid {
        description: "Pro license for Ada".into(),
        good_after: when,
    };
    assert_eq!(
        invalid.to_string(),
        "the Pro license for Ada does not take effect until 2025-01-15T12:30:00Z"
    );
    assert_eq!(invalid.description(), "Pro license for Ada");
}

#[test]
fn only_validation_failures_are_invalid_license() {
    assert!(!LicenseError::SignatureInvalid.is_invalid_license());
    assert!(!LicenseError::KeyNotFound("x".into()).is_invalid_license());
}
