mod common;

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use common::{beta_cutoff, day, sample_license};
use licensor_core::{Feature, License};
use pretty_assertions::assert_eq;

// ── Builder defaults ─────────────────────────────────────────────

#[test]
fn builder_defaults() {
    let before = Utc::now();
    let license = License::builder().build();
    let after = Utc::now();

    assert_eq!(license.product_key(), "");
    assert_eq!(license.holder(), "");
    assert_eq!(license.issuer(), "");
    assert_eq!(license.subject(), "");
    assert!(license.issue_date() >= before && license.issue_date() <= after);
    assert_eq!(license.good_after(), DateTime::<Utc>::MIN_UTC);
    assert_eq!(license.good_before(), DateTime::<Utc>::MAX_UTC);
    assert_eq!(license.seats(), u32::MAX);
    assert!(license.features().is_empty());
}

#[test]
fn accessors_return_built_values() {
    let license = sample_license();
    assert_eq!(license.product_key(), "5565-1039-AF89-GGX7");
    assert_eq!(license.holder(), "Ada Lovelace");
    assert_eq!(license.issuer(), "Analytical Engines Ltd");
    assert_eq!(license.subject(), "Engine Designer Pro");
    assert_eq!(license.issue_date(), day(2025, 1, 10));
    assert_eq!(license.good_after(), day(2025, 1, 15));
    assert_eq!(license.good_before(), day(2030, 12, 31));
    assert_eq!(license.seats(), 10);
    assert_eq!(license.features().len(), 2);
}

#[test]
fn inverted_window_is_representable() {
    let license = License::builder()
        .good_after(day(2030, 1, 1))
        .good_before(day(2020, 1, 1))
        .build();
    assert!(license.good_after() > license.good_before());
}

// ── Feature set ──────────────────────────────────────────────────

#[test]
fn value_equal_features_are_deduplicated() {
    let license = License::builder()
        .feature(Feature::of("export").seats(5).build())
        .feature(Feature::of("export").seats(5).build())
        .feature_named("print")
        .feature_named("print")
        .build();
    assert_eq!(license.features().len(), 2);
}

#[test]
fn same_name_different_fields_kept_distinct() {
    let license = License::builder()
        .feature(Feature::of("beta").seats(1).build())
        .feature(Feature::of("beta").seats(1).good_before(day(2030, 1, 1)).build())
        .feature(Feature::of("beta").seats(2).build())
        .build();
    assert_eq!(license.features().len(), 3);
}

#[test]
fn insertion_order_preserved() {
    let license = License::builder()
        .feature_named("zeta")
        .feature_named("alpha")
        .feature_named("mid")
        .feature_named("alpha")
        .build();
    let names: Vec<&str> = license.features().iter().map(Feature::name).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn clone_is_independent_and_equal() {
    let original = sample_license();
    let copy = original.clone();
    assert_eq!(copy, original);
    drop(original);
    assert_eq!(copy.features().len(), 2);
}

// ── Equality / hash ──────────────────────────────────────────────

#[test]
fn equality_ignores_feature_order() {
    let issued = day(2025, 1, 1);
    let a = License::builder()
        .issue_date(issued)
        .feature_named("one")
        .feature_named("two")
        .build();
    let b = License::builder()
        .issue_date(issued)
        .feature_named("two")
        .feature_named("one")
        .build();
    assert_eq!(a, b);

    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn every_field_participates_in_equality() {
    let base = sample_license();
    let rebuild = || {
        License::builder()
            .product_key(base.product_key())
            .holder(base.holder())
            .issuer(base.issuer())
            .subject(base.subject())
            .issue_date(base.issue_date())
            .good_after(base.good_after())
            .good_before(base.good_before())
            .seats(base.seats())
            .features(base.features().to_vec())
    };
    assert_eq!(rebuild().build(), base);
    assert_ne!(rebuild().product_key("other").build(), base);
    assert_ne!(rebuild().holder("other").build(), base);
    assert_ne!(rebuild().issuer("other").build(), base);
    assert_ne!(rebuild().subject("other").build(), base);
    assert_ne!(rebuild().issue_date(day(2000, 1, 1)).build(), base);
    assert_ne!(rebuild().good_after(day(2000, 1, 1)).build(), base);
    assert_ne!(rebuild().good_before(day(2000, 1, 1)).build(), base);
    assert_ne!(rebuild().seats(11).build(), base);
    assert_ne!(rebuild().feature_named("extra").build(), base);
}

// ── Entitlements ─────────────────────────────────────────────────

#[test]
fn export_is_always_entitled() {
    let license = sample_license();
    assert!(license.has_entitlement("export"));
    assert!(license.has_entitlement_at("export", day(1970, 1, 1)));
    assert!(license.has_entitlement_at("export", day(9000, 1, 1)));
}

#[test]
fn beta_is_entitled_strictly_before_cutoff() {
    let license = sample_license();
    let cutoff = beta_cutoff();
    assert!(license.has_entitlement_at("beta", cutoff - Duration::seconds(1)));
    assert!(!license.has_entitlement_at("beta", cutoff));
    assert!(!license.has_entitlement_at("beta", cutoff + Duration::days(1)));
}

#[test]
fn missing_feature_is_not_entitled() {
    let license = sample_license();
    assert!(!license.has_entitlement("missing"));
    assert!(!License::builder().build().has_entitlement("export"));
}

#[test]
fn entitlement_ignores_license_window() {
    let expired = License::builder()
        .good_before(day(2000, 1, 1))
        .feature_named("export")
        .build();
    assert!(expired.has_entitlement("export"));
}

#[test]
fn entitlement_by_feature_value_compares_name_only() {
    let license = sample_license();
    let probe = Feature::of("export").seats(999).build();
    assert!(license.has_entitlement(&probe));
}

#[test]
fn any_unexpired_feature_with_the_name_grants() {
    let license = License::builder()
        .feature(Feature::of("beta").good_before(day(2000, 1, 1)).build())
        .feature(Feature::of("beta").seats(3).build())
        .build();
    assert!(license.has_entitlement("beta"));
}

#[test]
fn has_any_and_has_all_by_name() {
    let license = sample_license();
    assert!(license.has_any(["missing", "export"]));
    assert!(!license.has_any(["missing", "absent"]));
    assert!(license.has_all(["export"]));
    assert!(!license.has_all(["export", "missing"]));
    assert!(!license.has_any(Vec::<String>::new()));
    assert!(license.has_all(Vec::<String>::new()));
}

#[test]
fn has_any_and_has_all_by_feature() {
    let license = sample_license();
    let export = Feature::new("export");
    let missing = Feature::new("missing");
    assert!(license.has_any([&missing, &export]));
    assert!(!license.has_all([&missing, &export]));
    assert!(license.has_all(&[export]));
}

#[test]
fn has_all_with_owned_strings() {
    let license = sample_license();
    let wanted = vec!["export".to_string()];
    assert!(license.has_all(&wanted));
}

// ── Concurrency ──────────────────────────────────────────────────

#[test]
fn license_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<License>();
    assert_send_sync::<Feature>();

    let license = std::sync::Arc::new(sample_license());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let license = license.clone();
            std::thread::spawn(move || license.has_entitlement("export"))
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
