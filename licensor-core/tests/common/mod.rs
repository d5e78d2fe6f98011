//! Shared test helpers for licensing tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use licensor_core::{Feature, KeyCodec, KeyPairService, License};
use licensor_crypto::{Argon2Cipher, KdfParams};

/// Installs a test-writer subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A key codec with cheap Argon2 parameters.
pub fn fast_codec() -> KeyCodec {
    KeyCodec::new(Argon2Cipher::new(KdfParams::insecure_fast()))
}

/// A key pair service with cheap Argon2 parameters.
pub fn fast_service() -> KeyPairService {
    KeyPairService::new(fast_codec())
}

/// Midnight UTC on the given date.
pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// The instant the "beta" feature of [`sample_license`] stops being granted.
pub fn beta_cutoff() -> DateTime<Utc> {
    day(2031, 3, 15)
}

/// `export` (5 seats, never expires) and `beta` (1 seat, until [`beta_cutoff`]).
pub fn sample_features() -> Vec<Feature> {
    vec![
        Feature::of("export").seats(5).build(),
        Feature::of("beta").seats(1).good_before(beta_cutoff()).build(),
    ]
}

/// A fully populated license valid through 2030.
pub fn sample_license() -> License {
    License::builder()
        .product_key("5565-1039-AF89-GGX7")
        .holder("Ada Lovelace")
        .issuer("Analytical Engines Ltd")
        .subject("Engine Designer Pro")
        .issue_date(day(2025, 1, 10))
        .good_after(day(2025, 1, 15))
        .good_before(day(2030, 12, 31))
        .seats(10)
        .features(sample_features())
        .build()
}
