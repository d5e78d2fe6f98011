//! Temporal validation of a license's `[good_after, good_before]` window.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{InvalidLicense, LicenseResult};
use crate::license::License;

/// Checks whether a license is currently usable.
pub trait LicenseValidator: Send + Sync {
    /// Returns `Ok(())` if the license passes, or the reason it does not.
    fn validate(&self, license: &License) -> LicenseResult<()>;
}

/// Validates against the wall clock, read afresh on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLicenseValidator;

impl LicenseValidator for DefaultLicenseValidator {
    fn validate(&self, license: &License) -> LicenseResult<()> {
        validate_at(license, Utc::now())
    }
}

/// Validates `license` as of `now`.
///
/// Both window bounds are inclusive: the license passes at exactly
/// `good_after` and at exactly `good_before`.
///
/// # Errors
///
/// [`InvalidLicense::NotYetValid`] if `now` is before `good_after`,
/// otherwise [`InvalidLicense::Expired`] if `now` is after `good_before`.
pub fn validate_at(license: &License, now: DateTime<Utc>) -> LicenseResult<()> {
    if now < license.good_after() {
        debug!(good_after = %license.good_after(), "license not yet valid");
        return Err(InvalidLicense::NotYetValid {
            description: license.description(),
            good_after: license.good_after(),
        }
        .into());
    }

    if now > license.good_before() {
        debug!(good_before = %license.good_before(), "license expired");
        return Err(InvalidLicense::Expired {
            description: license.description(),
            good_before: license.good_before(),
        }
        .into());
    }

    Ok(())
}
