//! Named entitlements carried by a license.
//!
//! A [`Feature`] has a canonical one-line text form used for interchange
//! with previously persisted data:
//!
//! ```text
//! <name> 0x1F <seats> 0x1F <ISO-8601 instant>
//! ```
//!
//! An absent expiration is written as an empty third field.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{LicenseError, LicenseResult};

/// Unit separator between the fields of a feature's text form.
pub const FEATURE_SEPARATOR: char = '\u{1F}';

/// An immutable named entitlement with a seat count and optional expiry.
///
/// Equality, hashing and ordering compare `name`, `seats` and
/// `good_before`, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Feature {
    name: String,
    seats: u32,
    good_before: Option<DateTime<Utc>>,
}

impl Feature {
    /// Starts building a feature with the given name.
    #[must_use]
    pub fn of(name: impl Into<String>) -> FeatureBuilder {
        FeatureBuilder {
            name: name.into(),
            seats: 0,
            good_before: None,
        }
    }

    /// A feature with no seat count and no expiry.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::of(name).build()
    }

    /// Parses the canonical text form.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidArgument`] unless the input has exactly
    /// three fields, a numeric seat count and a parseable (or empty) instant.
    pub fn from_string(input: &str) -> LicenseResult<Self> {
        let parts: Vec<&str> = input.split(FEATURE_SEPARATOR).collect();
        if parts.len() != 3 {
            return Err(LicenseError::InvalidArgument(format!(
                "feature text must contain exactly three fields, found {}",
                parts.len()
            )));
        }

        let seats = parts[1].parse::<u32>().map_err(|e| {
            LicenseError::InvalidArgument(format!("invalid feature seats {:?}: {e}", parts[1]))
        })?;

        let good_before = match parts[2] {
            "" => None,
            text => Some(parse_instant(text)?),
        };

        Ok(Self {
            name: parts[0].to_string(),
            seats,
            good_before,
        })
    }

    /// Returns the feature name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the seat count.
    #[must_use]
    pub fn seats(&self) -> u32 {
        self.seats
    }

    /// Returns the instant this feature stops being granted, if any.
    #[must_use]
    pub fn good_before(&self) -> Option<DateTime<Utc>> {
        self.good_before
    }

    /// Returns true if the feature's own expiry has not passed at `now`.
    ///
    /// A feature is current strictly before its `good_before` instant.
    #[must_use]
    pub fn is_current_at(&self, now: DateTime<Utc>) -> bool {
        self.good_before.is_none_or(|good_before| good_before > now)
    }
}

/// Canonical text form; see the module docs.
impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{FEATURE_SEPARATOR}{}{FEATURE_SEPARATOR}",
            self.name, self.seats
        )?;
        match &self.good_before {
            Some(instant) => f.write_str(&format_instant(instant)),
            None => Ok(()),
        }
    }
}

impl FromStr for Feature {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

/// Construction-time staging for a [`Feature`].
#[derive(Debug, Clone)]
#[must_use]
pub struct FeatureBuilder {
    name: String,
    seats: u32,
    good_before: Option<DateTime<Utc>>,
}

impl FeatureBuilder {
    /// Sets the seat count.
    pub fn seats(mut self, seats: u32) -> Self {
        self.seats = seats;
        self
    }

    /// Sets the instant the feature stops being granted.
    pub fn good_before(mut self, good_before: DateTime<Utc>) -> Self {
        self.good_before = Some(good_before);
        self
    }

    /// Materializes the feature.
    pub fn build(self) -> Feature {
        Feature {
            name: self.name,
            seats: self.seats,
            good_before: self.good_before,
        }
    }
}

/// ISO-8601 in UTC. `%Y` carries a sign and extra digits outside 0000-9999.
const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Formats an instant as ISO-8601 in UTC (`2025-01-01T00:00:00Z`).
pub(crate) fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.format(INSTANT_FORMAT).to_string()
}

/// Accepts any RFC 3339 instant, or the extended-year form written by
/// [`format_instant`].
fn parse_instant(text: &str) -> LicenseResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|instant| instant.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(text, INSTANT_FORMAT).map(|n| n.and_utc()))
        .map_err(|e| {
            LicenseError::InvalidArgument(format!("invalid feature instant {text:?}: {e}"))
        })
}
