//! The license aggregate and its builder.
//!
//! A [`License`] is immutable once built. Entitlement queries look only at
//! each feature's own expiry; the license-level validity window is checked
//! separately by a [`LicenseValidator`](crate::LicenseValidator), and
//! callers are expected to run that first.

use std::collections::HashSet;
use std::hash::{DefaultHasher, Hash, Hasher};

use chrono::{DateTime, Utc};

use crate::feature::Feature;

/// Anything that names a feature: a [`Feature`] value or a raw name.
pub trait FeatureName {
    /// The feature name used for entitlement lookups.
    fn feature_name(&self) -> &str;
}

impl FeatureName for str {
    fn feature_name(&self) -> &str {
        self
    }
}

impl FeatureName for String {
    fn feature_name(&self) -> &str {
        self
    }
}

impl FeatureName for Feature {
    fn feature_name(&self) -> &str {
        self.name()
    }
}

impl<T: FeatureName + ?Sized> FeatureName for &T {
    fn feature_name(&self) -> &str {
        (**self).feature_name()
    }
}

/// An issued grant of usage rights.
///
/// Two licenses are equal when every field matches, with the feature set
/// compared as a set.
#[derive(Debug, Clone)]
pub struct License {
    product_key: String,
    holder: String,
    issuer: String,
    subject: String,
    issue_date: DateTime<Utc>,
    good_after: DateTime<Utc>,
    good_before: DateTime<Utc>,
    seats: u32,
    features: Vec<Feature>,
}

impl License {
    /// Starts building a license with the documented defaults.
    #[must_use]
    pub fn builder() -> LicenseBuilder {
        LicenseBuilder::default()
    }

    #[must_use]
    pub fn product_key(&self) -> &str {
        &self.product_key
    }

    #[must_use]
    pub fn holder(&self) -> &str {
        &self.holder
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn issue_date(&self) -> DateTime<Utc> {
        self.issue_date
    }

    /// The first instant the license is valid.
    #[must_use]
    pub fn good_after(&self) -> DateTime<Utc> {
        self.good_after
    }

    /// The last instant the license is valid.
    #[must_use]
    pub fn good_before(&self) -> DateTime<Utc> {
        self.good_before
    }

    #[must_use]
    pub fn seats(&self) -> u32 {
        self.seats
    }

    /// The granted features in insertion order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Returns true if the license grants `feature` right now.
    ///
    /// Does not consult the license's own validity window.
    #[must_use]
    pub fn has_entitlement<F: FeatureName + ?Sized>(&self, feature: &F) -> bool {
        self.has_entitlement_at(feature, Utc::now())
    }

    /// Returns true if some feature with this name is unexpired at `now`.
    #[must_use]
    pub fn has_entitlement_at<F: FeatureName + ?Sized>(
        &self,
        feature: &F,
        now: DateTime<Utc>,
    ) -> bool {
        let name = feature.feature_name();
        self.features
            .iter()
            .any(|f| f.name() == name && f.is_current_at(now))
    }

    /// Returns true if at least one of `features` is granted right now.
    #[must_use]
    pub fn has_any<I>(&self, features: I) -> bool
    where
        I: IntoIterator,
        I::Item: FeatureName,
    {
        let now = Utc::now();
        features
            .into_iter()
            .any(|f| self.has_entitlement_at(&f, now))
    }

    /// Returns true if every one of `features` is granted right now.
    ///
    /// An empty list is vacuously granted.
    #[must_use]
    pub fn has_all<I>(&self, features: I) -> bool
    where
        I: IntoIterator,
        I::Item: FeatureName,
    {
        let now = Utc::now();
        features
            .into_iter()
            .all(|f| self.has_entitlement_at(&f, now))
    }

    /// "<subject> license for <holder>", used in validation messages.
    pub(crate) fn description(&self) -> String {
        format!("{} license for {}", self.subject, self.holder)
    }
}

impl PartialEq for License {
    fn eq(&self, other: &Self) -> bool {
        self.product_key == other.product_key
            && self.holder == other.holder
            && self.issuer == other.issuer
            && self.subject == other.subject
            && self.issue_date == other.issue_date
            && self.good_after == other.good_after
            && self.good_before == other.good_before
            && self.seats == other.seats
            // Both sides are duplicate-free, so equal length plus
            // containment is set equality.
            && self.features.len() == other.features.len()
            && {
                let theirs: HashSet<&Feature> = other.features.iter().collect();
                self.features.iter().all(|f| theirs.contains(f))
            }
    }
}

impl Eq for License {}

impl Hash for License {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.product_key.hash(state);
        self.holder.hash(state);
        self.issuer.hash(state);
        self.subject.hash(state);
        self.issue_date.hash(state);
        self.good_after.hash(state);
        self.good_before.hash(state);
        self.seats.hash(state);

        // Order-independent so it agrees with set equality.
        let digest = self.features.iter().fold(0u64, |acc, feature| {
            let mut hasher = DefaultHasher::new();
            feature.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });
        state.write_usize(self.features.len());
        state.write_u64(digest);
    }
}

/// Construction-time staging for a [`License`].
///
/// Defaults: empty strings, `issue_date` = now, `good_after` = the
/// minimum instant, `good_before` = the maximum instant, `seats` =
/// `u32::MAX`, no features.
#[derive(Debug, Clone)]
#[must_use]
pub struct LicenseBuilder {
    product_key: String,
    holder: String,
    issuer: String,
    subject: String,
    issue_date: DateTime<Utc>,
    good_after: DateTime<Utc>,
    good_before: DateTime<Utc>,
    seats: u32,
    features: Vec<Feature>,
    seen: HashSet<Feature>,
}

impl Default for LicenseBuilder {
    fn default() -> Self {
        Self {
            product_key: String::new(),
            holder: String::new(),
            issuer: String::new(),
            subject: String::new(),
            issue_date: Utc::now(),
            good_after: DateTime::<Utc>::MIN_UTC,
            good_before: DateTime::<Utc>::MAX_UTC,
            seats: u32::MAX,
            features: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl LicenseBuilder {
    pub fn product_key(mut self, product_key: impl Into<String>) -> Self {
        self.product_key = product_key.into();
        self
    }

    pub fn holder(mut self, holder: impl Into<String>) -> Self {
        self.holder = holder.into();
        self
    }

    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn issue_date(mut self, issue_date: DateTime<Utc>) -> Self {
        self.issue_date = issue_date;
        self
    }

    pub fn good_after(mut self, good_after: DateTime<Utc>) -> Self {
        self.good_after = good_after;
        self
    }

    pub fn good_before(mut self, good_before: DateTime<Utc>) -> Self {
        self.good_before = good_before;
        self
    }

    pub fn seats(mut self, seats: u32) -> Self {
        self.seats = seats;
        self
    }

    /// Adds a feature unless a value-equal one is already present.
    pub fn feature(mut self, feature: Feature) -> Self {
        if self.seen.insert(feature.clone()) {
            self.features.push(feature);
        }
        self
    }

    /// Adds a feature with this name, no seat count and no expiry.
    pub fn feature_named(self, name: impl Into<String>) -> Self {
        self.feature(Feature::new(name))
    }

    /// Adds each feature in order, skipping value-equal duplicates.
    pub fn features(self, features: impl IntoIterator<Item = Feature>) -> Self {
        features.into_iter().fold(self, Self::feature)
    }

    /// Materializes the license. The builder's feature list moves into it.
    pub fn build(self) -> License {
        License {
            product_key: self.product_key,
            holder: self.holder,
            issuer: self.issuer,
            subject: self.subject,
            issue_date: self.issue_date,
            good_after: self.good_after,
            good_before: self.good_before,
            seats: self.seats,
            features: self.features,
        }
    }
}
