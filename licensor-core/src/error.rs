//! Error types for the licensing core.

use chrono::{DateTime, Utc};
use licensor_crypto::CryptoError;
use thiserror::Error;

use crate::feature::format_instant;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The requested key algorithm or strength is not available.
    #[error("key algorithm not supported: {0}")]
    AlgorithmUnsupported(String),

    /// Key material could not be recovered (wrong password, corrupted blob).
    #[error("inappropriate key: {0}")]
    InappropriateKey(#[source] CryptoError),

    /// Decrypted bytes are not a valid key encoding for the expected algorithm.
    #[error("inappropriate key specification: {0}")]
    InappropriateKeySpec(String),

    /// A required parameter was missing or empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The license is outside its validity window.
    #[error(transparent)]
    Invalid(#[from] InvalidLicense),

    /// A detached signature did not verify.
    #[error("signature verification failed")]
    SignatureInvalid,

    /// A value could not be written to the binary format.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Bytes could not be read as the binary format.
    #[error("malformed license data: {0}")]
    Malformed(String),

    /// Well-formed bytes that hold a different entity type than requested.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A key or password provider had nothing to supply.
    #[error("key not found: {0}")]
    KeyNotFound(String),
}

impl LicenseError {
    /// Returns true for temporal validation failures of either kind.
    #[must_use]
    pub fn is_invalid_license(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

impl From<CryptoError> for LicenseError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::EmptyPassword => {
                Self::InvalidArgument("password cannot be empty".to_string())
            }
            other => Self::InappropriateKey(other),
        }
    }
}

/// A license rejected by validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidLicense {
    /// The current time is before the license's `good_after` instant.
    #[error("the {description} does not take effect until {}", format_instant(.good_after))]
    NotYetValid {
        description: String,
        good_after: DateTime<Utc>,
    },

    /// The current time is after the license's `good_before` instant.
    #[error("the {description} expired on {}", format_instant(.good_before))]
    Expired {
        description: String,
        good_before: DateTime<Utc>,
    },
}

impl InvalidLicense {
    /// The "<subject> license for <holder>" text the failure names.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::NotYetValid { description, .. } | Self::Expired { description, .. } => {
                description
            }
        }
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
