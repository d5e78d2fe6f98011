//! Error types for the encryption layer.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key derivation failed.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Authentication tag did not verify (wrong password or tampered data).
    #[error("bad password or tampered data")]
    BadPassword,

    /// The blob is structurally unusable (truncated, unknown version, bad header).
    #[error("corrupt blob: {0}")]
    Corrupt(String),

    /// A password was required but none was given.
    #[error("password must not be empty")]
    EmptyPassword,
}
