//! Licensing core for Licensor.
//!
//! This crate handles:
//! - Key pair generation and password-protected key blobs
//! - The immutable [`License`] / [`Feature`] entitlement model
//! - Temporal validation of a license's validity window
//! - A versioned, self-describing binary encoding of licenses and keys
//!
//! # Flow
//!
//! An issuer generates a [`KeyPair`] with [`KeyPairService`], seals both
//! halves with passwords, builds a [`License`] and [`encode`]s it. A
//! licensed application decodes the license, runs a [`LicenseValidator`]
//! and then asks [`License::has_entitlement`] for each feature it gates.
//!
//! Entitlement checks look only at each feature's own expiry. The
//! license-level window is the validator's job; run it first.
//!
//! Signing or encrypting the encoded license with the key pair is left
//! to the caller ([`PrivateKey::sign`], [`PublicKey::verify`]).

mod codec;
mod error;
mod feature;
mod key;
mod key_codec;
mod key_pair_service;
mod license;
mod provider;
mod validator;

pub use codec::{
    decode, decode_license, encode, encode_license, Encodable, TypeTag, FORMAT_VERSION, MAGIC,
};
pub use error::{InvalidLicense, LicenseError, LicenseResult};
pub use feature::{Feature, FeatureBuilder, FEATURE_SEPARATOR};
pub use key::{KeyAlgorithm, KeyPair, PrivateKey, PublicKey, SIGNATURE_SIZE};
pub use key_codec::{EncryptedKeyBlob, KeyCodec};
pub use key_pair_service::{EncryptedKeyPair, KeyPairService};
pub use license::{FeatureName, License, LicenseBuilder};
pub use provider::{
    EnvPassword, PasswordProvider, PrivateKeyDataProvider, PublicKeyDataProvider, StaticKeyData,
    StaticPassword,
};
pub use validator::{validate_at, DefaultLicenseValidator, LicenseValidator};
