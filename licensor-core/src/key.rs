//! Asymmetric key material and its standard encodings.
//!
//! Private keys encode as PKCS#8 DER, public keys as X.509
//! SubjectPublicKeyInfo DER. The algorithm is fixed to Ed25519, whose
//! ~128-bit security level meets or exceeds 2048-bit RSA.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{LicenseError, LicenseResult};

/// Size of a detached signature in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// The key algorithms this crate can generate and decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    /// Ed25519 (RFC 8032).
    #[default]
    Ed25519,
}

impl KeyAlgorithm {
    /// Canonical algorithm name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ed25519 => "Ed25519",
        }
    }

    /// Approximate security level in bits.
    #[must_use]
    pub const fn security_bits(&self) -> u32 {
        match self {
            Self::Ed25519 => 128,
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyAlgorithm {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(Self::Ed25519.name()) {
            Ok(Self::Ed25519)
        } else {
            Err(LicenseError::AlgorithmUnsupported(s.to_string()))
        }
    }
}

/// The secret half of a key pair. Zeroized on drop.
#[derive(Clone)]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
    /// Encodes the key as PKCS#8 DER.
    pub fn to_pkcs8_der(&self) -> LicenseResult<Zeroizing<Vec<u8>>> {
        let document = self
            .0
            .to_pkcs8_der()
            .map_err(|e| LicenseError::InappropriateKeySpec(e.to_string()))?;
        Ok(Zeroizing::new(document.as_bytes().to_vec()))
    }

    /// Decodes a PKCS#8 DER private key.
    pub fn from_pkcs8_der(der: &[u8]) -> LicenseResult<Self> {
        SigningKey::from_pkcs8_der(der)
            .map(Self)
            .map_err(|e| {
                LicenseError::InappropriateKeySpec(format!("not an Ed25519 PKCS#8 key: {e}"))
            })
    }

    /// Returns the matching public key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.verifying_key())
    }

    /// Produces a detached signature over `message`.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_SIZE] {
        self.0.sign(message).to_bytes()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &KeyAlgorithm::Ed25519)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// The public half of a key pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Encodes the key as X.509 SubjectPublicKeyInfo DER.
    pub fn to_spki_der(&self) -> LicenseResult<Vec<u8>> {
        self.0
            .to_public_key_der()
            .map(|document| document.as_bytes().to_vec())
            .map_err(|e| LicenseError::InappropriateKeySpec(e.to_string()))
    }

    /// Decodes an X.509 SubjectPublicKeyInfo DER public key.
    pub fn from_spki_der(der: &[u8]) -> LicenseResult<Self> {
        VerifyingKey::from_public_key_der(der)
            .map(Self)
            .map_err(|e| {
                LicenseError::InappropriateKeySpec(format!("not an Ed25519 SPKI key: {e}"))
            })
    }

    /// Verifies a detached signature over `message`.
    ///
    /// # Errors
    ///
    /// [`LicenseError::SignatureInvalid`] if the signature is malformed or
    /// does not match.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> LicenseResult<()> {
        let signature =
            Signature::from_slice(signature).map_err(|_| LicenseError::SignatureInvalid)?;
        self.0
            .verify(message, &signature)
            .map_err(|_| LicenseError::SignatureInvalid)
    }

    /// A short stable identifier: base64 of the first 16 bytes of the
    /// SHA-256 of the raw public key.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let hash = Sha256::digest(self.0.as_bytes());
        BASE64.encode(&hash[..16])
    }
}

/// A matched private/public key pair.
#[derive(Debug, Clone)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl KeyPair {
    pub(crate) fn generate_ed25519() -> Self {
        let signing = SigningKey::generate(&mut rand::rngs::OsRng);
        Self::from_private(PrivateKey(signing))
    }

    /// Builds the pair from its private half.
    #[must_use]
    pub fn from_private(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
        }
    }

    /// Pairs two halves, checking that they match.
    ///
    /// # Errors
    ///
    /// [`LicenseError::InappropriateKeySpec`] if `public_key` does not
    /// belong to `private_key`.
    pub fn from_parts(private_key: PrivateKey, public_key: PublicKey) -> LicenseResult<Self> {
        if private_key.public_key() != public_key {
            return Err(LicenseError::InappropriateKeySpec(
                "public key does not belong to private key".to_string(),
            ));
        }
        Ok(Self {
            private_key,
            public_key,
        })
    }

    #[must_use]
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    #[must_use]
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    #[must_use]
    pub fn algorithm(&self) -> KeyAlgorithm {
        KeyAlgorithm::Ed25519
    }
}
