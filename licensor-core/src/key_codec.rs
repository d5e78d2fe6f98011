//! Password protection of key material at rest.
//!
//! A key blob is the standard DER encoding of a key sealed by a
//! [`PasswordCipher`]. Blobs carry no marker saying which half they hold;
//! callers track that out of band.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use licensor_crypto::{Argon2Cipher, PasswordCipher};
use tracing::debug;

use crate::error::{LicenseError, LicenseResult};
use crate::key::{KeyAlgorithm, PrivateKey, PublicKey};
use crate::provider::{PasswordProvider, PrivateKeyDataProvider, PublicKeyDataProvider};

/// An encrypted, encoded key, suitable for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedKeyBlob(Vec<u8>);

impl EncryptedKeyBlob {
    /// Returns the raw blob bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the blob, returning its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Encodes to base64 for embedding in source or config.
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    /// Decodes from base64.
    pub fn from_base64(encoded: &str) -> LicenseResult<Self> {
        BASE64
            .decode(encoded.trim())
            .map(Self)
            .map_err(|e| LicenseError::InvalidArgument(format!("invalid key blob base64: {e}")))
    }
}

impl From<Vec<u8>> for EncryptedKeyBlob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for EncryptedKeyBlob {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Encrypts and decrypts keys of one fixed algorithm.
#[derive(Debug, Clone, Default)]
pub struct KeyCodec<C = Argon2Cipher> {
    algorithm: KeyAlgorithm,
    cipher: C,
}

impl<C: PasswordCipher> KeyCodec<C> {
    /// A codec for the default algorithm sealing blobs with `cipher`.
    pub fn new(cipher: C) -> Self {
        Self {
            algorithm: KeyAlgorithm::default(),
            cipher,
        }
    }

    /// A codec for the named algorithm.
    ///
    /// # Errors
    ///
    /// [`LicenseError::AlgorithmUnsupported`] naming `algorithm` if it is
    /// not one this crate implements.
    pub fn for_algorithm(algorithm: &str, cipher: C) -> LicenseResult<Self> {
        Ok(Self {
            algorithm: algorithm.parse()?,
            cipher,
        })
    }

    #[must_use]
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// PKCS#8-encodes and encrypts a private key.
    pub fn encrypt_private(
        &self,
        key: &PrivateKey,
        password: &[u8],
    ) -> LicenseResult<EncryptedKeyBlob> {
        require_password(password, "private key password")?;
        let der = key.to_pkcs8_der()?;
        let blob = self.cipher.encrypt(&der, password)?;
        Ok(EncryptedKeyBlob(blob))
    }

    /// SPKI-encodes and encrypts a public key.
    pub fn encrypt_public(
        &self,
        key: &PublicKey,
        password: &[u8],
    ) -> LicenseResult<EncryptedKeyBlob> {
        require_password(password, "public key password")?;
        let der = key.to_spki_der()?;
        let blob = self.cipher.encrypt(&der, password)?;
        Ok(EncryptedKeyBlob(blob))
    }

    /// Decrypts and decodes a private key blob.
    ///
    /// # Errors
    ///
    /// [`LicenseError::InappropriateKey`] for a wrong password or corrupt
    /// blob, [`LicenseError::InappropriateKeySpec`] if the plaintext is not
    /// a PKCS#8 key of this codec's algorithm.
    pub fn decrypt_private(&self, blob: &[u8], password: &[u8]) -> LicenseResult<PrivateKey> {
        require_password(password, "private key password")?;
        let der = self.cipher.decrypt(blob, password).inspect_err(|e| {
            debug!(algorithm = %self.algorithm, error = %e, "private key blob rejected");
        })?;
        PrivateKey::from_pkcs8_der(&der)
    }

    /// Decrypts and decodes a public key blob.
    ///
    /// # Errors
    ///
    /// As [`decrypt_private`](Self::decrypt_private), for SPKI encodings.
    pub fn decrypt_public(&self, blob: &[u8], password: &[u8]) -> LicenseResult<PublicKey> {
        require_password(password, "public key password")?;
        let der = self.cipher.decrypt(blob, password).inspect_err(|e| {
            debug!(algorithm = %self.algorithm, error = %e, "public key blob rejected");
        })?;
        PublicKey::from_spki_der(&der)
    }

    /// Fetches a private key blob and its password from providers and
    /// decrypts it.
    pub fn load_private_key(
        &self,
        data: &dyn PrivateKeyDataProvider,
        password: &dyn PasswordProvider,
    ) -> LicenseResult<PrivateKey> {
        let blob = data.encrypted_private_key_data()?;
        let password = password.password()?;
        self.decrypt_private(&blob, &password)
    }

    /// Fetches a public key blob and its password from providers and
    /// decrypts it.
    pub fn load_public_key(
        &self,
        data: &dyn PublicKeyDataProvider,
        password: &dyn PasswordProvider,
    ) -> LicenseResult<PublicKey> {
        let blob = data.encrypted_public_key_data()?;
        let password = password.password()?;
        self.decrypt_public(&blob, &password)
    }
}

pub(crate) fn require_password(password: &[u8], what: &str) -> LicenseResult<()> {
    if password.is_empty() {
        return Err(LicenseError::InvalidArgument(format!("{what} cannot be empty")));
    }
    Ok(())
}
