//! Key pair generation and at-rest protection for license issuers.

use licensor_crypto::{Argon2Cipher, PasswordCipher};
use tracing::{debug, info};

use crate::error::{LicenseError, LicenseResult};
use crate::key::{KeyAlgorithm, KeyPair};
use crate::key_codec::{require_password, EncryptedKeyBlob, KeyCodec};

/// Both halves of a key pair, each encrypted under its own password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedKeyPair {
    /// Algorithm both blobs were generated for.
    pub algorithm: KeyAlgorithm,
    /// The PKCS#8 private key blob.
    pub private_key: EncryptedKeyBlob,
    /// The SPKI public key blob.
    pub public_key: EncryptedKeyBlob,
}

impl EncryptedKeyPair {
    /// Splits into `(private, public)` blobs.
    #[must_use]
    pub fn into_parts(self) -> (EncryptedKeyBlob, EncryptedKeyBlob) {
        (self.private_key, self.public_key)
    }
}

/// Generates key pairs and seals them for storage.
#[derive(Debug, Clone, Default)]
pub struct KeyPairService<C = Argon2Cipher> {
    codec: KeyCodec<C>,
}

impl<C: PasswordCipher> KeyPairService<C> {
    pub fn new(codec: KeyCodec<C>) -> Self {
        Self { codec }
    }

    /// The codec used for at-rest protection.
    pub fn codec(&self) -> &KeyCodec<C> {
        &self.codec
    }

    /// Generates a fresh key pair of the codec's algorithm.
    ///
    /// # Errors
    ///
    /// [`LicenseError::AlgorithmUnsupported`]
    /// if the algorithm cannot be generated in this build.
    pub fn generate(&self) -> LicenseResult<KeyPair> {
        let key_pair = match self.codec.algorithm() {
            KeyAlgorithm::Ed25519 => KeyPair::generate_ed25519(),
        };
        info!(
            algorithm = %key_pair.algorithm(),
            fingerprint = %key_pair.public_key().fingerprint(),
            "generated key pair"
        );
        Ok(key_pair)
    }

    /// Encrypts the two halves independently; the passwords may differ.
    ///
    /// # Errors
    ///
    /// [`LicenseError::InvalidArgument`]
    /// if either password is empty.
    pub fn save(
        &self,
        key_pair: &KeyPair,
        private_password: &[u8],
        public_password: &[u8],
    ) -> LicenseResult<EncryptedKeyPair> {
        require_password(private_password, "private key password")?;
        require_password(public_password, "public key password")?;

        let private_key = self
            .codec
            .encrypt_private(key_pair.private_key(), private_password)?;
        let public_key = self
            .codec
            .encrypt_public(key_pair.public_key(), public_password)?;
        debug!(algorithm = %key_pair.algorithm(), "sealed key pair");

        Ok(EncryptedKeyPair {
            algorithm: key_pair.algorithm(),
            private_key,
            public_key,
        })
    }

    /// Encrypts both halves under the same password.
    pub fn save_with_password(
        &self,
        key_pair: &KeyPair,
        password: &[u8],
    ) -> LicenseResult<EncryptedKeyPair> {
        self.save(key_pair, password, password)
    }

    /// Decrypts both halves and checks that they belong together.
    pub fn load(
        &self,
        sealed: &EncryptedKeyPair,
        private_password: &[u8],
        public_password: &[u8],
    ) -> LicenseResult<KeyPair> {
        if sealed.algorithm != self.codec.algorithm() {
            return Err(LicenseError::AlgorithmUnsupported(
                sealed.algorithm.to_string(),
            ));
        }
        let private_key = self
            .codec
            .decrypt_private(sealed.private_key.as_bytes(), private_password)?;
        let public_key = self
            .codec
            .decrypt_public(sealed.public_key.as_bytes(), public_password)?;
        KeyPair::from_parts(private_key, public_key)
    }
}
