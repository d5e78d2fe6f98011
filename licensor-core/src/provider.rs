//! Sources of encrypted key data and passwords for licensed applications.
//!
//! An application typically embeds its public key blob and password as
//! constants, or reads the password from its environment. Each provider
//! returns [`LicenseError::KeyNotFound`] when it has nothing to supply.

use std::env;

use zeroize::Zeroizing;

use crate::error::{LicenseError, LicenseResult};
use crate::key_codec::EncryptedKeyBlob;

/// Supplies the encrypted private key blob.
pub trait PrivateKeyDataProvider {
    fn encrypted_private_key_data(&self) -> LicenseResult<Vec<u8>>;
}

/// Supplies the encrypted public key blob.
pub trait PublicKeyDataProvider {
    fn encrypted_public_key_data(&self) -> LicenseResult<Vec<u8>>;
}

/// Supplies a key password. The returned bytes are zeroized on drop.
pub trait PasswordProvider {
    fn password(&self) -> LicenseResult<Zeroizing<Vec<u8>>>;
}

/// An in-memory key blob, serving either half.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyData {
    data: Vec<u8>,
}

impl StaticKeyData {
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    /// Wraps a base64-armored blob.
    pub fn from_base64(encoded: &str) -> LicenseResult<Self> {
        EncryptedKeyBlob::from_base64(encoded).map(|blob| Self::new(blob.into_bytes()))
    }

    fn get(&self, which: &str) -> LicenseResult<Vec<u8>> {
        if self.data.is_empty() {
            return Err(LicenseError::KeyNotFound(format!("no {which} key data configured")));
        }
        Ok(self.data.clone())
    }
}

impl From<EncryptedKeyBlob> for StaticKeyData {
    fn from(blob: EncryptedKeyBlob) -> Self {
        Self::new(blob.into_bytes())
    }
}

impl PrivateKeyDataProvider for StaticKeyData {
    fn encrypted_private_key_data(&self) -> LicenseResult<Vec<u8>> {
        self.get("private")
    }
}

impl PublicKeyDataProvider for StaticKeyData {
    fn encrypted_public_key_data(&self) -> LicenseResult<Vec<u8>> {
        self.get("public")
    }
}

/// An in-memory password, zeroized on drop.
#[derive(Clone, Default)]
pub struct StaticPassword(Zeroizing<Vec<u8>>);

impl StaticPassword {
    #[must_use]
    pub fn new(password: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(password.into()))
    }
}

impl std::fmt::Debug for StaticPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticPassword").field(&"[REDACTED]").finish()
    }
}

impl PasswordProvider for StaticPassword {
    fn password(&self) -> LicenseResult<Zeroizing<Vec<u8>>> {
        if self.0.is_empty() {
            return Err(LicenseError::KeyNotFound("no password configured".to_string()));
        }
        Ok(self.0.clone())
    }
}

/// Reads the password from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvPassword {
    var: String,
}

impl EnvPassword {
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl PasswordProvider for EnvPassword {
    fn password(&self) -> LicenseResult<Zeroizing<Vec<u8>>> {
        match env::var(&self.var) {
            Ok(value) if !value.is_empty() => Ok(Zeroizing::new(value.into_bytes())),
            _ => Err(LicenseError::KeyNotFound(format!(
                "environment variable {} is unset or empty",
                self.var
            ))),
        }
    }
}
