//! Password-based encryption of opaque byte blobs.
//!
//! Consumers (the key codec) depend on the [`PasswordCipher`] trait and
//! never handle derived keys themselves. [`Argon2Cipher`] is the shipped
//! implementation: Argon2id stretches the password, ChaCha20-Poly1305
//! seals the payload.
//!
//! # Blob layout
//!
//! ```text
//! version (1) | memory_cost (4, BE) | time_cost (4, BE) | parallelism (4, BE)
//!     | salt (16) | nonce (12) | ciphertext + tag
//! ```

use crate::cipher::{self, EncryptedData, NONCE_SIZE, TAG_SIZE};
use crate::error::{CryptoError, CryptoResult};
use crate::key::{derive_key, KdfParams, Salt, SALT_SIZE};
use tracing::debug;
use zeroize::Zeroizing;

/// Current blob format version.
pub const BLOB_VERSION: u8 = 1;

const PARAMS_SIZE: usize = 12;

/// Bytes preceding the nonce in every blob.
pub const HEADER_SIZE: usize = 1 + PARAMS_SIZE + SALT_SIZE;

/// Smallest blob that can possibly decrypt (empty plaintext).
pub const MIN_BLOB_SIZE: usize = HEADER_SIZE + NONCE_SIZE + TAG_SIZE;

/// Trait for encrypting/decrypting opaque byte slices under a password.
///
/// Implementations must never return plaintext for a wrong password: a
/// failed integrity check is [`CryptoError::BadPassword`], a structurally
/// unusable blob is [`CryptoError::Corrupt`].
pub trait PasswordCipher: Send + Sync {
    /// Encrypt `plaintext` under `password`, returning an opaque blob.
    fn encrypt(&self, plaintext: &[u8], password: &[u8]) -> CryptoResult<Vec<u8>>;

    /// Decrypt a blob previously produced by `encrypt`.
    fn decrypt(&self, blob: &[u8], password: &[u8]) -> CryptoResult<Zeroizing<Vec<u8>>>;
}

/// Argon2id + ChaCha20-Poly1305 password cipher.
#[derive(Clone, Debug, Default)]
pub struct Argon2Cipher {
    params: KdfParams,
}

impl Argon2Cipher {
    /// Creates a cipher that derives keys with `params` when encrypting.
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }

    /// Returns the parameters used for new blobs.
    pub fn params(&self) -> &KdfParams {
        &self.params
    }
}

impl PasswordCipher for Argon2Cipher {
    fn encrypt(&self, plaintext: &[u8], password: &[u8]) -> CryptoResult<Vec<u8>> {
        let salt = Salt::random();
        let key = derive_key(password, &salt, &self.params)?;
        let sealed = cipher::encrypt(&key, plaintext)?;

        let mut blob = Vec::with_capacity(HEADER_SIZE + NONCE_SIZE + sealed.ciphertext.len());
        blob.push(BLOB_VERSION);
        blob.extend_from_slice(&self.params.memory_cost.to_be_bytes());
        blob.extend_from_slice(&self.params.time_cost.to_be_bytes());
        blob.extend_from_slice(&self.params.parallelism.to_be_bytes());
        blob.extend_from_slice(salt.as_bytes());
        sealed.write_to(&mut blob);
        Ok(blob)
    }

    fn decrypt(&self, blob: &[u8], password: &[u8]) -> CryptoResult<Zeroizing<Vec<u8>>> {
        if password.is_empty() {
            return Err(CryptoError::EmptyPassword);
        }
        if blob.len() < MIN_BLOB_SIZE {
            debug!(len = blob.len(), "rejecting truncated blob");
            return Err(CryptoError::Corrupt(format!(
                "blob too short: {} bytes",
                blob.len()
            )));
        }
        if blob[0] != BLOB_VERSION {
            debug!(version = blob[0], "rejecting blob with unknown version");
            return Err(CryptoError::Corrupt(format!(
                "unsupported blob version {}",
                blob[0]
            )));
        }

        let params = KdfParams {
            memory_cost: read_u32(&blob[1..5]),
            time_cost: read_u32(&blob[5..9]),
            parallelism: read_u32(&blob[9..13]),
        };
        params.check_bounds()?;

        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&blob[1 + PARAMS_SIZE..HEADER_SIZE]);
        let sealed = EncryptedData::from_bytes(&blob[HEADER_SIZE..])?;

        let key = derive_key(password, &Salt::from_bytes(salt), &params)?;
        cipher::decrypt(&key, &sealed).map(Zeroizing::new)
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_be_bytes(buf)
}
