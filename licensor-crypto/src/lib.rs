//! Password-based encryption for Licensor key material.
//!
//! Key blobs written by the issuer tooling and read by licensed
//! applications are sealed here:
//! - Argon2id stretches the password into a 256-bit key
//! - ChaCha20-Poly1305 encrypts and authenticates the payload
//! - Derived keys and decrypted plaintext are zeroized on drop
//!
//! The [`PasswordCipher`] trait is the seam the licensing core depends on.

mod cipher;
mod error;
mod key;
mod password_cipher;

pub use cipher::{decrypt, encrypt, EncryptedData, NONCE_SIZE, TAG_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use key::{
    derive_key, DerivedKey, KdfParams, Salt, KEY_SIZE, MAX_MEMORY_COST, MAX_PARALLELISM,
    MAX_TIME_COST, SALT_SIZE,
};
pub use password_cipher::{Argon2Cipher, PasswordCipher, BLOB_VERSION, HEADER_SIZE, MIN_BLOB_SIZE};
pub use zeroize::Zeroizing;
