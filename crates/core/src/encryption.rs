//! AES-256-GCM encryption for secrets stored in the database.
//!
//! Used for user-supplied API keys in `user_settings`. Ciphertexts are
//! stored as `hex(iv):hex(tag):hex(ciphertext)` with a fresh 12-byte IV per
//! message.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};

use crate::error::CoreError;

/// Required key length in bytes.
pub const KEY_LEN: usize = 32;
/// IV length in bytes (GCM standard nonce).
pub const IV_LEN: usize = 12;
/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Symmetric encryptor holding a single AES-256 key.
#[derive(Clone)]
pub struct Encryptor {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for Encryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encryptor").finish_non_exhaustive()
    }
}

impl Encryptor {
    /// Build an encryptor from a 64-character hex key (the `ENCRYPTION_KEY`
    /// format).
    pub fn from_hex_key(hex_key: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(hex_key.trim())
            .map_err(|_| CoreError::Validation("Encryption key must be hex encoded".into()))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(key: &[u8]) -> Result<Self, CoreError> {
        if key.len() != KEY_LEN {
            return Err(CoreError::Validation(format!(
                "Encryption key must be {KEY_LEN} bytes, got {}",
                key.len()
            )));
        }
        let key = Key::<Aes256Gcm>::from_slice(key);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// Encrypt `plaintext` into the `iv:tag:ciphertext` hex format.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CoreError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CoreError::Internal("Encryption failed".into()))?;

        // aes-gcm appends the tag to the ciphertext.
        let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LEN);
        Ok(format!(
            "{}:{}:{}",
            hex::encode(nonce),
            hex::encode(tag),
            hex::encode(ciphertext)
        ))
    }

    /// Decrypt a value produced by [`Encryptor::encrypt`].
    ///
    /// Fails with a validation error on malformed input, a wrong key, or
    /// tampered data.
    pub fn decrypt(&self, encoded: &str) -> Result<String, CoreError> {
        let mut parts = encoded.split(':');
        let (Some(iv_hex), Some(tag_hex), Some(ct_hex), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };

        let iv = hex::decode(iv_hex).map_err(|_| malformed())?;
        let tag = hex::decode(tag_hex).map_err(|_| malformed())?;
        let mut sealed = hex::decode(ct_hex).map_err(|_| malformed())?;
        if iv.len() != IV_LEN || tag.len() != TAG_LEN {
            return Err(malformed());
        }
        sealed.extend_from_slice(&tag);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&iv), sealed.as_slice())
            .map_err(|_| CoreError::Validation("Encrypted value failed authentication".into()))?;

        String::from_utf8(plaintext)
            .map_err(|_| CoreError::Validation("Decrypted value is not valid UTF-8".into()))
    }
}

fn malformed() -> CoreError {
    CoreError::Validation("Encrypted value is malformed".into())
}

/// Show only the last four characters of a secret, e.g. `"••••abcd"`.
pub fn mask_secret(secret: &str) -> String {
    let tail: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("••••{tail}")
}
