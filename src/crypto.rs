// src/crypto.rs
use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::Hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

pub const ALGORITHM_ID: &str = "pbkdf2_sha256";
pub const DEFAULT_ITERATIONS: u32 = 100_000;
pub const SALT_LEN: usize = 16;
pub const KEY_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Malformed stored hash: {0}")]
    MalformedStoredHash(String),

    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Iteration count must be greater than zero")]
    InvalidIterations,

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;

/// Self-describing hash string: `pbkdf2_sha256$<iterations>$<salt_b64>$<key_b64>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredHash {
    pub algorithm: String,
    pub iterations: u32,
    pub salt: Vec<u8>,
    pub key: Vec<u8>,
}

impl StoredHash {
    pub fn parse(encoded: &str) -> Result<Self> {
        let parts: Vec<&str> = encoded.split('$').collect();
        if parts.len() != 4 {
            return Err(CryptoError::MalformedStoredHash(format!(
                "expected 4 '$'-separated fields, found {}",
                parts.len()
            )));
        }

        if parts[0] != ALGORITHM_ID {
            return Err(CryptoError::UnsupportedAlgorithm(parts[0].to_string()));
        }

        let iterations: u32 = parts[1]
            .parse()
            .map_err(|_| CryptoError::MalformedStoredHash("invalid iteration count".into()))?;
        if iterations == 0 {
            return Err(CryptoError::MalformedStoredHash("iteration count is zero".into()));
        }

        let salt = STANDARD
            .decode(parts[2])
            .map_err(|e| CryptoError::MalformedStoredHash(format!("salt: {}", e)))?;
        let key = STANDARD
            .decode(parts[3])
            .map_err(|e| CryptoError::MalformedStoredHash(format!("derived key: {}", e)))?;

        if salt.is_empty() || key.is_empty() {
            return Err(CryptoError::MalformedStoredHash("empty salt or derived key".into()));
        }

        Ok(Self {
            algorithm: parts[0].to_string(),
            iterations,
            salt,
            key,
        })
    }
}

impl FromStr for StoredHash {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for StoredHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}${}${}${}",
            self.algorithm,
            self.iterations,
            STANDARD.encode(&self.salt),
            STANDARD.encode(&self.key)
        )
    }
}

// PBKDF2-HMAC-SHA256 over the UTF-8 bytes of the secret
fn derive_key(secret: &str, salt: &[u8], iterations: u32, key_len: usize) -> Result<Vec<u8>> {
    let mut key = vec![0u8; key_len];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(secret.as_bytes(), salt, iterations, &mut key)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

/// Hash a secret with a fresh random salt and the default iteration count.
pub fn hash_password(secret: &str) -> Result<StoredHash> {
    hash_with_iterations(secret, DEFAULT_ITERATIONS)
}

pub fn hash_with_iterations(secret: &str, iterations: u32) -> Result<StoredHash> {
    if iterations == 0 {
        return Err(CryptoError::InvalidIterations);
    }

    let mut salt = vec![0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let key = derive_key(secret, &salt, iterations, KEY_LEN)?;

    Ok(StoredHash {
        algorithm: ALGORITHM_ID.to_string(),
        iterations,
        salt,
        key,
    })
}

/// Check a plaintext secret against a stored hash string.
///
/// The derived key is compared in constant time.
pub fn verify_password(secret: &str, stored: &str) -> Result<bool> {
    let parsed = StoredHash::parse(stored)?;
    let candidate = derive_key(secret, &parsed.salt, parsed.iterations, parsed.key.len())?;
    Ok(candidate.ct_eq(&parsed.key).into())
}

/// Display-only masking. Secrets no longer than `visible_chars` are fully masked.
pub fn mask_password(secret: &str, visible_chars: usize) -> String {
    let total = secret.chars().count();
    if total <= visible_chars {
        return "*".repeat(total);
    }

    let mut masked: String = secret.chars().take(visible_chars).collect();
    masked.push_str(&"*".repeat(total - visible_chars));
    masked
}
