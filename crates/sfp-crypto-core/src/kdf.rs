//! PBKDF2-HMAC-SHA256 key derivation and MAC key separation.
//!
//! This module provides:
//! - [`derive`] — raw PBKDF2-HMAC-SHA256 over a password + salt
//! - [`derive_file_keys`] — the encryption key and MAC key for one container
//! - [`Pbkdf2Params`] — iteration count shared by encryption and decryption
//! - [`FileKeys`] — the two 256-bit keys, zeroized on drop
//!
//! # Key Hierarchy
//!
//! ```text
//! Password + Salt ──► PBKDF2-HMAC-SHA256 ──► Encryption key
//!                                                 │
//!                          SHA-256(key || salt) ◄─┘──► MAC key
//! ```
//!
//! The slow derivation runs once per file. The MAC key is a hash over the
//! derived encryption key and the salt, so the two roles never share a key
//! even though both come from the same password and salt.

use std::num::NonZeroU32;

use ring::{digest, pbkdf2};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::memory::{SecretBuffer, SecretBytes};

/// Default PBKDF2 iteration count for new containers.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Upper bound accepted for the iteration count.
pub const MAX_ITERATIONS: u32 = 10_000_000;

/// Length of each derived sub-key in bytes (AES-256 / HMAC-SHA256 key).
pub const KEY_LEN: usize = 32;

/// Largest output [`derive`] will produce.
const MAX_OUTPUT_LEN: usize = 1024;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// PBKDF2 parameter set.
///
/// Not stored in the container: decryption must use the same count as
/// encryption. The default matches files written by the terminal scripts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pbkdf2Params {
    /// Number of PBKDF2-HMAC-SHA256 iterations.
    pub iterations: u32,
}

impl Default for Pbkdf2Params {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl Pbkdf2Params {
    /// Check the iteration count is within `1..=MAX_ITERATIONS`.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyDerivation` if the count is out of range.
    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.iterations == 0 {
            return Err(CryptoError::KeyDerivation(
                "iteration count must be non-zero".into(),
            ));
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(CryptoError::KeyDerivation(format!(
                "iteration count {} exceeds maximum {MAX_ITERATIONS}",
                self.iterations
            )));
        }
        Ok(())
    }
}

/// Encryption key and MAC key for a single container.
#[derive(Debug)]
pub struct FileKeys {
    encryption: SecretBytes<KEY_LEN>,
    mac: SecretBytes<KEY_LEN>,
}

impl FileKeys {
    /// The AES-256-CBC key.
    #[must_use]
    pub const fn encryption_key(&self) -> &[u8; KEY_LEN] {
        self.encryption.expose()
    }

    /// The HMAC-SHA256 key.
    #[must_use]
    pub const fn mac_key(&self) -> &[u8; KEY_LEN] {
        self.mac.expose()
    }
}

// ---------------------------------------------------------------------------
// Core KDF
// ---------------------------------------------------------------------------

/// Derive `key_len` bytes from a password and salt with PBKDF2-HMAC-SHA256.
///
/// Deterministic: the same inputs always produce the same output. Any salt
/// length is accepted here; the container enforces its own fixed salt size.
///
/// # Errors
///
/// Returns `CryptoError::KeyDerivation` if `iterations` is zero or `key_len`
/// is zero or larger than 1024 bytes.
pub fn derive(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    key_len: usize,
) -> Result<SecretBuffer, CryptoError> {
    let iterations = NonZeroU32::new(iterations)
        .ok_or_else(|| CryptoError::KeyDerivation("iteration count must be non-zero".into()))?;

    if key_len == 0 || key_len > MAX_OUTPUT_LEN {
        return Err(CryptoError::KeyDerivation(format!(
            "invalid output length: {key_len} bytes (expected 1..={MAX_OUTPUT_LEN})"
        )));
    }

    let mut output = vec![0u8; key_len];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password,
        &mut output,
    );
    Ok(SecretBuffer::from_vec(output))
}

/// Derive the encryption key and MAC key for one container.
///
/// The encryption key is PBKDF2 output; the MAC key is
/// `SHA-256(encryption_key || salt)`.
///
/// # Errors
///
/// Returns `CryptoError::KeyDerivation` if `params` is out of range.
pub fn derive_file_keys(
    password: &[u8],
    salt: &[u8],
    params: &Pbkdf2Params,
) -> Result<FileKeys, CryptoError> {
    params.validate()?;
    let master = derive(password, salt, params.iterations, KEY_LEN)?;

    let mut ctx = digest::Context::new(&digest::SHA256);
    ctx.update(master.expose());
    ctx.update(salt);
    let mac = to_key(ctx.finish().as_ref())?;
    let encryption = to_key(master.expose())?;

    Ok(FileKeys { encryption, mac })
}

fn to_key(bytes: &[u8]) -> Result<SecretBytes<KEY_LEN>, CryptoError> {
    let mut key_bytes: [u8; KEY_LEN] = bytes
        .try_into()
        .map_err(|_| CryptoError::KeyDerivation("derived key has wrong length".into()))?;
    let key = SecretBytes::new(key_bytes);
    key_bytes.zeroize();
    Ok(key)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
