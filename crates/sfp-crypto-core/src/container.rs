//! SFA binary container — magic, salt, IV, tag, ciphertext.
//!
//! This module provides:
//! - [`Container::seal`] / [`seal`] — encrypt a plaintext into a container
//! - [`Container::open`] / [`open`] — authenticate, then decrypt
//! - [`Container::to_bytes`] / [`Container::from_bytes`] — the wire codec
//!
//! # File Layout
//!
//! ```text
//! Magic (22 B) | Salt (16 B) | IV (16 B) | Tag (32 B) | Ciphertext (N B)
//! ```
//!
//! - **Magic**: `b"SFA_ENCRYPTED_FILE_V1\n"` — identifies format and version
//! - **Salt / IV**: fresh random bytes per container, stored in the clear
//! - **Tag**: HMAC-SHA256 over the ciphertext
//! - **Ciphertext**: AES-256-CBC over the PKCS#7-padded plaintext, `N >= 16`
//!
//! The PBKDF2 iteration count is not stored. Both sides must agree on it;
//! the default is the count the terminal scripts use.
//!
//! # Security Properties
//!
//! - The tag is verified before any decryption takes place
//! - Structural checks run before any key derivation
//! - Salt and IV are not covered by the tag. A changed salt yields different
//!   keys and fails authentication; a changed IV only alters the first
//!   plaintext block.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::cipher::{self, BLOCK_LEN, IV_LEN};
use crate::error::CryptoError;
use crate::integrity::{self, TAG_LEN};
use crate::kdf::{self, Pbkdf2Params};
use crate::memory::SecretBuffer;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic header identifying an SFA container.
pub const MAGIC: &[u8; MAGIC_LEN] = b"SFA_ENCRYPTED_FILE_V1\n";

/// Current format version (the digit in [`MAGIC`]).
pub const FORMAT_VERSION: u8 = 1;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Common prefix of every SFA header, regardless of version.
const MAGIC_PREFIX: &[u8] = b"SFA_ENCRYPTED_FILE_V";

const MAGIC_LEN: usize = 22;

const SALT_OFFSET: usize = MAGIC_LEN;
const IV_OFFSET: usize = SALT_OFFSET + SALT_LEN;
const TAG_OFFSET: usize = IV_OFFSET + IV_LEN;

/// Offset of the first ciphertext byte.
pub const CIPHERTEXT_OFFSET: usize = TAG_OFFSET + TAG_LEN;

/// Smallest valid container: all fixed fields plus one ciphertext block.
pub const MIN_CONTAINER_LEN: usize = CIPHERTEXT_OFFSET + BLOCK_LEN;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A decoded container. Immutable once sealed.
#[must_use = "a sealed container must be written somewhere"]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    /// Random per-container salt.
    pub salt: [u8; SALT_LEN],
    /// Random per-container CBC IV.
    pub iv: [u8; IV_LEN],
    /// HMAC-SHA256 over the ciphertext.
    pub tag: [u8; TAG_LEN],
    /// AES-256-CBC ciphertext, block-aligned.
    pub ciphertext: Vec<u8>,
}

impl Container {
    /// Encrypt `plaintext` under `password` into a new container.
    ///
    /// Draws a fresh salt and IV from `OsRng` on every call.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyDerivation`] if `params` is out of range and
    /// [`CryptoError::SecureMemory`] if the CSPRNG fails.
    pub fn seal(
        plaintext: &[u8],
        password: &[u8],
        params: &Pbkdf2Params,
    ) -> Result<Self, CryptoError> {
        params.validate()?;

        let mut salt = [0u8; SALT_LEN];
        let mut iv = [0u8; IV_LEN];
        OsRng
            .try_fill_bytes(&mut salt)
            .and_then(|()| OsRng.try_fill_bytes(&mut iv))
            .map_err(|e| CryptoError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;

        let keys = kdf::derive_file_keys(password, &salt, params)?;
        let ciphertext = cipher::encrypt_block(keys.encryption_key(), &iv, plaintext)?;
        let tag = integrity::tag(keys.mac_key(), &ciphertext);
        Ok(Self {
            salt,
            iv,
            tag,
            ciphertext,
        })
    }

    /// Authenticate and decrypt this container.
    ///
    /// `params` must match the ones used to seal it. The tag is checked
    /// first; nothing is decrypted unless it matches.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Authentication`] for a wrong password, wrong
    /// iteration count or modified salt, tag or ciphertext,
    /// [`CryptoError::Padding`] if an authenticated ciphertext carries
    /// invalid padding, and [`CryptoError::KeyDerivation`] for out-of-range
    /// parameters.
    pub fn open(
        &self,
        password: &[u8],
        params: &Pbkdf2Params,
    ) -> Result<SecretBuffer, CryptoError> {
        let keys = kdf::derive_file_keys(password, &self.salt, params)?;

        if !integrity::verify(keys.mac_key(), &self.ciphertext, &self.tag) {
            return Err(CryptoError::Authentication);
        }

        cipher::decrypt_block(keys.encryption_key(), &self.iv, &self.ciphertext)
    }

    /// Total encoded length in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        CIPHERTEXT_OFFSET.saturating_add(self.ciphertext.len())
    }

    /// Encode to the wire layout.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Decode from the wire layout by fixed-offset slicing.
    ///
    /// No key derivation or decryption happens here.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedContainer`] if the input is shorter
    /// than [`MIN_CONTAINER_LEN`], carries a foreign or unsupported header,
    /// or its ciphertext is not block-aligned.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < MIN_CONTAINER_LEN {
            return Err(CryptoError::MalformedContainer(format!(
                "container too short: {} bytes (minimum {MIN_CONTAINER_LEN})",
                bytes.len()
            )));
        }

        if &bytes[..MAGIC_LEN] != MAGIC.as_slice() {
            if bytes.starts_with(MAGIC_PREFIX) {
                return Err(CryptoError::MalformedContainer(
                    "unsupported container version".into(),
                ));
            }
            return Err(CryptoError::MalformedContainer(
                "invalid magic bytes".into(),
            ));
        }

        let salt = read_array(bytes, SALT_OFFSET)?;
        let iv = read_array(bytes, IV_OFFSET)?;
        let tag = read_array(bytes, TAG_OFFSET)?;

        let ciphertext = &bytes[CIPHERTEXT_OFFSET..];
        if ciphertext.len() % BLOCK_LEN != 0 {
            return Err(CryptoError::MalformedContainer(format!(
                "ciphertext length {} is not a multiple of {BLOCK_LEN}",
                ciphertext.len()
            )));
        }

        Ok(Self {
            salt,
            iv,
            tag,
            ciphertext: ciphertext.to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// Byte-level convenience API
// ---------------------------------------------------------------------------

/// Encrypt `plaintext` and return the encoded container bytes.
///
/// # Errors
///
/// See [`Container::seal`].
pub fn seal(
    plaintext: &[u8],
    password: &[u8],
    params: &Pbkdf2Params,
) -> Result<Vec<u8>, CryptoError> {
    Container::seal(plaintext, password, params).map(|c| c.to_bytes())
}

/// Decode, authenticate and decrypt container bytes.
///
/// # Errors
///
/// See [`Container::from_bytes`] and [`Container::open`].
pub fn open(
    bytes: &[u8],
    password: &[u8],
    params: &Pbkdf2Params,
) -> Result<SecretBuffer, CryptoError> {
    Container::from_bytes(bytes)?.open(password, params)
}

/// Copy a fixed-size field out of `bytes` at `offset`.
fn read_array<const N: usize>(bytes: &[u8], offset: usize) -> Result<[u8; N], CryptoError> {
    let end = offset
        .checked_add(N)
        .ok_or_else(|| CryptoError::MalformedContainer("field offset overflow".into()))?;
    let field = bytes.get(offset..end).ok_or_else(|| {
        CryptoError::MalformedContainer(format!(
            "field at offset {offset} extends beyond container ({} bytes)",
            bytes.len()
        ))
    })?;

    let mut out = [0u8; N];
    out.copy_from_slice(field);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
