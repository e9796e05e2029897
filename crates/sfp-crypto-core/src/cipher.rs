//! AES-256-CBC with PKCS#7 padding.
//!
//! This module provides:
//! - [`encrypt_block`] — pad + encrypt a whole plaintext under (key, IV)
//! - [`decrypt_block`] — decrypt + validate and strip the padding
//! - [`pad`] / [`unpad`] — the PKCS#7 scheme on its own
//!
//! CBC alone is malleable. Callers must authenticate the ciphertext
//! (see [`crate::integrity`]) and only call [`decrypt_block`] after the tag
//! has verified; [`crate::container::Container::open`] enforces that order.

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::memory::SecretBuffer;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// CBC initialization vector length in bytes (one block).
pub const IV_LEN: usize = BLOCK_LEN;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

// ---------------------------------------------------------------------------
// Padding
// ---------------------------------------------------------------------------

/// Apply PKCS#7 padding: append N bytes of value N, N in `1..=16`.
///
/// Input already aligned to the block size gets a full extra block.
#[must_use]
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_LEN.saturating_sub(data.len() % BLOCK_LEN);
    #[allow(clippy::cast_possible_truncation)] // pad_len is in 1..=16
    let pad_byte = pad_len as u8;

    let mut out = Vec::with_capacity(data.len().saturating_add(pad_len));
    out.extend_from_slice(data);
    out.resize(data.len().saturating_add(pad_len), pad_byte);
    out
}

/// Validate and strip PKCS#7 padding.
///
/// # Errors
///
/// Returns `CryptoError::Padding` if the input is empty or not block-aligned,
/// the last byte is outside `1..=16`, or any padding byte differs from it.
pub fn unpad(data: &[u8]) -> Result<&[u8], CryptoError> {
    if data.is_empty() || data.len() % BLOCK_LEN != 0 {
        return Err(CryptoError::Padding);
    }
    let Some(&last) = data.last() else {
        return Err(CryptoError::Padding);
    };

    let pad_len = usize::from(last);
    if pad_len == 0 || pad_len > BLOCK_LEN {
        return Err(CryptoError::Padding);
    }

    let split = data
        .len()
        .checked_sub(pad_len)
        .ok_or(CryptoError::Padding)?;
    let (body, padding) = data.split_at(split);

    // Check every padding byte without an early exit.
    let mismatch = padding.iter().fold(0u8, |acc, &b| acc | (b ^ last));
    if mismatch != 0 {
        return Err(CryptoError::Padding);
    }

    Ok(body)
}

// ---------------------------------------------------------------------------
// Core cipher
// ---------------------------------------------------------------------------

/// Pad and encrypt `plaintext` with AES-256-CBC.
///
/// The output length is always a non-zero multiple of [`BLOCK_LEN`].
///
/// # Errors
///
/// Returns `CryptoError::Encryption` if the key is not 32 bytes or the IV is
/// not 16 bytes.
pub fn encrypt_block(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    check_key_iv(key, iv)?;
    let cipher = Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|_| CryptoError::Encryption("failed to create AES-256-CBC encryptor".into()))?;

    let mut buf = pad(plaintext);
    let len = buf.len();
    if cipher.encrypt_padded_mut::<NoPadding>(&mut buf, len).is_err() {
        buf.zeroize();
        return Err(CryptoError::Encryption(
            "AES-256-CBC encryption failed".into(),
        ));
    }
    Ok(buf)
}

/// Decrypt AES-256-CBC ciphertext and strip its PKCS#7 padding.
///
/// The intermediate buffer is zeroized; the plaintext is returned in a
/// [`SecretBuffer`].
///
/// # Errors
///
/// Returns `CryptoError::Encryption` for a bad key/IV length,
/// `CryptoError::MalformedContainer` if the ciphertext is empty or not
/// block-aligned, and `CryptoError::Padding` if the padding is invalid.
pub fn decrypt_block(
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<SecretBuffer, CryptoError> {
    check_key_iv(key, iv)?;
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CryptoError::MalformedContainer(format!(
            "ciphertext length {} is not a positive multiple of {BLOCK_LEN}",
            ciphertext.len()
        )));
    }

    let cipher = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|_| CryptoError::Encryption("failed to create AES-256-CBC decryptor".into()))?;

    let mut buf = ciphertext.to_vec();
    let result = match cipher.decrypt_padded_mut::<NoPadding>(&mut buf) {
        Ok(decrypted) => unpad(decrypted).map(SecretBuffer::new),
        Err(_) => Err(CryptoError::Encryption(
            "AES-256-CBC decryption failed".into(),
        )),
    };
    buf.zeroize();
    result
}

fn check_key_iv(key: &[u8], iv: &[u8]) -> Result<(), CryptoError> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::Encryption(format!(
            "invalid key length: {} bytes (expected {KEY_LEN})",
            key.len()
        )));
    }
    if iv.len() != IV_LEN {
        return Err(CryptoError::Encryption(format!(
            "invalid IV length: {} bytes (expected {IV_LEN})",
            iv.len()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
