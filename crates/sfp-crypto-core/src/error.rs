//! Cryptographic error types for `sfp-crypto-core`.

use thiserror::Error;

/// Errors produced by cryptographic operations.
///
/// [`CryptoError::Authentication`] deliberately carries no detail: a wrong
/// password and a corrupted container are indistinguishable to the caller.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key derivation rejected its parameters (zero iterations, bad lengths).
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Cipher setup failure (wrong key or IV length).
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Authentication tag mismatch: wrong password or tampered container.
    #[error("authentication failed: wrong password or corrupted file")]
    Authentication,

    /// Structurally invalid container (too short, bad magic, bad field).
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// Invalid PKCS#7 padding after a successful authentication check.
    #[error("invalid padding in authenticated ciphertext")]
    Padding,

    /// CSPRNG or secure buffer failure.
    #[error("secure memory error: {0}")]
    SecureMemory(String),
}
