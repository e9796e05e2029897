//! `sfp-crypto-core` — Pure cryptographic primitives for SFP.
//!
//! Password-based file containers: PBKDF2-HMAC-SHA256 key derivation,
//! AES-256-CBC encryption, HMAC-SHA256 authentication (encrypt-then-MAC),
//! and the SFA binary layout.
//!
//! This crate is the audit target: zero file I/O, zero logging, zero async.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;

pub mod kdf;

pub mod cipher;
pub mod integrity;

pub mod container;

pub use container::{
    open, seal, Container, FORMAT_VERSION, MAGIC, MIN_CONTAINER_LEN, SALT_LEN,
};
pub use error::CryptoError;
pub use kdf::{derive, derive_file_keys, FileKeys, Pbkdf2Params, DEFAULT_ITERATIONS};
pub use memory::{disable_core_dumps, SecretBuffer, SecretBytes};
