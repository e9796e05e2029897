//! `sfp-files` — File-level encryption for SFP.
//!
//! Reads whole files, seals them into SFA containers with
//! `sfp-crypto-core`, and writes results atomically next to the source.
//! Directory trees are processed file by file; one file's failure never
//! stops its siblings.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;

mod atomic;
pub mod naming;
pub mod service;

pub mod batch;

pub use batch::{decrypt_tree, encrypt_tree, BatchFailure, BatchReport};
pub use error::FileError;
pub use naming::{
    result_path_for_decrypt, result_path_for_encrypt, DECRYPTED_SUFFIX, ENCRYPTED_SUFFIX,
};
pub use service::{decrypt_file, encrypt_file, FileCipher};
pub use sfp_crypto_core::{CryptoError, Pbkdf2Params};
