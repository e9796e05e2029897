//! Single-file encryption and decryption.
//!
//! [`FileCipher`] carries the PBKDF2 parameters for both directions. The
//! container does not record its iteration count, so a file only opens with
//! the count it was sealed with.

use std::fs;
use std::path::{Path, PathBuf};

use sfp_crypto_core::{container, Pbkdf2Params};
use zeroize::Zeroizing;

use crate::atomic;
use crate::batch::{self, BatchReport};
use crate::error::FileError;
use crate::naming::{result_path_for_decrypt, result_path_for_encrypt};

/// Encrypts and decrypts files on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileCipher {
    params: Pbkdf2Params,
}

impl FileCipher {
    /// Create a cipher that seals and opens containers with `params`.
    #[must_use]
    pub const fn new(params: Pbkdf2Params) -> Self {
        Self { params }
    }

    /// PBKDF2 parameters used in both directions.
    #[must_use]
    pub const fn params(&self) -> Pbkdf2Params {
        self.params
    }

    /// Encrypt `path` into `path.encrypted` and return the result path.
    ///
    /// The source file is never modified. An existing file at the result
    /// path is replaced atomically.
    ///
    /// # Errors
    ///
    /// - `FileError::NotAFile` if `path` is missing or not a regular file
    /// - `FileError::Io` if the source cannot be read or the result written
    /// - `FileError::Crypto` if the parameters are invalid
    pub fn encrypt_file(&self, path: &Path, password: &[u8]) -> Result<PathBuf, FileError> {
        let plaintext = read_regular_file(path)?;
        let sealed = container::seal(&plaintext, password, &self.params)?;
        drop(plaintext);

        let dest = result_path_for_encrypt(path);
        atomic::write(&dest, &sealed)?;

        tracing::info!(
            source = %path.display(),
            result = %dest.display(),
            iterations = self.params.iterations,
            "File encrypted"
        );
        Ok(dest)
    }

    /// Decrypt the container at `path` and return the path the plaintext was
    /// written to.
    ///
    /// Nothing is written unless the tag verifies.
    ///
    /// # Errors
    ///
    /// - `FileError::Crypto(CryptoError::Authentication)` for a wrong password,
    ///   a different iteration count or a tampered file (indistinguishable)
    /// - `FileError::Crypto(CryptoError::MalformedContainer)` if the file is
    ///   not an SFA container
    /// - `FileError::NotAFile` / `FileError::Io` for filesystem problems
    pub fn decrypt_file(&self, path: &Path, password: &[u8]) -> Result<PathBuf, FileError> {
        let bytes = read_regular_file(path)?;
        let plaintext = container::open(&bytes, password, &self.params)?;

        let dest = result_path_for_decrypt(path);
        atomic::write(&dest, plaintext.expose())?;

        tracing::info!(
            source = %path.display(),
            result = %dest.display(),
            iterations = self.params.iterations,
            "File decrypted"
        );
        Ok(dest)
    }

    /// Encrypt every regular file under `root`. See [`batch::encrypt_tree`].
    ///
    /// # Errors
    ///
    /// Returns `FileError::NotADirectory` if `root` is not a directory.
    pub fn encrypt_tree(&self, root: &Path, password: &[u8]) -> Result<BatchReport, FileError> {
        batch::run(self, root, password, batch::Direction::Encrypt)
    }

    /// Decrypt every `.encrypted` file under `root`. See [`batch::decrypt_tree`].
    ///
    /// # Errors
    ///
    /// Returns `FileError::NotADirectory` if `root` is not a directory.
    pub fn decrypt_tree(&self, root: &Path, password: &[u8]) -> Result<BatchReport, FileError> {
        batch::run(self, root, password, batch::Direction::Decrypt)
    }
}

/// Encrypt one file with default parameters.
///
/// # Errors
///
/// See [`FileCipher::encrypt_file`].
pub fn encrypt_file(path: &Path, password: &[u8]) -> Result<PathBuf, FileError> {
    FileCipher::default().encrypt_file(path, password)
}

/// Decrypt one file with default parameters.
///
/// # Errors
///
/// See [`FileCipher::decrypt_file`].
pub fn decrypt_file(path: &Path, password: &[u8]) -> Result<PathBuf, FileError> {
    FileCipher::default().decrypt_file(path, password)
}

fn read_regular_file(path: &Path) -> Result<Zeroizing<Vec<u8>>, FileError> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FileError::NotAFile(path.to_path_buf()));
        }
        Err(e) => return Err(FileError::io(path, e)),
    };
    if !metadata.is_file() {
        return Err(FileError::NotAFile(path.to_path_buf()));
    }

    fs::read(path)
        .map(Zeroizing::new)
        .map_err(|e| FileError::io(path, e))
}
