//! Error types for `sfp-files`.

use std::io;
use std::path::PathBuf;

use sfp_crypto_core::CryptoError;
use thiserror::Error;

/// Errors produced by file and directory operations.
#[derive(Debug, Error)]
pub enum FileError {
    /// Cryptographic operation failed (delegated from crypto-core).
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Reading the source or writing the result failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file the operation was reading or writing.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// The path is missing or is not a regular file.
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The batch root is missing or is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

impl FileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short, secret-free label for the error kind, suitable for logs.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Crypto(CryptoError::Authentication) => "authentication",
            Self::Crypto(CryptoError::MalformedContainer(_)) => "malformed-container",
            Self::Crypto(CryptoError::Padding) => "padding",
            Self::Crypto(CryptoError::KeyDerivation(_)) => "key-derivation",
            Self::Crypto(_) => "crypto",
            Self::Io { .. } => "io",
            Self::NotAFile(_) => "not-a-file",
            Self::NotADirectory(_) => "not-a-directory",
        }
    }

    /// `true` if the error means the password was wrong or the container was
    /// tampered with. The two cases are deliberately indistinguishable.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Crypto(CryptoError::Authentication))
    }
}
