//! Result-path rules for encryption and decryption.
//!
//! `<name>` encrypts to `<name>.encrypted`. `<name>.encrypted` decrypts back
//! to `<name>`; anything else decrypts to `<name>.decrypted`.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Suffix appended to every encrypted file.
pub const ENCRYPTED_SUFFIX: &str = ".encrypted";

/// Suffix appended on decryption when the input lacks [`ENCRYPTED_SUFFIX`].
pub const DECRYPTED_SUFFIX: &str = ".decrypted";

/// Path the container for `path` is written to.
#[must_use]
pub fn result_path_for_encrypt(path: &Path) -> PathBuf {
    with_suffix(path, ENCRYPTED_SUFFIX)
}

/// Path the plaintext recovered from `path` is written to.
#[must_use]
pub fn result_path_for_decrypt(path: &Path) -> PathBuf {
    match stripped_name(path) {
        Some(stem) => path.with_file_name(stem),
        None => with_suffix(path, DECRYPTED_SUFFIX),
    }
}

/// `true` if the file name carries [`ENCRYPTED_SUFFIX`].
#[must_use]
pub fn has_encrypted_suffix(path: &Path) -> bool {
    path.file_name().is_some_and(name_has_suffix)
}

/// Byte-level check, so names that are not valid UTF-8 are handled too.
fn name_has_suffix(name: &OsStr) -> bool {
    name.as_encoded_bytes().ends_with(ENCRYPTED_SUFFIX.as_bytes())
}

/// File name with [`ENCRYPTED_SUFFIX`] removed, if present and a usable
/// file name remains after removing it.
fn stripped_name(path: &Path) -> Option<&OsStr> {
    let name = path.file_name()?;
    if !name_has_suffix(name) {
        return None;
    }
    // The suffix has no inner dot, so the stem is the name minus the suffix.
    path.file_stem()
        .filter(|stem| *stem != name && *stem != "." && *stem != "..")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
