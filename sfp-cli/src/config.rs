//! CLI settings, stored as plain JSON in the user's config directory.
//!
//! Nothing secret lives here: only the PBKDF2 iteration count used to seal
//! and open containers, and where and how verbosely to log.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sfp_crypto_core::{Pbkdf2Params, DEFAULT_ITERATIONS};

/// Persisted CLI settings.
///
/// Loaded from `--config <path>` or `{config_dir}/sfp/settings.json`.
/// Every field has a default, so partial files are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// PBKDF2 iterations for encrypting and decrypting files.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Directory for `sfp.log`. No file logging when unset.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Default `tracing` level for the sfp crates (`"error"` … `"trace"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            log_dir: None,
            log_level: default_log_level(),
        }
    }
}

const fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}
fn default_log_level() -> String {
    "info".into()
}

const SETTINGS_FILE: &str = "settings.json";

impl Settings {
    /// `{config_dir}/sfp/settings.json`, if the platform has a config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sfp").join(SETTINGS_FILE))
    }

    /// Load settings from `path`.
    ///
    /// Returns [`Default::default()`] when the file is missing or contains
    /// invalid JSON.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        fs::read_to_string(path).map_or_else(
            |_| Self::default(),
            |contents| serde_json::from_str(&contents).unwrap_or_default(),
        )
    }

    /// Persist settings to `path`, creating the parent directory.
    ///
    /// Written atomically through a uniquely named owner-only temp file in
    /// the same directory, then renamed over `path`.
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the directory cannot be created or the
    /// write/rename is rejected.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".settings.")
            .suffix(".tmp")
            .tempfile_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        Ok(())
    }

    /// PBKDF2 parameters for both directions.
    #[must_use]
    pub const fn params(&self) -> Pbkdf2Params {
        Pbkdf2Params {
            iterations: self.iterations,
        }
    }
}
