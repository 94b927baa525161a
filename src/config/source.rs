//! Raw key/value sources that settings are parsed from.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;

use tracing::debug;

use super::SettingsError;

/// A merged, case-insensitive view of configuration variables.
///
/// Keys are stored upper-cased. Values set to the empty string are
/// reported as absent by [`SettingsSource::get`].
#[derive(Debug, Clone, Default)]
pub struct SettingsSource {
    values: BTreeMap<String, String>,
}

impl SettingsSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the current process environment.
    ///
    /// See [`from_os_pairs`](Self::from_os_pairs) for how unusual entries are
    /// handled.
    #[must_use]
    pub fn from_process_env() -> Self {
        Self::from_os_pairs(std::env::vars_os())
    }

    /// Builds a source from raw OS environment pairs.
    ///
    /// Entries whose key or value is not valid UTF-8 are skipped. When two
    /// keys differ only in case (`port` and `PORT`), the exact upper-case
    /// spelling wins regardless of iteration order; among other spellings the
    /// first one seen is kept.
    pub fn from_os_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut source = Self::new();
        for (key, value) in pairs {
            let (Ok(key), Ok(value)) = (key.into_string(), value.into_string()) else {
                debug!("Skipping environment variable that is not valid UTF-8");
                continue;
            };

            let normalized = normalize_key(&key);
            if key.trim() == normalized || !source.values.contains_key(&normalized) {
                source.values.insert(normalized, value);
            }
        }
        source
    }

    /// Builds an isolated source from explicit pairs.
    ///
    /// Later pairs overwrite earlier ones with the same (case-insensitive) key.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut source = Self::new();
        for (key, value) in pairs {
            source.set(key, value);
        }
        source
    }

    /// Merges variables from a dotenv file.
    ///
    /// Keys already present in the source are kept, so process variables take
    /// precedence over the file. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::EnvFile`] if the file exists but cannot be read
    /// or contains an invalid line.
    pub fn with_env_file(mut self, path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();

        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(ref err)) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("Env file {} not found, using environment only", path.display());
                return Ok(self);
            }
            Err(source) => {
                return Err(SettingsError::EnvFile {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut merged = 0usize;
        for item in iter {
            let (key, value) = item.map_err(|source| SettingsError::EnvFile {
                path: path.to_path_buf(),
                source,
            })?;
            let key = normalize_key(&key);
            if !self.values.contains_key(&key) {
                self.values.insert(key, value);
                merged += 1;
            }
        }

        debug!("Merged {} variable(s) from {}", merged, path.display());
        Ok(self)
    }

    /// Sets a variable, replacing any existing value.
    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.values.insert(normalize_key(key.as_ref()), value.into());
    }

    /// Removes a variable.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(&normalize_key(key))
    }

    /// Looks up a variable. Empty values count as unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&normalize_key(key))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Returns the number of stored variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Checks if the source holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_uppercase()
}
