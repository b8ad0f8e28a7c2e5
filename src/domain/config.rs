use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// User settings for the contact manager.
///
/// Read from a TOML file. Every key is optional; missing keys take their
/// default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Where the address book is stored.
    ///
    /// Relative paths are resolved against the working directory.
    book: PathBuf,

    /// How many days ahead `show birthdays` looks when no window is given.
    upcoming_days: u32,

    /// Whether to ask before adding a phone number that already belongs to
    /// another contact.
    pub confirm_shared_phone: bool,

    /// Maximum number of entries kept in the interactive history.
    history_size: usize,
}

/// Errors raised while reading or writing a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// The file being read.
        path: PathBuf,
        /// The underlying IO error.
        source: io::Error,
    },

    /// The file is not valid configuration TOML.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying TOML error.
        source: toml::de::Error,
    },

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The file could not be written.
    #[error("failed to write config file {path}: {source}")]
    Write {
        /// The file being written.
        path: PathBuf,
        /// The underlying IO error.
        source: io::Error,
    },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            book: default_book(),
            upcoming_days: 0,
            confirm_shared_phone: true,
            history_size: default_history_size(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the configuration, falling back to defaults if the file does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            result => result,
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// The file is written next to its destination and renamed into place.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let write_error = |source: io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
        file.write_all(content.as_bytes()).map_err(write_error)?;
        file.as_file().sync_all().map_err(write_error)?;
        file.persist(path).map_err(|e| write_error(e.error))?;
        Ok(())
    }

    /// The path of the address book file.
    #[must_use]
    pub fn book(&self) -> &Path {
        &self.book
    }

    /// Points the configuration at a different address book file.
    pub fn set_book(&mut self, book: impl Into<PathBuf>) {
        self.book = book.into();
    }

    /// The default window, in days, for upcoming birthdays.
    #[must_use]
    pub const fn upcoming_days(&self) -> u32 {
        self.upcoming_days
    }

    /// Maximum number of interactive history entries.
    #[must_use]
    pub const fn history_size(&self) -> usize {
        self.history_size
    }
}

fn default_book() -> PathBuf {
    PathBuf::from("addressbook.yaml")
}

const fn default_history_size() -> usize {
    100
}

const fn default_true() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_book")]
        book: PathBuf,

        #[serde(default)]
        upcoming_days: u32,

        #[serde(default = "default_true")]
        confirm_shared_phone: bool,

        #[serde(default = "default_history_size")]
        history_size: usize,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                book,
                upcoming_days,
                confirm_shared_phone,
                history_size,
            } => Self {
                book,
                upcoming_days,
                confirm_shared_phone,
                history_size,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            book: config.book,
            upcoming_days: config.upcoming_days,
            confirm_shared_phone: config.confirm_shared_phone,
            history_size: config.history_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nbook = \"contacts/book.yaml\"\nupcoming_days = 7\nconfirm_shared_phone = false\nhistory_size = 20\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.book(), Path::new("contacts/book.yaml"));
        assert_eq!(config.upcoming_days(), 7);
        assert!(!config.confirm_shared_phone);
        assert_eq!(config.history_size(), 20);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(matches!(error, ConfigError::Read { .. }));
        assert!(error.to_string().starts_with("failed to read config file"));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        assert_eq!(Config::load_or_default(&missing).unwrap(), Config::default());
    }

    #[test]
    fn load_or_default_reports_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nupcoming_days = \"seven\"\n")
            .unwrap();

        let error = Config::load_or_default(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let result: Result<Config, _> = toml::from_str(r#"_version = "2""#);
        assert!(result.is_err());
    }

    #[test]
    fn empty_file_returns_default() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("keeper.toml");

        let mut config = Config::default();
        config.set_book("elsewhere.yaml");
        config.confirm_shared_phone = false;
        config.save(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("_version = \"1\""));
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn save_replaces_existing_file_in_place() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("keeper.toml");
        std::fs::write(&path, "not toml at all").unwrap();

        Config::default().save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), Config::default());
        let entries = std::fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing").join("keeper.toml");

        let error = Config::default().save(&path).unwrap_err();
        assert!(matches!(error, ConfigError::Write { .. }));
    }
}
