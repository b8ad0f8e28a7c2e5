//! A file backed address book.

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::instrument;

use crate::{domain::AddressBook, storage::snapshot::RestoreError, storage::Snapshot};

/// Loads and saves an [`AddressBook`] as a YAML snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    path: PathBuf,
}

/// Errors raised while loading an address book.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying IO error.
        source: io::Error,
    },

    /// The file is not a valid snapshot.
    #[error("failed to parse {path}: {source}")]
    Yaml {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying YAML error.
        source: serde_yaml::Error,
    },

    /// The snapshot holds invalid contacts.
    #[error("{path} holds an invalid address book: {source}")]
    Restore {
        /// The file being restored.
        path: PathBuf,
        /// What was wrong with its content.
        source: RestoreError,
    },
}

/// Errors raised while saving an address book.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The file or its directory could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        /// The file being written.
        path: PathBuf,
        /// The underlying IO error.
        source: io::Error,
    },

    /// The address book could not be serialized.
    #[error("failed to serialize the address book: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Store {
    /// Creates a store for the snapshot file at `path`.
    ///
    /// Nothing is read or written until [`Store::load`] or [`Store::save`] is
    /// called.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the address book from disk.
    ///
    /// A missing file is an empty address book.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid snapshot,
    /// or holds invalid contacts.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<AddressBook, LoadError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No address book found, starting empty");
                return Ok(AddressBook::new());
            }
            Err(source) => {
                return Err(LoadError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let snapshot: Snapshot =
            serde_yaml::from_reader(BufReader::new(file)).map_err(|source| LoadError::Yaml {
                path: self.path.clone(),
                source,
            })?;
        let book = snapshot.into_book().map_err(|source| LoadError::Restore {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(contacts = book.len(), "Loaded address book");
        Ok(book)
    }

    /// Writes the address book to disk.
    ///
    /// The snapshot is written to a temporary file next to the target and then
    /// renamed over it, so the previous file stays intact if writing fails.
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if the book cannot be serialized or the file cannot be
    /// written.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn save(&self, book: &AddressBook) -> Result<(), SaveError> {
        let io_error = |source: io::Error| SaveError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(io_error)?;
            tracing::info!("Created directory {}", dir.display());
        }

        let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            serde_yaml::to_writer(&mut writer, &Snapshot::from(book))?;
            writer.flush().map_err(io_error)?;
        }
        file.as_file().sync_all().map_err(io_error)?;
        file.persist(&self.path).map_err(|e| io_error(e.error))?;

        tracing::debug!(contacts = book.len(), "Saved address book");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Record;

    fn book_with(names: &[&str]) -> AddressBook {
        let mut book = AddressBook::new();
        for name in names {
            let mut record = Record::new(name).unwrap();
            record.add_phone("0501234567").unwrap();
            book.add_record(record);
        }
        book
    }

    #[test]
    fn missing_file_is_an_empty_book() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path().join("book.yaml"));

        let book = store.load().unwrap();
        assert!(book.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path().join("book.yaml"));
        let book = book_with(&["Alice", "Bob"]);

        store.save(&book).unwrap();
        assert_eq!(store.load().unwrap(), book);
    }

    #[test]
    fn save_replaces_previous_content() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path().join("book.yaml"));

        store.save(&book_with(&["Alice", "Bob"])).unwrap();
        store.save(&book_with(&["Carol"])).unwrap();

        let names: Vec<_> = store.load().unwrap().names().map(str::to_string).collect();
        assert_eq!(names, ["Carol"]);

        let leftovers = fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn save_creates_parent_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path().join("nested/dir/book.yaml"));

        store.save(&book_with(&["Alice"])).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn corrupt_file_is_a_yaml_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("book.yaml");
        fs::write(&path, "contacts: [unterminated").unwrap();

        let error = Store::new(&path).load().unwrap_err();
        assert!(matches!(error, LoadError::Yaml { .. }));
    }

    #[test]
    fn invalid_contact_is_a_restore_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("book.yaml");
        fs::write(&path, "_version: '1'\ncontacts:\n- name: ''\n").unwrap();

        let error = Store::new(&path).load().unwrap_err();
        assert!(matches!(error, LoadError::Restore { .. }));
    }
}
