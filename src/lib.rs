//! Offline contact management
//!
//! Contacts are validated records kept in an [`AddressBook`] and persisted
//! as a single YAML file by a [`Store`].

pub mod domain;
pub use domain::{AddressBook, BookError, Config, ErrorKind, Note, Record, RecordError};

/// Filesystem persistence for address books.
pub mod storage;
pub use storage::Store;
