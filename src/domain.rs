//! Domain models for contact management.
//!
//! This module contains the validated field types, notes, contact records,
//! the address book that holds them, and the user configuration. Nothing here
//! prints or logs; every operation returns a value or a typed error.

mod error;
pub use error::ErrorKind;

mod field;
pub use field::{Address, Field, Name, Tag, Title, UnknownFieldError, ValidationError};

mod phone;
pub use phone::Phone;

mod email;
pub use email::Email;

/// Birthday parsing and anniversary arithmetic.
pub mod birthday;
pub use birthday::Birthday;

mod note;
pub use note::Note;

mod record;
pub use record::{EditableField, OptionalField, Record, RecordError};

mod address_book;
pub use address_book::{AddressBook, BookError, SearchField};

mod config;
pub use config::{Config, ConfigError};
