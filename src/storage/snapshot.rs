//! The on-disk representation of an address book.
//!
//! A snapshot is a plain data copy of every contact. Converting it back into
//! an [`AddressBook`] re-validates every value, so a hand-edited file cannot
//! smuggle an invalid contact into the domain.

use serde::{Deserialize, Serialize};

use crate::domain::{AddressBook, Birthday, Field, Record, RecordError};

/// A serializable copy of an [`AddressBook`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SnapshotVersion", into = "SnapshotVersion")]
pub struct Snapshot {
    contacts: Vec<StoredContact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredContact {
    name: String,

    #[serde(default, skip_serializing_if = "is_false")]
    owner: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    phones: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    birthday: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    notes: Vec<StoredNote>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredNote {
    title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

/// Errors raised when a snapshot does not describe a valid address book.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RestoreError {
    /// A stored contact holds an invalid value.
    #[error("invalid contact '{name}': {source}")]
    InvalidContact {
        /// The name of the contact, as stored.
        name: String,
        /// What was wrong with it.
        source: RecordError,
    },

    /// Two stored contacts share a name.
    #[error("contact '{0}' is stored more than once")]
    DuplicateContact(String),
}

impl Snapshot {
    /// Number of contacts in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Whether the snapshot holds no contacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Rebuilds the address book, validating every stored value.
    ///
    /// Birthdays are only checked for their format: a birthday that was valid
    /// when it was saved stays loadable as the years go by.
    ///
    /// # Errors
    ///
    /// - [`RestoreError::InvalidContact`] if a value fails validation or a
    ///   contact repeats a phone number or note title
    /// - [`RestoreError::DuplicateContact`] if two contacts share a name
    pub fn into_book(self) -> Result<AddressBook, RestoreError> {
        let mut book = AddressBook::new();
        for contact in self.contacts {
            let name = contact.name.clone();
            let record = contact
                .into_record()
                .map_err(|source| RestoreError::InvalidContact {
                    name: name.clone(),
                    source,
                })?;
            if book.add_record(record).is_some() {
                return Err(RestoreError::DuplicateContact(name.trim().to_string()));
            }
        }
        Ok(book)
    }
}

impl StoredContact {
    fn into_record(self) -> Result<Record, RecordError> {
        let mut record = Record::new(&self.name)?;
        record.set_owner(self.owner);

        for phone in &self.phones {
            record.add_phone(phone)?;
        }
        if let Some(email) = &self.email {
            record.add_email(email)?;
        }
        if let Some(birthday) = &self.birthday {
            record.set_birthday(Birthday::restore(birthday)?);
        }
        if let Some(address) = &self.address {
            record.add_address(address)?;
        }
        for note in &self.notes {
            let tags: Vec<&str> = note.tags.iter().map(String::as_str).collect();
            record.add_note(&note.title, note.value.as_deref(), &tags)?;
        }

        Ok(record)
    }
}

impl From<&Record> for StoredContact {
    fn from(record: &Record) -> Self {
        Self {
            name: record.name().to_string(),
            owner: record.is_owner(),
            phones: record.phones().iter().map(ToString::to_string).collect(),
            email: record.email().map(ToString::to_string),
            birthday: record.birthday().map(ToString::to_string),
            address: record.address().map(|address| address.value().to_string()),
            notes: record
                .notes()
                .iter()
                .map(|note| StoredNote {
                    title: note.title().to_string(),
                    value: note.value().map(ToString::to_string),
                    tags: note.tags().iter().map(ToString::to_string).collect(),
                })
                .collect(),
        }
    }
}

impl From<&AddressBook> for Snapshot {
    fn from(book: &AddressBook) -> Self {
        Self {
            contacts: book.iter().map(StoredContact::from).collect(),
        }
    }
}

/// The serialized versions of the snapshot.
/// This allows for future changes to the file format without breaking
/// existing address books.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum SnapshotVersion {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        contacts: Vec<StoredContact>,
    },
}

impl From<SnapshotVersion> for Snapshot {
    fn from(version: SnapshotVersion) -> Self {
        match version {
            SnapshotVersion::V1 { contacts } => Self { contacts },
        }
    }
}

impl From<Snapshot> for SnapshotVersion {
    fn from(snapshot: Snapshot) -> Self {
        Self::V1 {
            contacts: snapshot.contacts,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::ErrorKind;

    fn sample_book() -> AddressBook {
        let mut alice = Record::new("Alice").unwrap();
        alice.set_owner(true);
        alice.add_phone("0501234567").unwrap();
        alice.add_email("alice@example.com").unwrap();
        alice.set_birthday(
            Birthday::parse_on("20.03.1990", NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
                .unwrap(),
        );
        alice.add_address("Kyiv").unwrap();
        alice
            .add_note("Groceries", Some("Buy milk"), &["food"])
            .unwrap();

        let mut book = AddressBook::new();
        book.add_record(alice);
        book.add_record(Record::new("Bob").unwrap());
        book
    }

    #[test]
    fn writes_versioned_contacts_and_omits_absent_fields() {
        let yaml = serde_yaml::to_string(&Snapshot::from(&sample_book())).unwrap();

        assert!(yaml.starts_with("_version: '1'\ncontacts:\n"));
        assert!(yaml.contains("- name: Alice\n  owner: true\n"));
        assert!(yaml.contains("birthday: 20.03.1990\n"));
        assert!(yaml.contains("title: Groceries"));
        assert!(yaml.ends_with("- name: Bob\n"));
    }

    #[test]
    fn restores_the_same_book() {
        let book = sample_book();
        let yaml = serde_yaml::to_string(&Snapshot::from(&book)).unwrap();
        let snapshot: Snapshot = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(snapshot.into_book().unwrap(), book);
    }

    #[test]
    fn missing_version_is_rejected() {
        let result: Result<Snapshot, _> = serde_yaml::from_str("contacts: []\n");
        assert!(result.is_err());
    }

    #[test]
    fn stored_values_are_validated() {
        let yaml = "_version: '1'\ncontacts:\n- name: Alice\n  email: not-an-email\n";
        let snapshot: Snapshot = serde_yaml::from_str(yaml).unwrap();

        let error = snapshot.into_book().unwrap_err();
        match error {
            RestoreError::InvalidContact { name, source } => {
                assert_eq!(name, "Alice");
                assert_eq!(source.kind(), ErrorKind::InvalidFormat);
            }
            RestoreError::DuplicateContact(_) => panic!("unexpected error: {error:?}"),
        }
    }

    #[test]
    fn stored_phones_are_normalized() {
        let yaml = "_version: '1'\ncontacts:\n- name: Alice\n  phones: ['050 123 45 67']\n";
        let snapshot: Snapshot = serde_yaml::from_str(yaml).unwrap();
        let book = snapshot.into_book().unwrap();
        assert_eq!(
            book.find_contact("Alice").unwrap().phones()[0].as_str(),
            "+380501234567"
        );
    }

    #[test]
    fn duplicate_contacts_are_rejected() {
        let yaml = "_version: '1'\ncontacts:\n- name: Alice\n- name: ' Alice '\n";
        let snapshot: Snapshot = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            snapshot.into_book().unwrap_err(),
            RestoreError::DuplicateContact("Alice".to_string())
        );
    }

    #[test]
    fn old_birthdays_stay_loadable() {
        let yaml = "_version: '1'\ncontacts:\n- name: Elder\n  birthday: 01.01.1900\n";
        let snapshot: Snapshot = serde_yaml::from_str(yaml).unwrap();
        let book = snapshot.into_book().unwrap();
        assert_eq!(
            book.find_contact("Elder").unwrap().birthday().unwrap().to_string(),
            "01.01.1900"
        );
    }
}
