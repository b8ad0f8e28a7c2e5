use std::{collections::HashMap, fmt, str::FromStr};

use chrono::{Local, NaiveDate};

use crate::domain::{
    EditableField, ErrorKind, Field, Name, Note, OptionalField, Phone, Record, RecordError,
    UnknownFieldError, ValidationError,
};

/// The collection of all contacts, keyed by name.
///
/// Records are kept in insertion order until [`AddressBook::sort_records`] is
/// called. Names are unique: adding a record under an existing name replaces
/// the old record in place.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AddressBook {
    records: Vec<Record>,
    index: HashMap<String, usize>,
}

/// Errors raised by [`AddressBook`] operations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum BookError {
    /// No contact has this name.
    #[error("contact '{0}' not found")]
    ContactNotFound(String),

    /// Another contact already has this name.
    #[error("a contact named '{0}' already exists")]
    DuplicateName(String),

    /// The change was rejected by the contact itself.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// A value failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl BookError {
    /// The category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ContactNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateName(_) => ErrorKind::DuplicateName,
            Self::Record(error) => error.kind(),
            Self::Validation(error) => error.kind(),
        }
    }
}

impl AddressBook {
    /// Creates an empty address book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of contacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the book holds no contacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the contacts in their current order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// The names of all contacts, in their current order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.name().as_str())
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        // Records reached through `find_contact_mut` can be renamed behind
        // the index's back, so a hit is confirmed and a miss falls back to a
        // scan.
        self.index
            .get(name)
            .copied()
            .filter(|&i| self.records.get(i).is_some_and(|r| r.name().as_str() == name))
            .or_else(|| {
                self.records
                    .iter()
                    .position(|record| record.name().as_str() == name)
            })
    }

    fn reindex(&mut self) {
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.name().to_string(), i))
            .collect();
    }

    /// Inserts a record, keyed by its name.
    ///
    /// If a record with the same name exists it is replaced in place and
    /// returned.
    pub fn add_record(&mut self, record: Record) -> Option<Record> {
        if let Some(index) = self.position(record.name()) {
            return Some(std::mem::replace(&mut self.records[index], record));
        }
        self.index
            .insert(record.name().to_string(), self.records.len());
        self.records.push(record);
        None
    }

    /// Looks up a contact by name.
    #[must_use]
    pub fn find_contact(&self, name: &str) -> Option<&Record> {
        self.position(name).map(|index| &self.records[index])
    }

    /// Looks up a contact by name for modification.
    ///
    /// The returned record cannot be renamed; use [`AddressBook::rename`].
    pub fn find_contact_mut(&mut self, name: &str) -> Option<&mut Record> {
        self.position(name).map(|index| &mut self.records[index])
    }

    /// Looks up a contact by name, failing if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::ContactNotFound`] if no contact has this name.
    pub fn contact(&self, name: &str) -> Result<&Record, BookError> {
        self.find_contact(name)
            .ok_or_else(|| BookError::ContactNotFound(name.trim().to_string()))
    }

    /// Looks up a contact by name for modification, failing if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::ContactNotFound`] if no contact has this name.
    pub fn contact_mut(&mut self, name: &str) -> Result<&mut Record, BookError> {
        self.position(name)
            .map(|index| &mut self.records[index])
            .ok_or_else(|| BookError::ContactNotFound(name.trim().to_string()))
    }

    /// The first contact that has this phone number.
    ///
    /// The input is normalized before comparison.
    #[must_use]
    pub fn find_phone(&self, number: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|record| record.find_phone(number).is_some())
    }

    /// Removes a contact and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::ContactNotFound`] if no contact has this name.
    pub fn delete(&mut self, name: &str) -> Result<Record, BookError> {
        let index = self
            .position(name)
            .ok_or_else(|| BookError::ContactNotFound(name.trim().to_string()))?;
        let record = self.records.remove(index);
        self.reindex();
        Ok(record)
    }

    /// Contacts whose next birthday falls within `window_days` of today.
    #[must_use]
    pub fn get_upcoming_birthdays(&self, window_days: u32) -> Vec<&Record> {
        self.upcoming_birthdays_on(Local::now().date_naive(), window_days)
    }

    /// Contacts whose next birthday falls on or after `today` and at most
    /// `window_days` days later.
    ///
    /// A window of zero selects the contacts whose birthday is `today`.
    /// Contacts are returned in book order.
    #[must_use]
    pub fn upcoming_birthdays_on(&self, today: NaiveDate, window_days: u32) -> Vec<&Record> {
        let window = i64::from(window_days);
        self.records
            .iter()
            .filter(|record| {
                record
                    .birthday()
                    .map(|birthday| birthday.days_until(today))
                    .is_some_and(|days| (0..=window).contains(&days))
            })
            .collect()
    }

    /// Contacts whose `field` equals or contains `value`.
    ///
    /// Matching is case-sensitive. Phone searches also match the normalized
    /// form of `value`, so `050 123 45 67` finds `+380501234567`. Contacts
    /// without the field never match.
    #[must_use]
    pub fn find_contacts_by_field(&self, field: SearchField, value: &str) -> Vec<&Record> {
        let value = value.trim();
        if value.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|record| field.matches(record, value))
            .collect()
    }

    /// Contacts where any searchable field equals or contains `value`.
    #[must_use]
    pub fn find_contacts(&self, value: &str) -> Vec<&Record> {
        let value = value.trim();
        if value.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|record| SearchField::ALL.iter().any(|field| field.matches(record, value)))
            .collect()
    }

    /// Sorts the contacts by name.
    pub fn sort_records(&mut self) {
        self.records.sort_by(|a, b| a.name().cmp(b.name()));
        self.reindex();
    }

    /// Renames a contact, keeping its position and all other data.
    ///
    /// # Errors
    ///
    /// - [`BookError::ContactNotFound`] if `old` names no contact
    /// - [`BookError::Validation`] if `new` is blank
    /// - [`BookError::DuplicateName`] if `new` names a different contact
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), BookError> {
        let index = self
            .position(old)
            .ok_or_else(|| BookError::ContactNotFound(old.trim().to_string()))?;
        let name = Name::parse(new)?;

        if matches!(self.position(&name), Some(other) if other != index) {
            return Err(BookError::DuplicateName(name.to_string()));
        }

        self.records[index].set_name(name);
        self.reindex();
        Ok(())
    }

    /// The contact marked as the owner of the book.
    #[must_use]
    pub fn get_owner(&self) -> Option<&Record> {
        self.records.iter().find(|record| record.is_owner())
    }

    /// Marks the named contact as the owner and clears the flag everywhere
    /// else.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::ContactNotFound`] if no contact has this name.
    pub fn set_owner(&mut self, name: &str) -> Result<(), BookError> {
        let index = self
            .position(name)
            .ok_or_else(|| BookError::ContactNotFound(name.trim().to_string()))?;
        for (i, record) in self.records.iter_mut().enumerate() {
            record.set_owner(i == index);
        }
        Ok(())
    }

    /// Replaces one field of the named contact.
    ///
    /// Renaming goes through [`AddressBook::rename`].
    ///
    /// # Errors
    ///
    /// Returns [`BookError::ContactNotFound`] if no contact has this name, or
    /// the error raised for the new value.
    pub fn edit_field(
        &mut self,
        name: &str,
        field: EditableField,
        value: &str,
    ) -> Result<(), BookError> {
        match field {
            EditableField::Name => self.rename(name, value),
            other => Ok(self.contact_mut(name)?.edit_field(other, value)?),
        }
    }

    /// Clears an optional field of the named contact.
    ///
    /// Returns `true` if the field held a value.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::ContactNotFound`] if no contact has this name.
    pub fn clear_field(&mut self, name: &str, field: OptionalField) -> Result<bool, BookError> {
        Ok(self.contact_mut(name)?.clear_field(field))
    }

    /// The first note with this title, together with its contact.
    #[must_use]
    pub fn find_note_by_title(&self, title: &str) -> Option<(&Record, &Note)> {
        self.records.iter().find_map(|record| {
            record
                .find_note_by_title(title)
                .map(|note| (record, note))
        })
    }

    /// Every note carrying `tag`, together with its contact.
    #[must_use]
    pub fn find_notes_by_tag<'a>(&'a self, tag: &'a str) -> Vec<(&'a Record, &'a Note)> {
        self.records
            .iter()
            .flat_map(|record| record.notes_with_tag(tag).map(move |note| (record, note)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a AddressBook {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The contact fields [`AddressBook::find_contacts_by_field`] can search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// The contact's name.
    Name,
    /// Any of the phone numbers.
    Phone,
    /// The email address.
    Email,
    /// The birthday, as `DD.MM.YYYY`.
    Birthday,
    /// The postal address.
    Address,
    /// The title or text of any note.
    Notes,
    /// Any tag of any note.
    Tags,
}

impl SearchField {
    /// Every searchable field.
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Phone,
        Self::Email,
        Self::Birthday,
        Self::Address,
        Self::Notes,
        Self::Tags,
    ];

    /// The name the field is selected by.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Birthday => "birthday",
            Self::Address => "address",
            Self::Notes => "notes",
            Self::Tags => "tags",
        }
    }

    fn matches(self, record: &Record, value: &str) -> bool {
        let contains = |text: &str| text == value || text.contains(value);
        match self {
            Self::Name => contains(record.name().as_str()),
            Self::Phone => {
                let normalized = Phone::normalize(value);
                record
                    .phones()
                    .iter()
                    .any(|phone| phone.as_str() == normalized || phone.contains(value))
            }
            Self::Email => record.email().is_some_and(|email| contains(email.as_str())),
            Self::Birthday => record
                .birthday()
                .is_some_and(|birthday| contains(&birthday.to_string())),
            Self::Address => record.address().is_some_and(|address| contains(address.as_str())),
            Self::Notes => record
                .notes()
                .iter()
                .any(|note| contains(note.title()) || note.value().is_some_and(contains)),
            Self::Tags => record
                .notes()
                .iter()
                .flat_map(Note::tags)
                .any(|tag| contains(tag.as_str())),
        }
    }
}

impl FromStr for SearchField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "phone" | "phones" => Ok(Self::Phone),
            "email" => Ok(Self::Email),
            "birthday" => Ok(Self::Birthday),
            "address" => Ok(Self::Address),
            "note" | "notes" => Ok(Self::Notes),
            "tag" | "tags" => Ok(Self::Tags),
            _ => Err(UnknownFieldError::new(
                s,
                "name, phone, email, birthday, address, notes, tags",
            )),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
