use std::{fmt, str::FromStr};

use crate::domain::{
    Address, Birthday, Email, ErrorKind, Field, Name, Note, Phone, Tag, Title, UnknownFieldError,
    ValidationError,
};

/// One contact and everything known about it.
///
/// A record is created with a name; every other field is attached, edited or
/// removed independently. Each mutating method either applies the whole
/// change or returns an error and leaves the record untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub(crate) name: Name,
    pub(crate) phones: Vec<Phone>,
    pub(crate) email: Option<Email>,
    pub(crate) birthday: Option<Birthday>,
    pub(crate) address: Option<Address>,
    pub(crate) notes: Vec<Note>,
    pub(crate) owner: bool,
}

/// Errors raised when modifying a [`Record`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    /// A value failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The phone number is already recorded on this contact.
    #[error("phone number {0} is already recorded")]
    DuplicatePhone(Phone),

    /// A note with this title already exists on this contact.
    #[error("a note titled '{0}' already exists")]
    DuplicateTitle(String),

    /// The phone number is not recorded on this contact.
    #[error("phone number {0} not found")]
    PhoneNotFound(String),

    /// No note with this title exists on this contact.
    #[error("note '{0}' not found")]
    NoteNotFound(String),
}

impl RecordError {
    /// The category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(error) => error.kind(),
            Self::DuplicatePhone(_) => ErrorKind::DuplicatePhone,
            Self::DuplicateTitle(_) => ErrorKind::DuplicateTitle,
            Self::PhoneNotFound(_) | Self::NoteNotFound(_) => ErrorKind::NotFound,
        }
    }
}

impl Record {
    /// Creates a record with only a name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyValue`] if the name is blank.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Ok(Self::with_name(Name::parse(name)?))
    }

    /// Creates a record from an already validated name.
    #[must_use]
    pub const fn with_name(name: Name) -> Self {
        Self {
            name,
            phones: Vec::new(),
            email: None,
            birthday: None,
            address: None,
            notes: Vec::new(),
            owner: false,
        }
    }

    /// The contact's name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// The contact's phone numbers, in the order they were added.
    #[must_use]
    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    /// The contact's email address.
    #[must_use]
    pub const fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    /// The contact's birthday.
    #[must_use]
    pub const fn birthday(&self) -> Option<&Birthday> {
        self.birthday.as_ref()
    }

    /// The contact's address.
    #[must_use]
    pub const fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// The contact's notes, in the order they were added.
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Whether this record describes the owner of the address book.
    #[must_use]
    pub const fn is_owner(&self) -> bool {
        self.owner
    }

    /// Marks or unmarks this record as the owner's own.
    pub const fn set_owner(&mut self, owner: bool) {
        self.owner = owner;
    }

    /// Changes the contact's name.
    ///
    /// The record does not know which collection holds it, so this is not
    /// exposed outside the crate. Contacts in an
    /// [`AddressBook`](crate::AddressBook) are renamed with
    /// [`AddressBook::rename`](crate::AddressBook::rename), which keeps names
    /// unique.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyValue`] if the new name is blank.
    pub(crate) fn edit_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = Name::parse(name)?;
        Ok(())
    }

    pub(crate) fn set_name(&mut self, name: Name) {
        self.name = name;
    }

    fn phone_position(&self, number: &str) -> Option<usize> {
        let normalized = Phone::normalize(number);
        self.phones.iter().position(|p| p.as_str() == normalized)
    }

    /// Adds a phone number.
    ///
    /// # Errors
    ///
    /// - [`RecordError::Validation`] if the number is invalid
    /// - [`RecordError::DuplicatePhone`] if the normalized number is already
    ///   recorded
    pub fn add_phone(&mut self, number: &str) -> Result<&Phone, RecordError> {
        let phone = Phone::parse(number)?;
        if self.phones.contains(&phone) {
            return Err(RecordError::DuplicatePhone(phone));
        }
        let index = self.phones.len();
        self.phones.push(phone);
        Ok(&self.phones[index])
    }

    /// Finds a phone number, accepting any spelling that normalizes to it.
    #[must_use]
    pub fn find_phone(&self, number: &str) -> Option<&Phone> {
        self.phone_position(number).map(|index| &self.phones[index])
    }

    /// Removes a phone number.
    ///
    /// Returns the removed phone, or `None` if the number was not recorded.
    pub fn remove_phone(&mut self, number: &str) -> Option<Phone> {
        self.phone_position(number)
            .map(|index| self.phones.remove(index))
    }

    /// Replaces `old` with `new`, keeping its position in the list.
    ///
    /// # Errors
    ///
    /// - [`RecordError::PhoneNotFound`] if `old` is not recorded
    /// - [`RecordError::Validation`] if `new` is invalid
    /// - [`RecordError::DuplicatePhone`] if `new` is already recorded as a
    ///   different entry
    pub fn edit_phone(&mut self, old: &str, new: &str) -> Result<(), RecordError> {
        let index = self
            .phone_position(old)
            .ok_or_else(|| RecordError::PhoneNotFound(old.trim().to_string()))?;
        let phone = Phone::parse(new)?;

        let collides = self
            .phones
            .iter()
            .enumerate()
            .any(|(i, existing)| i != index && *existing == phone);
        if collides {
            return Err(RecordError::DuplicatePhone(phone));
        }

        self.phones[index] = phone;
        Ok(())
    }

    /// Sorts the phone numbers in ascending order.
    pub fn sort_phones(&mut self) {
        self.phones.sort();
    }

    /// Sets the birthday, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] raised by [`Birthday::parse`].
    pub fn add_birthday(&mut self, birthday: &str) -> Result<(), ValidationError> {
        self.birthday = Some(Birthday::parse(birthday)?);
        Ok(())
    }

    /// Replaces the birthday. Equivalent to [`Record::add_birthday`].
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] raised by [`Birthday::parse`].
    pub fn edit_birthday(&mut self, birthday: &str) -> Result<(), ValidationError> {
        self.add_birthday(birthday)
    }

    /// Sets an already validated birthday.
    pub const fn set_birthday(&mut self, birthday: Birthday) {
        self.birthday = Some(birthday);
    }

    /// Removes the birthday, returning the previous value.
    pub const fn delete_birthday(&mut self) -> Option<Birthday> {
        self.birthday.take()
    }

    /// Sets the email address, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] raised by [`Email::parse`].
    pub fn add_email(&mut self, email: &str) -> Result<(), ValidationError> {
        self.email = Some(Email::parse(email)?);
        Ok(())
    }

    /// Replaces the email address. Equivalent to [`Record::add_email`].
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] raised by [`Email::parse`].
    pub fn edit_email(&mut self, email: &str) -> Result<(), ValidationError> {
        self.add_email(email)
    }

    /// Removes the email address, returning the previous value.
    pub const fn delete_email(&mut self) -> Option<Email> {
        self.email.take()
    }

    /// Sets the address, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyValue`] if the address is blank.
    pub fn add_address(&mut self, address: &str) -> Result<(), ValidationError> {
        self.address = Some(Address::parse(address)?);
        Ok(())
    }

    /// Replaces the address. Equivalent to [`Record::add_address`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyValue`] if the address is blank.
    pub fn edit_address(&mut self, address: &str) -> Result<(), ValidationError> {
        self.add_address(address)
    }

    /// Removes the address, returning the previous value.
    pub const fn delete_address(&mut self) -> Option<Address> {
        self.address.take()
    }

    /// Replaces the value of `field`.
    ///
    /// Crate-internal for the same reason as [`Record::edit_name`]; outside
    /// callers use [`AddressBook::edit_field`](crate::AddressBook::edit_field).
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] raised for the new value.
    pub(crate) fn edit_field(&mut self, field: EditableField, value: &str) -> Result<(), ValidationError> {
        match field {
            EditableField::Name => self.edit_name(value),
            EditableField::Email => self.edit_email(value),
            EditableField::Birthday => self.edit_birthday(value),
            EditableField::Address => self.edit_address(value),
        }
    }

    /// Clears an optional field.
    ///
    /// Returns `true` if the field held a value.
    pub fn clear_field(&mut self, field: OptionalField) -> bool {
        match field {
            OptionalField::Email => self.delete_email().is_some(),
            OptionalField::Birthday => self.delete_birthday().is_some(),
            OptionalField::Address => self.delete_address().is_some(),
        }
    }

    fn note_position(&self, title: &str) -> Option<usize> {
        let title = title.trim();
        self.notes.iter().position(|note| note.title() == title)
    }

    /// Adds a note with the given tags.
    ///
    /// The title and every tag are validated before the note is attached.
    ///
    /// # Errors
    ///
    /// - [`RecordError::Validation`] if the title or a tag is blank
    /// - [`RecordError::DuplicateTitle`] if a note with this title exists
    pub fn add_note(
        &mut self,
        title: &str,
        value: Option<&str>,
        tags: &[&str],
    ) -> Result<&Note, RecordError> {
        let title = Title::parse(title)?;
        if self.note_position(&title).is_some() {
            return Err(RecordError::DuplicateTitle(title.to_string()));
        }
        let tags = tags
            .iter()
            .map(|tag| Tag::parse(tag))
            .collect::<Result<Vec<_>, _>>()?;

        let mut note = Note::with_title(title, value);
        for tag in tags {
            note.add_tag(tag);
        }

        let index = self.notes.len();
        self.notes.push(note);
        Ok(&self.notes[index])
    }

    /// Finds a note by its title.
    #[must_use]
    pub fn find_note_by_title(&self, title: &str) -> Option<&Note> {
        self.note_position(title).map(|index| &self.notes[index])
    }

    /// Removes a note by its title, returning it.
    pub fn remove_note_by_title(&mut self, title: &str) -> Option<Note> {
        self.note_position(title)
            .map(|index| self.notes.remove(index))
    }

    /// Replaces the title and text of a note.
    ///
    /// # Errors
    ///
    /// - [`RecordError::NoteNotFound`] if no note is titled `title`
    /// - [`RecordError::Validation`] if `new_title` is blank
    /// - [`RecordError::DuplicateTitle`] if another note is titled `new_title`
    pub fn edit_note_by_title(
        &mut self,
        title: &str,
        new_title: &str,
        new_value: Option<&str>,
    ) -> Result<(), RecordError> {
        let index = self
            .note_position(title)
            .ok_or_else(|| RecordError::NoteNotFound(title.trim().to_string()))?;
        let new_title = Title::parse(new_title)?;

        if matches!(self.note_position(&new_title), Some(other) if other != index) {
            return Err(RecordError::DuplicateTitle(new_title.to_string()));
        }

        let note = &mut self.notes[index];
        note.set_title(new_title);
        note.set_value(new_value);
        Ok(())
    }

    /// Attaches a tag to the note titled `title`.
    ///
    /// # Errors
    ///
    /// - [`RecordError::NoteNotFound`] if no note is titled `title`
    /// - [`RecordError::Validation`] if the tag is blank
    pub fn add_tag_to_note_by_title(&mut self, title: &str, tag: &str) -> Result<(), RecordError> {
        let index = self
            .note_position(title)
            .ok_or_else(|| RecordError::NoteNotFound(title.trim().to_string()))?;
        let tag = Tag::parse(tag)?;
        self.notes[index].add_tag(tag);
        Ok(())
    }

    /// Removes every occurrence of `tag` from the note titled `title`.
    ///
    /// Returns how many tags were removed, which may be zero.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NoteNotFound`] if no note is titled `title`.
    pub fn remove_tag_from_note_by_title(
        &mut self,
        title: &str,
        tag: &str,
    ) -> Result<usize, RecordError> {
        let index = self
            .note_position(title)
            .ok_or_else(|| RecordError::NoteNotFound(title.trim().to_string()))?;
        Ok(self.notes[index].remove_tag(tag))
    }

    /// The notes carrying `tag`.
    pub fn notes_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Note> + 'a {
        self.notes.iter().filter(move |note| note.has_tag(tag))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Contact name: {}", self.name)?;
        if self.owner {
            write!(f, "\nOwner: yes")?;
        }
        if !self.phones.is_empty() {
            let phones = self
                .phones
                .iter()
                .map(Phone::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            write!(f, "\nPhones: {phones}")?;
        }
        if let Some(email) = &self.email {
            write!(f, "\nEmail: {email}")?;
        }
        if let Some(birthday) = &self.birthday {
            write!(f, "\nBirthday: {birthday}")?;
        }
        if let Some(address) = &self.address {
            write!(f, "\nAddress: {address}")?;
        }
        for note in &self.notes {
            write!(f, "\n{note}")?;
        }
        Ok(())
    }
}

/// The contact fields that can be given a new value by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    /// The contact's name.
    Name,
    /// The email address.
    Email,
    /// The birthday.
    Birthday,
    /// The postal address.
    Address,
}

impl EditableField {
    /// Every editable field.
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Birthday, Self::Address];

    /// The name the field is selected by.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Birthday => "birthday",
            Self::Address => "address",
        }
    }
}

impl FromStr for EditableField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "birthday" => Ok(Self::Birthday),
            "address" => Ok(Self::Address),
            _ => Err(UnknownFieldError::new(s, "name, email, birthday, address")),
        }
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The contact fields that may be absent and can be cleared by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalField {
    /// The email address.
    Email,
    /// The birthday.
    Birthday,
    /// The postal address.
    Address,
}

impl OptionalField {
    /// Every optional field.
    pub const ALL: [Self; 3] = [Self::Email, Self::Birthday, Self::Address];

    /// The name the field is selected by.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Birthday => "birthday",
            Self::Address => "address",
        }
    }
}

impl FromStr for OptionalField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "birthday" => Ok(Self::Birthday),
            "address" => Ok(Self::Address),
            _ => Err(UnknownFieldError::new(s, "email, birthday, address")),
        }
    }
}

impl fmt::Display for OptionalField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn alice() -> Record {
        Record::new("Alice").unwrap()
    }

    #[test]
    fn add_phone_normalizes_local_numbers() {
        let mut record = alice();
        let phone = record.add_phone("0501234567").unwrap();
        assert_eq!(phone.as_str(), "+380501234567");
    }

    #[test]
    fn duplicate_phone_is_rejected_without_change() {
        let mut record = alice();
        record.add_phone("0501234567").unwrap();

        let error = record.add_phone("+38 050 123 45 67").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DuplicatePhone);
        assert_eq!(record.phones().len(), 1);
    }

    #[test]
    fn invalid_phone_keeps_its_validation_kind() {
        let mut record = alice();
        let error = record.add_phone("123").unwrap_err();
        assert!(matches!(error, RecordError::Validation(_)));
        assert_eq!(error.kind(), ErrorKind::InvalidFormat);
        assert!(record.phones().is_empty());
    }

    #[test]
    fn find_and_remove_phone_accept_any_spelling() {
        let mut record = alice();
        record.add_phone("0501234567").unwrap();

        assert!(record.find_phone("050 123 45 67").is_some());
        assert_eq!(
            record.remove_phone("(050) 123-45-67").unwrap().as_str(),
            "+380501234567"
        );
        assert!(record.phones().is_empty());
    }

    #[test]
    fn removing_missing_phone_is_a_no_op() {
        let mut record = alice();
        record.add_phone("0501234567").unwrap();
        assert_eq!(record.remove_phone("0671111111"), None);
        assert_eq!(record.phones().len(), 1);
    }

    #[test]
    fn edit_phone_replaces_in_place() {
        let mut record = alice();
        record.add_phone("0501111111").unwrap();
        record.add_phone("0502222222").unwrap();
        record.add_phone("0503333333").unwrap();

        record.edit_phone("0502222222", "0679999999").unwrap();

        let phones: Vec<_> = record.phones().iter().map(Phone::as_str).collect();
        assert_eq!(
            phones,
            ["+380501111111", "+380679999999", "+380503333333"]
        );
    }

    #[test]
    fn edit_missing_phone_is_not_found() {
        let mut record = alice();
        record.add_phone("0501111111").unwrap();
        let before = record.clone();

        let error = record.edit_phone("0509999999", "0671234567").unwrap_err();
        assert_eq!(error, RecordError::PhoneNotFound("0509999999".to_string()));
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(record, before);
    }

    #[test]
    fn edit_phone_to_another_existing_number_is_duplicate() {
        let mut record = alice();
        record.add_phone("0501111111").unwrap();
        record.add_phone("0502222222").unwrap();
        let before = record.clone();

        let error = record.edit_phone("0501111111", "0502222222").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DuplicatePhone);
        assert_eq!(record, before);
    }

    #[test]
    fn edit_phone_to_its_own_spelling_is_allowed() {
        let mut record = alice();
        record.add_phone("0501111111").unwrap();
        record.edit_phone("0501111111", "+380501111111").unwrap();
        assert_eq!(record.phones().len(), 1);
    }

    #[test]
    fn sort_phones_orders_by_value() {
        let mut record = alice();
        record.add_phone("0673333333").unwrap();
        record.add_phone("0501111111").unwrap();
        record.add_phone("+14155551234").unwrap();
        record.sort_phones();

        let phones: Vec<_> = record.phones().iter().map(Phone::as_str).collect();
        assert_eq!(phones, ["+14155551234", "+380501111111", "+380673333333"]);
    }

    #[test]
    fn failed_edit_keeps_previous_value() {
        let mut record = alice();
        record.add_email("alice@example.com").unwrap();
        assert!(record.edit_email("not an email").is_err());
        assert_eq!(record.email().unwrap().as_str(), "alice@example.com");

        record.add_birthday("20.03.1990").unwrap();
        assert!(record.edit_birthday("1990-03-20").is_err());
        assert_eq!(record.birthday().unwrap().to_string(), "20.03.1990");
    }

    #[test]
    fn delete_optional_fields() {
        let mut record = alice();
        record.add_email("alice@example.com").unwrap();
        record.add_address("Kyiv").unwrap();

        assert!(record.delete_email().is_some());
        assert!(record.delete_email().is_none());
        assert!(record.clear_field(OptionalField::Address));
        assert!(!record.clear_field(OptionalField::Birthday));
        assert!(record.address().is_none());
    }

    #[test]
    fn edit_field_dispatches_by_name() {
        let mut record = alice();
        record
            .edit_field("email".parse().unwrap(), "alice@example.com")
            .unwrap();
        record
            .edit_field(EditableField::Address, "12 Main St")
            .unwrap();
        record.edit_field(EditableField::Name, "Alicia").unwrap();

        assert_eq!(record.email().unwrap().as_str(), "alice@example.com");
        assert_eq!(record.address().unwrap().as_str(), "12 Main St");
        assert_eq!(record.name().as_str(), "Alicia");
    }

    #[test]
    fn unknown_field_names_are_rejected() {
        assert!("phone".parse::<EditableField>().is_err());
        assert!("name".parse::<OptionalField>().is_err());
        assert_eq!("BIRTHDAY".parse::<OptionalField>(), Ok(OptionalField::Birthday));
    }

    #[test]
    fn duplicate_note_title_keeps_first_note() {
        let mut record = alice();
        record.add_note("Groceries", Some("Buy milk"), &[]).unwrap();

        let error = record
            .add_note("Groceries", Some("Other"), &[])
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DuplicateTitle);
        assert_eq!(record.notes().len(), 1);
        assert_eq!(
            record.find_note_by_title("Groceries").unwrap().value(),
            Some("Buy milk")
        );
    }

    #[test]
    fn add_note_validates_tags_first() {
        let mut record = alice();
        let error = record
            .add_note("Trip", None, &["travel", " "])
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::EmptyValue);
        assert!(record.notes().is_empty());
    }

    #[test]
    fn add_note_attaches_tags_in_order() {
        let mut record = alice();
        let note = record
            .add_note("Trip", Some("Pack bags"), &["travel", "summer", "travel"])
            .unwrap();
        let tags: Vec<_> = note.tags().iter().map(Tag::as_str).collect();
        assert_eq!(tags, ["travel", "summer", "travel"]);
    }

    #[test]
    fn edit_note_renames_and_replaces_text() {
        let mut record = alice();
        record.add_note("Groceries", Some("Buy milk"), &["food"]).unwrap();

        record
            .edit_note_by_title("Groceries", "Shopping", Some("Buy bread"))
            .unwrap();

        assert!(record.find_note_by_title("Groceries").is_none());
        let note = record.find_note_by_title("Shopping").unwrap();
        assert_eq!(note.value(), Some("Buy bread"));
        assert!(note.has_tag("food"));
    }

    #[test]
    fn edit_note_errors() {
        let mut record = alice();
        record.add_note("One", None, &[]).unwrap();
        record.add_note("Two", None, &[]).unwrap();
        let before = record.clone();

        assert_eq!(
            record
                .edit_note_by_title("Three", "Four", None)
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            record
                .edit_note_by_title("One", "Two", None)
                .unwrap_err()
                .kind(),
            ErrorKind::DuplicateTitle
        );
        assert_eq!(record, before);

        record.edit_note_by_title("One", "One", Some("text")).unwrap();
        assert_eq!(record.find_note_by_title("One").unwrap().value(), Some("text"));
    }

    #[test]
    fn tags_on_notes_by_title() {
        let mut record = alice();
        record.add_note("Trip", None, &[]).unwrap();

        record.add_tag_to_note_by_title("Trip", "travel").unwrap();
        record.add_tag_to_note_by_title("Trip", "travel").unwrap();
        assert_eq!(record.notes_with_tag("travel").count(), 1);

        assert_eq!(record.remove_tag_from_note_by_title("Trip", "travel"), Ok(2));
        assert_eq!(record.remove_tag_from_note_by_title("Trip", "travel"), Ok(0));
        assert_eq!(
            record
                .add_tag_to_note_by_title("Missing", "x")
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn remove_note_by_title() {
        let mut record = alice();
        record.add_note("Trip", None, &[]).unwrap();
        assert!(record.remove_note_by_title("Trip").is_some());
        assert!(record.remove_note_by_title("Trip").is_none());
    }

    #[test]
    fn display_omits_absent_fields() {
        let record = alice();
        assert_eq!(record.to_string(), "Contact name: Alice");
    }

    #[test]
    fn display_lists_every_field_in_order() {
        let mut record = alice();
        record.set_owner(true);
        record.add_phone("0501234567").unwrap();
        record.add_phone("+14155551234").unwrap();
        record.add_email("alice@example.com").unwrap();
        record.set_birthday(
            Birthday::parse_on("20.03.1990", NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
                .unwrap(),
        );
        record.add_address("Kyiv, Khreshchatyk 1").unwrap();
        record
            .add_note("Groceries", Some("Buy milk"), &["food", "weekly"])
            .unwrap();
        record.add_note("Call", None, &[]).unwrap();

        assert_eq!(
            record.to_string(),
            "Contact name: Alice\n\
             Owner: yes\n\
             Phones: +380501234567; +14155551234\n\
             Email: alice@example.com\n\
             Birthday: 20.03.1990\n\
             Address: Kyiv, Khreshchatyk 1\n\
             Note: [Groceries]: Buy milk\n\
             Tags: food, weekly\n\
             Note: [Call]"
        );
    }
}
