/// The category of a failed domain operation.
///
/// Every error produced by the domain layer maps onto exactly one kind. The
/// kind survives wrapping, so a [`ValidationError`](super::ValidationError)
/// raised while editing a contact through the
/// [`AddressBook`](super::AddressBook) still reports the kind the validator
/// chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A mandatory value was blank.
    EmptyValue,
    /// A value did not match its expected pattern.
    InvalidFormat,
    /// A birthday fell outside the accepted window.
    OutOfRange,
    /// The phone number is already recorded on the contact.
    DuplicatePhone,
    /// A note with the same title already exists on the contact.
    DuplicateTitle,
    /// Another contact already uses the name.
    DuplicateName,
    /// The referenced contact, phone number or note does not exist.
    NotFound,
}
