use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

use crate::domain::ErrorKind;

/// A validated scalar value attached to a contact.
///
/// Fields are only ever built through [`Field::parse`], so holding one means
/// the value passed validation. Replacing a value means parsing a new one.
pub trait Field: fmt::Display + Sized {
    /// The type of the validated value.
    type Value: ?Sized;

    /// Human-readable name of the field, used in error messages.
    const LABEL: &'static str;

    /// Validates `raw` and builds the field from it.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the rule that `raw` violates.
    fn parse(raw: &str) -> Result<Self, ValidationError>;

    /// The validated value.
    fn value(&self) -> &Self::Value;
}

/// Errors raised while turning raw input into a [`Field`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A mandatory value was blank after trimming.
    #[error("{field} cannot be empty")]
    EmptyValue {
        /// The field that was left blank.
        field: &'static str,
    },

    /// The value does not match the expected pattern.
    #[error("invalid {field} '{value}': expected {expected}")]
    InvalidFormat {
        /// The field being validated.
        field: &'static str,
        /// The rejected input.
        value: String,
        /// Description of the accepted format.
        expected: &'static str,
    },

    /// The date lies outside the accepted window.
    #[error("birthday {value} must be between {earliest} and {latest}")]
    OutOfRange {
        /// The rejected date, as entered.
        value: String,
        /// The earliest accepted date.
        earliest: String,
        /// The latest accepted date.
        latest: String,
    },
}

impl ValidationError {
    /// The category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyValue { .. } => ErrorKind::EmptyValue,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
        }
    }
}

/// Error returned when a field selector names no known field.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown field '{name}', expected one of: {expected}")]
pub struct UnknownFieldError {
    name: String,
    expected: &'static str,
}

impl UnknownFieldError {
    pub(crate) fn new(name: &str, expected: &'static str) -> Self {
        Self {
            name: name.to_string(),
            expected,
        }
    }
}

/// Trims `raw` and rejects it if nothing is left.
fn non_empty(field: &'static str, raw: &str) -> Result<NonEmptyString, ValidationError> {
    NonEmptyString::new(raw.trim().to_string()).map_err(|_| ValidationError::EmptyValue { field })
}

macro_rules! text_field {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $name(NonEmptyString);

        impl $name {
            /// Returns the string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl Field for $name {
            type Value = str;

            const LABEL: &'static str = $label;

            fn parse(raw: &str) -> Result<Self, ValidationError> {
                non_empty(Self::LABEL, raw).map(Self)
            }

            fn value(&self) -> &str {
                self.as_str()
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

text_field!(
    /// The name of a contact.
    ///
    /// Names are unique within an address book and act as the contact's key.
    Name,
    "name"
);

text_field!(
    /// A free-text postal address.
    Address,
    "address"
);

text_field!(
    /// A label attached to a note.
    Tag,
    "tag"
);

text_field!(
    /// The title of a note, unique among the notes of one contact.
    Title,
    "note title"
);

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(""; "empty")]
    #[test_case("   "; "spaces")]
    #[test_case("\t\n"; "tab and newline")]
    fn blank_names_are_rejected(raw: &str) {
        let error = Name::parse(raw).unwrap_err();
        assert_eq!(error, ValidationError::EmptyValue { field: "name" });
        assert_eq!(error.kind(), ErrorKind::EmptyValue);
    }

    #[test]
    fn text_fields_are_trimmed() {
        let name = Name::parse("  Alice Smith ").unwrap();
        assert_eq!(name.as_str(), "Alice Smith");
        assert_eq!(name.to_string(), "Alice Smith");
    }

    #[test]
    fn labels_appear_in_errors() {
        assert_eq!(
            Address::parse(" ").unwrap_err().to_string(),
            "address cannot be empty"
        );
        assert_eq!(Tag::parse("").unwrap_err().to_string(), "tag cannot be empty");
        assert_eq!(
            Title::parse("").unwrap_err().to_string(),
            "note title cannot be empty"
        );
    }

    #[test]
    fn field_value_matches_display() {
        let address = Address::parse("12 Baker Street, London").unwrap();
        assert_eq!(address.value(), "12 Baker Street, London");
        assert_eq!(address.value(), address.to_string());
    }

    #[test]
    fn from_str_validates() {
        assert!("work".parse::<Tag>().is_ok());
        assert!(" ".parse::<Tag>().is_err());
    }
}
