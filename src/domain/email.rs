use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

use crate::domain::{Field, ValidationError};

static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,7}$")
        .expect("email pattern must compile")
});

/// An email address of the form `local@domain.tld`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Email(String);

impl Email {
    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Field for Email {
    type Value = str;

    const LABEL: &'static str = "email";

    fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyValue { field: Self::LABEL });
        }
        if !ADDRESS.is_match(trimmed) {
            return Err(ValidationError::InvalidFormat {
                field: Self::LABEL,
                value: trimmed.to_string(),
                expected: "an address like name@example.com",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    fn value(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Email {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
