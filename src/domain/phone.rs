use std::{fmt, ops::Deref, str::FromStr, sync::LazyLock};

use regex::Regex;

use crate::domain::{Field, ValidationError};

static INTERNATIONAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+\d{10,15}$").expect("phone pattern must compile"));

/// A phone number in international format.
///
/// The stored value is always normalized: a `+` followed by 10 to 15 digits.
/// Local numbers without a country code are assumed to be Ukrainian, so
/// `050 123 45 67` is stored as `+380501234567`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Phone(String);

impl Phone {
    /// Normalizes a raw phone number into international form.
    ///
    /// Everything except digits and a leading `+` is removed. Numbers that
    /// already carry a `+` are kept as they are. Otherwise the missing country
    /// code is inferred from the number of digits:
    ///
    /// | digits                  | prefix |
    /// |-------------------------|--------|
    /// | 9                       | `+380` |
    /// | 10                      | `+38`  |
    /// | 11, starting with `80`  | `+3`   |
    /// | 12                      | `+`    |
    /// | anything else           | `+38`  |
    ///
    /// The result is not validated; see [`Phone::is_valid`].
    ///
    /// ```
    /// use keeper::domain::Phone;
    ///
    /// assert_eq!(Phone::normalize("050 123-45-67"), "+380501234567");
    /// assert_eq!(Phone::normalize("+1 (415) 555-1234"), "+14155551234");
    /// ```
    #[must_use]
    pub fn normalize(raw: &str) -> String {
        let trimmed = raw.trim();
        let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();

        if trimmed.starts_with('+') {
            return format!("+{digits}");
        }

        let prefix = match digits.len() {
            9 => "+380",
            11 if digits.starts_with("80") => "+3",
            12 => "+",
            _ => "+38",
        };

        format!("{prefix}{digits}")
    }

    /// Checks whether `value` is a normalized international number.
    #[must_use]
    pub fn is_valid(value: &str) -> bool {
        INTERNATIONAL.is_match(value)
    }

    /// Returns the normalized number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Field for Phone {
    type Value = str;

    const LABEL: &'static str = "phone number";

    fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = Self::normalize(raw);
        if !Self::is_valid(&normalized) {
            return Err(ValidationError::InvalidFormat {
                field: Self::LABEL,
                value: raw.trim().to_string(),
                expected: "'+' followed by 10 to 15 digits",
            });
        }
        Ok(Self(normalized))
    }

    fn value(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Phone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Phone {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::ErrorKind;

    #[test_case("0501234567", "+380501234567"; "ten digits")]
    #[test_case("501234567", "+380501234567"; "nine digits")]
    #[test_case("80501234567", "+380501234567"; "eleven digits with 80")]
    #[test_case("380501234567", "+380501234567"; "twelve digits")]
    #[test_case("12345678901", "+3812345678901"; "eleven digits without 80")]
    #[test_case("050-123-45-67", "+380501234567"; "dashes")]
    #[test_case("(050) 123 45 67", "+380501234567"; "brackets and spaces")]
    #[test_case("+38 (050) 123-45-67", "+380501234567"; "formatted international")]
    #[test_case("+1 (415) 555-1234", "+14155551234"; "foreign with plus")]
    #[test_case("  +442071234567  ", "+442071234567"; "surrounding whitespace")]
    fn valid_numbers_are_normalized(raw: &str, expected: &str) {
        let phone = Phone::parse(raw).unwrap();
        assert_eq!(phone.as_str(), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("12345"; "too short")]
    #[test_case("+123456789"; "nine digits after plus")]
    #[test_case("+1234567890123456"; "sixteen digits")]
    #[test_case("12345678901234"; "fourteen digits gain a prefix")]
    #[test_case("phone"; "letters")]
    fn invalid_numbers_are_rejected(raw: &str) {
        let error = Phone::parse(raw).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn plus_only_counts_at_the_start() {
        assert_eq!(Phone::normalize("050+1234567"), "+380501234567");
    }

    #[test_case("+1234567890"; "ten digits")]
    #[test_case("+380501234567"; "twelve digits")]
    #[test_case("+123456789012345"; "fifteen digits")]
    fn normalized_numbers_are_stable(value: &str) {
        assert!(Phone::is_valid(value));
        assert_eq!(Phone::normalize(value), value);
        assert_eq!(Phone::parse(value).unwrap().as_str(), value);
    }

    #[test]
    fn equivalent_spellings_are_equal() {
        assert_eq!(
            Phone::parse("050 123 45 67").unwrap(),
            Phone::parse("+380501234567").unwrap()
        );
    }
}
