use std::{fmt, str::FromStr};

use chrono::{Datelike, Local, Months, NaiveDate};

use crate::domain::{Field, ValidationError};

/// The format birthdays are entered and displayed in.
pub const FORMAT: &str = "%d.%m.%Y";

/// How far back a birthday may lie.
const MAX_AGE: Months = Months::new(100 * 12);

/// A date of birth within the last hundred years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Birthday(NaiveDate);

impl Birthday {
    /// Parses a `DD.MM.YYYY` date and checks it against the given "today".
    ///
    /// The date must not be in the future and must not lie more than one
    /// hundred years before `today`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidFormat`] if `raw` is not a `DD.MM.YYYY` date
    /// - [`ValidationError::OutOfRange`] if the date is outside the window
    pub fn parse_on(raw: &str, today: NaiveDate) -> Result<Self, ValidationError> {
        let date = parse_date(raw)?;
        let earliest = earliest_allowed(today);

        if date < earliest || date > today {
            return Err(ValidationError::OutOfRange {
                value: raw.trim().to_string(),
                earliest: earliest.format(FORMAT).to_string(),
                latest: today.format(FORMAT).to_string(),
            });
        }

        Ok(Self(date))
    }

    /// Parses a stored birthday without the age window check.
    ///
    /// A birthday accepted when it was entered stays loadable once it drifts
    /// past the hundred year mark.
    pub(crate) fn restore(raw: &str) -> Result<Self, ValidationError> {
        parse_date(raw).map(Self)
    }

    /// The date of birth.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// The next anniversary falling on or after `today`.
    ///
    /// Birthdays on the 29th of February are celebrated on the 28th in
    /// non-leap years.
    #[must_use]
    pub fn next_occurrence(&self, today: NaiveDate) -> NaiveDate {
        let this_year = anniversary(self.0, today.year());
        if this_year < today {
            anniversary(self.0, today.year() + 1)
        } else {
            this_year
        }
    }

    /// Number of days from `today` until the next anniversary.
    ///
    /// Zero when the birthday is today.
    #[must_use]
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        (self.next_occurrence(today) - today).num_days()
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, FORMAT).map_err(|_| ValidationError::InvalidFormat {
        field: Birthday::LABEL,
        value: trimmed.to_string(),
        expected: "a date formatted as DD.MM.YYYY",
    })
}

fn earliest_allowed(today: NaiveDate) -> NaiveDate {
    today.checked_sub_months(MAX_AGE).unwrap_or(NaiveDate::MIN)
}

fn anniversary(birth: NaiveDate, year: i32) -> NaiveDate {
    birth
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
        .unwrap_or(birth)
}

impl Field for Birthday {
    type Value = NaiveDate;

    const LABEL: &'static str = "birthday";

    fn parse(raw: &str) -> Result<Self, ValidationError> {
        Self::parse_on(raw, Local::now().date_naive())
    }

    fn value(&self) -> &NaiveDate {
        &self.0
    }
}

impl FromStr for Birthday {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::ErrorKind;

    fn date(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn parses_and_renders_day_month_year() {
        let birthday = Birthday::parse_on("20.03.1990", date(15, 3, 2024)).unwrap();
        assert_eq!(birthday.date(), date(20, 3, 1990));
        assert_eq!(birthday.to_string(), "20.03.1990");
    }

    #[test_case("1990-03-20"; "iso format")]
    #[test_case("20/03/1990"; "slashes")]
    #[test_case("32.01.1990"; "day out of range")]
    #[test_case("29.02.1991"; "not a leap year")]
    #[test_case("20.03.1990 noon"; "trailing text")]
    #[test_case(""; "empty")]
    fn rejects_malformed_dates(raw: &str) {
        let error = Birthday::parse_on(raw, date(15, 3, 2024)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidFormat);
    }

    #[test_case("16.03.2024"; "tomorrow")]
    #[test_case("01.01.2030"; "future year")]
    #[test_case("14.03.1924"; "one day more than a century")]
    #[test_case("01.01.1900"; "long ago")]
    fn rejects_dates_outside_window(raw: &str) {
        let error = Birthday::parse_on(raw, date(15, 3, 2024)).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::OutOfRange);
    }

    #[test_case("15.03.2024"; "today")]
    #[test_case("15.03.1924"; "exactly a century ago")]
    fn accepts_window_bounds(raw: &str) {
        assert!(Birthday::parse_on(raw, date(15, 3, 2024)).is_ok());
    }

    #[test]
    fn window_start_is_clamped_on_leap_day() {
        let today = date(29, 2, 2000);
        assert!(Birthday::parse_on("28.02.1900", today).is_ok());
        assert_eq!(
            Birthday::parse_on("27.02.1900", today).unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
    }

    #[test]
    fn out_of_range_message_names_the_window() {
        let error = Birthday::parse_on("16.03.2024", date(15, 3, 2024)).unwrap_err();
        assert_eq!(
            error.to_string(),
            "birthday 16.03.2024 must be between 15.03.1924 and 15.03.2024"
        );
    }

    #[test]
    fn restore_skips_the_window() {
        assert!(Birthday::restore("01.01.1900").is_ok());
        assert!(Birthday::restore("1900-01-01").is_err());
    }

    #[test]
    fn next_occurrence_later_this_year() {
        let birthday = Birthday::parse_on("20.03.1990", date(15, 3, 2024)).unwrap();
        assert_eq!(birthday.next_occurrence(date(15, 3, 2024)), date(20, 3, 2024));
        assert_eq!(birthday.days_until(date(15, 3, 2024)), 5);
    }

    #[test]
    fn next_occurrence_rolls_into_next_year() {
        let birthday = Birthday::parse_on("20.03.1990", date(25, 3, 2024)).unwrap();
        assert_eq!(birthday.next_occurrence(date(25, 3, 2024)), date(20, 3, 2025));
        assert_eq!(birthday.days_until(date(25, 3, 2024)), 360);
    }

    #[test]
    fn next_occurrence_today_is_zero_days_away() {
        let birthday = Birthday::parse_on("15.03.1990", date(15, 3, 2024)).unwrap();
        assert_eq!(birthday.days_until(date(15, 3, 2024)), 0);
    }

    #[test]
    fn leap_day_birthday_moves_to_february_28th() {
        let birthday = Birthday::parse_on("29.02.2000", date(1, 2, 2023)).unwrap();
        assert_eq!(birthday.next_occurrence(date(1, 2, 2023)), date(28, 2, 2023));
        assert_eq!(birthday.next_occurrence(date(1, 2, 2024)), date(29, 2, 2024));
    }
}
