//! Billing month
//!
//! A billing month is identified by a `YYYY-MM` token (for example `2022-04`).
//! Parsing is strict: four-digit year, a dash, two-digit zero-padded month.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::calendar;
use crate::error::{BillingError, BillingResult};

/// The calendar month a bill is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillingMonth {
    first_day: Date,
}

impl BillingMonth {
    /// Build a billing month from a year and a 1-based month number
    pub fn new(year: i32, month: u8) -> BillingResult<Self> {
        if year < 1 {
            return Err(BillingError::InvalidInput(format!(
                "year must be positive, got {}",
                year
            )));
        }
        let month = Month::try_from(month).map_err(|_| {
            BillingError::InvalidInput(format!("month must be between 01 and 12, got {:02}", month))
        })?;
        let first_day = Date::from_calendar_date(year, month, 1)?;
        Ok(Self { first_day })
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> Month {
        self.first_day.month()
    }

    /// First calendar day of the month (inclusive)
    pub fn first_day(&self) -> Date {
        self.first_day
    }

    /// Last calendar day of the month (inclusive)
    pub fn last_day(&self) -> Date {
        calendar::last_day_of_month(self.first_day)
    }

    pub fn days_in_month(&self) -> u8 {
        calendar::days_in_month(self.year(), self.month())
    }
}

impl FromStr for BillingMonth {
    type Err = BillingError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid =
            || BillingError::InvalidInput(format!("month token must be YYYY-MM, got {:?}", token));

        let bytes = token.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }
        let (year, month) = (&token[..4], &token[5..]);
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl fmt::Display for BillingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), u8::from(self.month()))
    }
}

impl TryFrom<String> for BillingMonth {
    type Error = BillingError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        token.parse()
    }
}

impl From<BillingMonth> for String {
    fn from(month: BillingMonth) -> Self {
        month.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_parse_valid_token() {
        let month: BillingMonth = "2022-04".parse().unwrap();
        assert_eq!(month.year(), 2022);
        assert_eq!(month.month(), Month::April);
        assert_eq!(month.first_day(), date!(2022 - 04 - 01));
        assert_eq!(month.last_day(), date!(2022 - 04 - 30));
        assert_eq!(month.days_in_month(), 30);
    }

    #[test]
    fn test_display_round_trips_token() {
        for token in ["2019-01", "2022-12", "0042-07"] {
            let month: BillingMonth = token.parse().unwrap();
            assert_eq!(month.to_string(), token);
        }
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        for token in [
            "", "2022", "2022-4", "22-04", "2022/04", "2022-04-01", "20a2-04", "2022-0x",
            "2022-+4", " 2022-04", "2022-00", "2022-13", "0000-01",
        ] {
            let err = token.parse::<BillingMonth>().unwrap_err();
            assert!(
                matches!(err, BillingError::InvalidInput(_)),
                "expected InvalidInput for {:?}",
                token
            );
        }
    }

    #[test]
    fn test_rejects_non_ascii_without_panicking() {
        // 7 bytes, byte 4 is '-', but slicing boundaries fall inside a multibyte char
        assert!("20é-04".parse::<BillingMonth>().is_err());
        assert!("2022-é".parse::<BillingMonth>().is_err());
    }

    #[test]
    fn test_new_validates_components() {
        assert!(BillingMonth::new(2022, 0).is_err());
        assert!(BillingMonth::new(2022, 13).is_err());
        assert!(BillingMonth::new(0, 5).is_err());
        assert!(BillingMonth::new(-3, 5).is_err());
        assert!(BillingMonth::new(2024, 2).is_ok());
    }

    #[test]
    fn test_serde_uses_token() {
        let month: BillingMonth = serde_json::from_str("\"2019-01\"").unwrap();
        assert_eq!(month, BillingMonth::new(2019, 1).unwrap());
        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2019-01\"");
        assert!(serde_json::from_str::<BillingMonth>("\"2019-1\"").is_err());
    }
}
