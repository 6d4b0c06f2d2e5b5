//! Calendar helpers
//!
//! Pure date arithmetic over `time::Date`. Every function here is total for
//! the dates the billing core works with.

use time::{Date, Duration, Month};

/// Number of calendar days in `month` of `year` (proleptic Gregorian)
pub fn days_in_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

/// Divisible by 4, except centuries not divisible by 400
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// The 1st of the month containing `date`
pub fn first_day_of_month(date: Date) -> Date {
    date.saturating_sub(Duration::days(i64::from(date.day()) - 1))
}

/// The last calendar day of the month containing `date`
pub fn last_day_of_month(date: Date) -> Date {
    let remaining = days_in_month(date.year(), date.month()) - date.day();
    date.saturating_add(Duration::days(i64::from(remaining)))
}

/// The day after `date`, rolling over month and year boundaries.
///
/// Returns `None` only for `Date::MAX`.
pub fn next_day(date: Date) -> Option<Date> {
    date.next_day()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_days_in_month_regular() {
        assert_eq!(days_in_month(2019, Month::January), 31);
        assert_eq!(days_in_month(2022, Month::April), 30);
        assert_eq!(days_in_month(2019, Month::February), 28);
    }

    #[test]
    fn test_days_in_month_leap_years() {
        assert_eq!(days_in_month(2024, Month::February), 29);
        // Century not divisible by 400
        assert_eq!(days_in_month(1900, Month::February), 28);
        assert_eq!(days_in_month(2100, Month::February), 28);
        // Century divisible by 400
        assert_eq!(days_in_month(2000, Month::February), 29);
    }

    #[test]
    fn test_days_in_month_matches_time_crate() {
        for year in [1900, 1999, 2000, 2023, 2024] {
            let mut month = Month::January;
            for _ in 0..12 {
                let first = Date::from_calendar_date(year, month, 1).unwrap();
                let next_first = if month == Month::December {
                    Date::from_calendar_date(year + 1, Month::January, 1).unwrap()
                } else {
                    Date::from_calendar_date(year, month.next(), 1).unwrap()
                };
                assert_eq!(
                    i64::from(days_in_month(year, month)),
                    (next_first - first).whole_days(),
                    "{year}-{month}"
                );
                month = month.next();
            }
        }
    }

    #[test]
    fn test_first_day_of_month() {
        assert_eq!(first_day_of_month(date!(2019 - 03 - 07)), date!(2019 - 03 - 01));
        assert_eq!(first_day_of_month(date!(2019 - 03 - 01)), date!(2019 - 03 - 01));
        assert_eq!(first_day_of_month(date!(2019 - 03 - 31)), date!(2019 - 03 - 01));
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(date!(2019 - 02 - 07)), date!(2019 - 02 - 28));
        assert_eq!(last_day_of_month(date!(2020 - 02 - 01)), date!(2020 - 02 - 29));
        assert_eq!(last_day_of_month(date!(2019 - 12 - 31)), date!(2019 - 12 - 31));
    }

    #[test]
    fn test_next_day_rolls_over() {
        assert_eq!(next_day(date!(2019 - 03 - 07)), Some(date!(2019 - 03 - 08)));
        assert_eq!(next_day(date!(2019 - 02 - 28)), Some(date!(2019 - 03 - 01)));
        assert_eq!(next_day(date!(2020 - 02 - 28)), Some(date!(2020 - 02 - 29)));
        assert_eq!(next_day(date!(2018 - 12 - 31)), Some(date!(2019 - 01 - 01)));
        assert_eq!(next_day(Date::MAX), None);
    }
}
