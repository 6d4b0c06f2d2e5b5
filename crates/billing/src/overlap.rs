//! Active-day overlap between a membership and a billing month
//!
//! A membership covers `[activated_on, deactivated_on]` (open-ended when not
//! deactivated) and a month covers `[first_day, last_day]`. Both ends are
//! inclusive, so the billable days are the length of the intersection:
//!
//! ```text
//! start = max(activated_on, first_day)
//! end   = min(deactivated_on or last_day, last_day)
//! days  = if start > end { 0 } else { end - start + 1 }
//! ```
//!
//! This one rule covers users active the whole month, users leaving or
//! joining mid-month, and users joining and leaving inside the month.

use time::Date;

use crate::month::BillingMonth;

/// Inclusive range of calendar dates, `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Returns `None` when `start` is after `end`
    pub fn new(start: Date, end: Date) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn of_month(month: &BillingMonth) -> Self {
        Self {
            start: month.first_day(),
            end: month.last_day(),
        }
    }

    /// Number of days in the range, counting both ends
    pub fn len_days(&self) -> u32 {
        // start <= end, so the difference is never negative
        let days = (self.end - self.start).whole_days() + 1;
        u32::try_from(days).unwrap_or(u32::MAX)
    }

    /// Days of `[activated_on, deactivated_on]` that fall inside this range.
    ///
    /// An open interval (`deactivated_on == None`) is clipped at `self.end`.
    pub fn overlap_days(&self, activated_on: Date, deactivated_on: Option<Date>) -> u32 {
        let start = activated_on.max(self.start);
        let end = deactivated_on.unwrap_or(self.end).min(self.end);
        DateRange::new(start, end).map_or(0, |overlap| overlap.len_days())
    }
}
