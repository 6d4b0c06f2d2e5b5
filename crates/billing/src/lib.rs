// Test code patterns (expected in test files):
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! SeatBill Billing Module
//!
//! Computes a customer's monthly bill by prorating a per-user monthly price
//! across the days each user was active in the billing month.
//!
//! ## Features
//!
//! - **Billing Months**: Strict `YYYY-MM` parsing and month bounds
//! - **Calendar Helpers**: Days in month (Gregorian leap rule), first/last/next day
//! - **Overlap**: Inclusive active-day count of a membership within a month
//! - **Invoices**: Daily-rate proration, rounded half-up to cents
//! - **Invariants**: Non-fatal data-quality checks over a run's inputs
//!
//! ## Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use seatbill_billing::{bill_for, Subscription, UserMembership};
//! use time::macros::date;
//!
//! let plan = Subscription::new(1, 1, Decimal::from(4));
//! let users = [
//!     UserMembership::active_since(1, 1, "Employee #1", date!(2018 - 11 - 04)),
//!     UserMembership::active_since(2, 1, "Employee #2", date!(2018 - 12 - 04)),
//! ];
//!
//! let bill = bill_for("2019-01", Some(&plan), &users)?;
//! assert_eq!(bill.to_string(), "8.00");
//! # Ok::<(), seatbill_billing::BillingError>(())
//! ```

pub mod calendar;
pub mod error;
pub mod invariants;
pub mod invoice;
pub mod membership;
pub mod month;
mod overlap;


// Error
pub use error::{BillingError, BillingResult};

// Invoice
pub use invoice::{
    bill_for, compute_bill, daily_rate, invoice_for, to_currency, Invoice, InvoiceLine,
    CURRENCY_SCALE,
};

// Membership
pub use membership::{Subscription, UserMembership};

// Month
pub use month::BillingMonth;

// Invariants
pub use invariants::{
    InvariantCheckSummary, InvariantChecker, InvariantViolation, ViolationSeverity,
};
