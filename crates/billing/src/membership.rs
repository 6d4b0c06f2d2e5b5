//! Subscriptions and user memberships
//!
//! Plain value records supplied by the caller. Nothing here talks to storage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::{BillingError, BillingResult};
use crate::month::BillingMonth;
use crate::overlap::DateRange;

/// A customer's active subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    pub customer_id: i64,
    /// Price per active user per month
    pub monthly_price_in_dollars: Decimal,
}

impl Subscription {
    pub fn new(id: i64, customer_id: i64, monthly_price_in_dollars: Decimal) -> Self {
        Self {
            id,
            customer_id,
            monthly_price_in_dollars,
        }
    }

    /// Whether this subscription can produce a non-zero bill
    pub fn is_billable(&self) -> bool {
        self.monthly_price_in_dollars > Decimal::ZERO
    }
}

/// One user's period of access under a customer account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMembership {
    pub id: i64,
    pub customer_id: i64,
    pub name: String,
    /// First day of access (inclusive)
    pub activated_on: Date,
    /// Last billable day (inclusive). `None` while the user is still active.
    #[serde(default)]
    pub deactivated_on: Option<Date>,
}

impl UserMembership {
    /// Create a membership, rejecting a deactivation before the activation
    pub fn new(
        id: i64,
        customer_id: i64,
        name: impl Into<String>,
        activated_on: Date,
        deactivated_on: Option<Date>,
    ) -> BillingResult<Self> {
        let membership = Self {
            id,
            customer_id,
            name: name.into(),
            activated_on,
            deactivated_on,
        };
        membership.validate()?;
        Ok(membership)
    }

    /// A membership that has not been deactivated
    pub fn active_since(
        id: i64,
        customer_id: i64,
        name: impl Into<String>,
        activated_on: Date,
    ) -> Self {
        Self {
            id,
            customer_id,
            name: name.into(),
            activated_on,
            deactivated_on: None,
        }
    }

    /// Check the interval invariant.
    ///
    /// Records built through deserialization skip `new`, so the aggregator
    /// calls this for every user it bills.
    pub fn validate(&self) -> BillingResult<()> {
        match self.deactivated_on {
            Some(deactivated_on) if deactivated_on < self.activated_on => {
                Err(BillingError::InvalidInput(format!(
                    "user {} deactivated on {} before activation on {}",
                    self.id, deactivated_on, self.activated_on
                )))
            }
            _ => Ok(()),
        }
    }

    pub fn is_active_on(&self, date: Date) -> bool {
        self.activated_on <= date && self.deactivated_on.map_or(true, |end| date <= end)
    }

    /// Inclusive days of access within `month`, in `[0, month.days_in_month()]`
    pub fn active_days_in(&self, month: &BillingMonth) -> u32 {
        DateRange::of_month(month).overlap_days(self.activated_on, self.deactivated_on)
    }
}
