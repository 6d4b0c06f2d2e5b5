//! Monthly bill computation
//!
//! Prorates a per-user monthly price across the days each user was active in
//! the billing month:
//!
//! ```text
//! daily_rate = monthly_price / days_in_month        (full precision)
//! amount     = round_half_up(monthly_price * total_user_days / days_in_month, 2)
//! ```
//!
//! Amounts are always returned with exactly two fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{BillingError, BillingResult};
use crate::membership::{Subscription, UserMembership};
use crate::month::BillingMonth;
use crate::overlap::DateRange;

/// Fractional digits of a billed amount
pub const CURRENCY_SCALE: u32 = 2;

/// Per-user line of an itemized invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub user_id: i64,
    pub name: String,
    pub active_days: u32,
}

/// Itemized bill for one customer and month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub month: BillingMonth,
    pub subscription_id: Option<i64>,
    /// Daily price per user, unrounded
    pub daily_rate: Decimal,
    pub total_user_days: u64,
    /// Billed amount, rounded half-up to cents
    pub amount: Decimal,
    pub lines: Vec<InvoiceLine>,
}

impl Invoice {
    fn empty(month: &BillingMonth, subscription: Option<&Subscription>) -> Self {
        Self {
            month: *month,
            subscription_id: subscription.map(|s| s.id),
            daily_rate: Decimal::ZERO,
            total_user_days: 0,
            amount: to_currency(Decimal::ZERO),
            lines: Vec::new(),
        }
    }
}

/// Round half-up to cents, keeping two fractional digits even for whole amounts
pub fn to_currency(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_SCALE);
    rounded
}

/// Price per user per day of `month`, without rounding
pub fn daily_rate(subscription: &Subscription, month: &BillingMonth) -> Decimal {
    subscription.monthly_price_in_dollars / Decimal::from(month.days_in_month())
}

/// Compute the bill for a `YYYY-MM` month token.
///
/// The token is parsed before anything else, so a malformed token fails even
/// when there is nothing to bill.
pub fn bill_for(
    month: &str,
    subscription: Option<&Subscription>,
    users: &[UserMembership],
) -> BillingResult<Decimal> {
    let month: BillingMonth = month.parse()?;
    compute_bill(&month, subscription, users)
}

/// Total monthly charge in dollars, rounded to cents.
///
/// Returns `0.00` when there is no subscription, no users, or a non-positive
/// price. Fails with [`BillingError::InvalidInput`] if any user was deactivated
/// before being activated.
pub fn compute_bill(
    month: &BillingMonth,
    subscription: Option<&Subscription>,
    users: &[UserMembership],
) -> BillingResult<Decimal> {
    Ok(invoice_for(month, subscription, users)?.amount)
}

/// Itemized form of [`compute_bill`]
pub fn invoice_for(
    month: &BillingMonth,
    subscription: Option<&Subscription>,
    users: &[UserMembership],
) -> BillingResult<Invoice> {
    let subscription = match subscription {
        Some(s) if s.is_billable() && !users.is_empty() => s,
        _ => {
            tracing::debug!(
                month = %month,
                has_subscription = subscription.is_some(),
                users = users.len(),
                "Nothing to bill"
            );
            return Ok(Invoice::empty(month, subscription));
        }
    };

    let rate = daily_rate(subscription, month);
    let bounds = DateRange::of_month(month);

    let mut total_user_days: u64 = 0;
    let mut lines = Vec::with_capacity(users.len());
    for user in users {
        user.validate()?;
        let active_days = bounds.overlap_days(user.activated_on, user.deactivated_on);
        total_user_days += u64::from(active_days);
        lines.push(InvoiceLine {
            user_id: user.id,
            name: user.name.clone(),
            active_days,
        });
    }

    // Divide once, after the product, so exact half cents round up
    let amount = subscription
        .monthly_price_in_dollars
        .checked_mul(Decimal::from(total_user_days))
        .and_then(|product| product.checked_div(Decimal::from(month.days_in_month())))
        .map(to_currency)
        .ok_or_else(|| {
            BillingError::InvalidAmount(format!(
                "{} user-days at {} per month overflows",
                total_user_days, subscription.monthly_price_in_dollars
            ))
        })?;

    tracing::debug!(
        month = %month,
        subscription_id = subscription.id,
        users = users.len(),
        total_user_days = total_user_days,
        amount = %amount,
        "Computed monthly bill"
    );

    Ok(Invoice {
        month: *month,
        subscription_id: Some(subscription.id),
        daily_rate: rate,
        total_user_days,
        amount,
        lines,
    })
}
