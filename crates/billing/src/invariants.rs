//! Billing Invariants Module
//!
//! Consistency checks over the inputs of a billing run. These never fail and
//! never change anything: they report what looks wrong so the caller can decide
//! whether to bill anyway.
//!
//! ## Checks
//!
//! 1. **interval_ordered**: no user is deactivated before being activated
//! 2. **unique_user_ids**: each user appears once (otherwise double-billing)
//! 3. **customer_matches_subscription**: users belong to the subscribed customer
//! 4. **price_non_negative**: the monthly price is not negative

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::membership::{Subscription, UserMembership};

/// Result of running a single invariant check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvariantViolation {
    /// Which invariant was violated
    pub invariant: String,
    /// User(s) affected
    pub user_ids: Vec<i64>,
    /// Human-readable description of the violation
    pub description: String,
    /// Additional context for debugging
    pub context: serde_json::Value,
    /// Severity level
    pub severity: ViolationSeverity,
}

/// Severity of an invariant violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationSeverity {
    /// Low - minor inconsistency, informational
    Low,
    /// Medium - potential issue, should investigate
    Medium,
    /// High - the bill is likely wrong
    High,
    /// Critical - the bill cannot be computed correctly
    Critical,
}

impl std::fmt::Display for ViolationSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationSeverity::Critical => write!(f, "CRITICAL"),
            ViolationSeverity::High => write!(f, "HIGH"),
            ViolationSeverity::Medium => write!(f, "MEDIUM"),
            ViolationSeverity::Low => write!(f, "LOW"),
        }
    }
}

/// Summary of all invariant checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvariantCheckSummary {
    /// When the check was run
    #[serde(with = "time::serde::rfc3339")]
    pub checked_at: OffsetDateTime,
    /// Total number of checks run
    pub checks_run: usize,
    /// Number of checks that passed
    pub checks_passed: usize,
    /// Number of checks that failed
    pub checks_failed: usize,
    /// List of all violations found
    pub violations: Vec<InvariantViolation>,
    /// Overall health status
    pub healthy: bool,
}

impl InvariantCheckSummary {
    /// Highest severity among the violations, if any
    pub fn worst_severity(&self) -> Option<ViolationSeverity> {
        self.violations.iter().map(|v| v.severity).max()
    }
}

/// Runs the billing input invariants
#[derive(Debug, Default, Clone, Copy)]
pub struct InvariantChecker;

impl InvariantChecker {
    const CHECKS_RUN: usize = 4;

    pub fn new() -> Self {
        Self
    }

    /// Run all invariant checks and return summary
    pub fn check(
        &self,
        subscription: Option<&Subscription>,
        users: &[UserMembership],
    ) -> InvariantCheckSummary {
        let mut violations = Vec::new();

        violations.extend(self.check_interval_ordered(users));
        violations.extend(self.check_unique_user_ids(users));
        if let Some(subscription) = subscription {
            violations.extend(self.check_customer_matches_subscription(subscription, users));
            violations.extend(self.check_price_non_negative(subscription));
        }

        let checks_failed = violations
            .iter()
            .map(|v| &v.invariant)
            .collect::<HashSet<_>>()
            .len();

        InvariantCheckSummary {
            checked_at: OffsetDateTime::now_utc(),
            checks_run: Self::CHECKS_RUN,
            checks_passed: Self::CHECKS_RUN - checks_failed,
            checks_failed,
            healthy: violations.is_empty(),
            violations,
        }
    }

    /// Invariant 1: deactivation is on or after activation
    fn check_interval_ordered(&self, users: &[UserMembership]) -> Vec<InvariantViolation> {
        users
            .iter()
            .filter(|user| user.validate().is_err())
            .map(|user| InvariantViolation {
                invariant: "interval_ordered".to_string(),
                user_ids: vec![user.id],
                description: format!("User '{}' is deactivated before activation", user.name),
                context: serde_json::json!({
                    "activated_on": user.activated_on.to_string(),
                    "deactivated_on": user.deactivated_on.map(|d| d.to_string()),
                }),
                severity: ViolationSeverity::Critical,
            })
            .collect()
    }

    /// Invariant 2: each user id appears once
    ///
    /// A repeated id is billed twice by the aggregator.
    fn check_unique_user_ids(&self, users: &[UserMembership]) -> Vec<InvariantViolation> {
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for user in users {
            *counts.entry(user.id).or_default() += 1;
        }

        let mut duplicates: Vec<(i64, usize)> =
            counts.into_iter().filter(|(_, count)| *count > 1).collect();
        duplicates.sort_unstable();

        duplicates
            .into_iter()
            .map(|(user_id, count)| InvariantViolation {
                invariant: "unique_user_ids".to_string(),
                user_ids: vec![user_id],
                description: format!("User id {} appears {} times", user_id, count),
                context: serde_json::json!({ "occurrences": count }),
                severity: ViolationSeverity::High,
            })
            .collect()
    }

    /// Invariant 3: users belong to the subscribed customer
    fn check_customer_matches_subscription(
        &self,
        subscription: &Subscription,
        users: &[UserMembership],
    ) -> Vec<InvariantViolation> {
        let mismatched: Vec<i64> = users
            .iter()
            .filter(|user| user.customer_id != subscription.customer_id)
            .map(|user| user.id)
            .collect();

        if mismatched.is_empty() {
            return Vec::new();
        }

        vec![InvariantViolation {
            invariant: "customer_matches_subscription".to_string(),
            description: format!(
                "{} user(s) belong to a customer other than {}",
                mismatched.len(),
                subscription.customer_id
            ),
            context: serde_json::json!({
                "subscription_id": subscription.id,
                "subscription_customer_id": subscription.customer_id,
            }),
            user_ids: mismatched,
            severity: ViolationSeverity::Medium,
        }]
    }

    /// Invariant 4: the monthly price is not negative
    fn check_price_non_negative(&self, subscription: &Subscription) -> Vec<InvariantViolation> {
        if subscription.monthly_price_in_dollars >= Decimal::ZERO {
            return Vec::new();
        }

        vec![InvariantViolation {
            invariant: "price_non_negative".to_string(),
            user_ids: Vec::new(),
            description: format!(
                "Subscription {} has a negative monthly price",
                subscription.id
            ),
            context: serde_json::json!({
                "monthly_price_in_dollars": subscription.monthly_price_in_dollars.to_string(),
            }),
            severity: ViolationSeverity::Critical,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::date;

    fn user(id: i64, customer_id: i64) -> UserMembership {
        UserMembership::active_since(id, customer_id, format!("Employee #{}", id), date!(2021 - 01 - 01))
    }

    #[test]
    fn test_healthy_inputs() {
        let sub = Subscription::new(763, 1, dec!(4));
        let summary = InvariantChecker::new().check(Some(&sub), &[user(1, 1), user(2, 1)]);
        assert!(summary.healthy);
        assert_eq!(summary.checks_run, 4);
        assert_eq!(summary.checks_passed, 4);
        assert_eq!(summary.worst_severity(), None);
    }

    #[test]
    fn test_inverted_interval_is_critical() {
        let mut broken = user(1, 1);
        broken.deactivated_on = Some(date!(2020 - 12 - 31));
        let summary = InvariantChecker::new().check(None, &[broken]);
        assert!(!summary.healthy);
        assert_eq!(summary.violations[0].invariant, "interval_ordered");
        assert_eq!(summary.worst_severity(), Some(ViolationSeverity::Critical));
    }

    #[test]
    fn test_duplicate_user_ids() {
        let summary = InvariantChecker::new().check(None, &[user(1, 1), user(1, 1), user(2, 1)]);
        assert_eq!(summary.checks_failed, 1);
        let violation = &summary.violations[0];
        assert_eq!(violation.invariant, "unique_user_ids");
        assert_eq!(violation.user_ids, vec![1]);
        assert_eq!(violation.context["occurrences"], 2);
    }

    #[test]
    fn test_customer_mismatch_is_grouped() {
        let sub = Subscription::new(763, 328, dec!(4));
        let summary = InvariantChecker::new().check(Some(&sub), &[user(1, 1), user(2, 1)]);
        assert_eq!(summary.violations.len(), 1);
        assert_eq!(summary.violations[0].user_ids, vec![1, 2]);
        assert_eq!(summary.worst_severity(), Some(ViolationSeverity::Medium));
    }

    #[test]
    fn test_negative_price() {
        let sub = Subscription::new(1, 1, dec!(-0.01));
        let summary = InvariantChecker::new().check(Some(&sub), &[]);
        assert_eq!(summary.violations[0].invariant, "price_non_negative");
        assert_eq!(summary.checks_failed, 1);
        assert_eq!(summary.checks_passed, 3);
    }

    #[test]
    fn test_severity_display_and_order() {
        assert_eq!(ViolationSeverity::Critical.to_string(), "CRITICAL");
        assert!(ViolationSeverity::Critical > ViolationSeverity::High);
        assert!(ViolationSeverity::Medium > ViolationSeverity::Low);
    }
}
