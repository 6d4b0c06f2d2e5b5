//! Billing run: load inputs, check invariants, compute the invoice

use anyhow::{bail, Context};
use seatbill_billing::{
    invoice_for, BillingMonth, Invoice, InvariantCheckSummary, InvariantChecker,
    Subscription, UserMembership,
};
use serde::Deserialize;
use tracing::{error, info, warn};

/// Inputs of one billing run, as stored in a run file
#[derive(Debug, Clone, Deserialize)]
pub struct RunFile {
    pub month: String,
    #[serde(default)]
    pub subscription: Option<Subscription>,
    #[serde(default)]
    pub users: Vec<UserMembership>,
}

impl RunFile {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse run file")
    }
}

/// Output of a billing run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub invoice: Invoice,
    pub invariants: InvariantCheckSummary,
}

/// Execute one billing run.
///
/// `month_override` replaces the run file's month token. With `strict`, any
/// invariant violation aborts the run before billing.
pub fn execute(
    run: &RunFile,
    month_override: Option<&str>,
    strict: bool,
) -> anyhow::Result<RunOutcome> {
    let token = month_override.unwrap_or(&run.month);
    let month: BillingMonth = token
        .parse()
        .with_context(|| format!("Invalid billing month {:?}", token))?;

    let invariants = InvariantChecker::new().check(run.subscription.as_ref(), &run.users);
    for violation in &invariants.violations {
        warn!(
            invariant = %violation.invariant,
            severity = %violation.severity,
            user_ids = ?violation.user_ids,
            "{}",
            violation.description
        );
    }
    if strict && !invariants.healthy {
        bail!(
            "{} invariant check(s) failed in strict mode",
            invariants.checks_failed
        );
    }

    let invoice = match invoice_for(&month, run.subscription.as_ref(), &run.users) {
        Ok(invoice) => invoice,
        Err(e) => {
            error!(month = %month, code = e.code(), error = %e, "Failed to compute bill");
            return Err(
                anyhow::Error::new(e).context(format!("Failed to compute bill for {}", month))
            );
        }
    };

    info!(
        month = %month,
        subscription_id = ?invoice.subscription_id,
        users = run.users.len(),
        total_user_days = invoice.total_user_days,
        amount = %invoice.amount,
        "Billing run complete"
    );

    Ok(RunOutcome {
        invoice,
        invariants,
    })
}
