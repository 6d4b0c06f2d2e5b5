//! Billing error types

use thiserror::Error;

/// Result type for billing operations
pub type BillingResult<T> = Result<T, BillingError>;

/// Errors that can occur while computing a bill
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// Caller supplied data that violates the billing data model
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A monetary amount could not be represented
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl BillingError {
    /// Short machine-readable code, used in structured logs
    pub fn code(&self) -> &'static str {
        match self {
            BillingError::InvalidInput(_) => "invalid_input",
            BillingError::InvalidAmount(_) => "invalid_amount",
        }
    }
}

impl From<time::error::ComponentRange> for BillingError {
    fn from(err: time::error::ComponentRange) -> Self {
        BillingError::InvalidInput(err.to_string())
    }
}
