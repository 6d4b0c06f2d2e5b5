//! Worker configuration, read from the environment

use std::path::PathBuf;

use thiserror::Error;

pub const RUN_FILE_VAR: &str = "SEATBILL_RUN_FILE";
pub const MONTH_VAR: &str = "SEATBILL_MONTH";
pub const STRICT_VAR: &str = "SEATBILL_STRICT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// JSON file holding the billing run inputs
    pub run_file: PathBuf,
    /// Replaces the month token from the run file
    pub month_override: Option<String>,
    /// Abort the run on any invariant violation
    pub strict: bool,
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_file = non_empty_var(RUN_FILE_VAR)
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing(RUN_FILE_VAR))?;

        let month_override = non_empty_var(MONTH_VAR);

        let strict = match non_empty_var(STRICT_VAR) {
            Some(value) => parse_bool(STRICT_VAR, value)?,
            None => false,
        };

        Ok(Self {
            run_file,
            month_override,
            strict,
        })
    }
}

fn non_empty_var(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value,
            reason: "expected true or false",
        }),
    }
}
