//! Error types for cadence-core.
//!
//! A missing slot is not an error: the slot finder returns `None` for that.
//! Only caller contract violations and bad settings surface here.

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for planning operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Malformed user settings. Scheduling for the user is blocked until fixed.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Deadline before start date, or a negative day count.
    #[error("invalid date ordering: {0}")]
    InvalidDateOrdering(#[from] DateOrderError),

    /// One-sitting tasks are always placed on their deadline date.
    #[error("one-sitting task '{title}' requires a deadline")]
    OneSittingWithoutDeadline { title: String },

    #[error("no {hours}h slot available on {date} for one-sitting task '{title}'")]
    NoSlotForOneSitting {
        title: String,
        date: NaiveDate,
        hours: f64,
    },
}

/// Settings problems.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("study window for {scope} must satisfy 0 <= start < end <= 24 (got {start_hour}..{end_hour})")]
    InvalidWindow {
        scope: String,
        start_hour: f64,
        end_hour: f64,
    },

    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateOrderError {
    #[error("deadline {deadline} is before start date {start}")]
    DeadlineBeforeStart { start: NaiveDate, deadline: NaiveDate },

    #[error("days until deadline must not be negative (got {0})")]
    NegativeDays(i64),
}

impl ConfigError {
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Result alias for planning operations.
pub type Result<T, E = PlanError> = std::result::Result<T, E>;
