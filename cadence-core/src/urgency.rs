//! Urgency tiers from days remaining until a deadline.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DateOrderError, Result};
use crate::time::days_between;

/// Deadlines closer than this are urgent.
pub const URGENT_BEFORE_DAYS: i64 = 7;
/// Deadlines closer than this (and not urgent) are moderate.
pub const MODERATE_BEFORE_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyTier {
    Urgent,
    Moderate,
    Relaxed,
}

/// Target spacing between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Daily,
    EveryOtherDay,
    /// 2-3 sessions per week.
    FewPerWeek,
}

impl Cadence {
    /// Days between consecutive session dates.
    pub fn day_step(self) -> u64 {
        match self {
            Cadence::Daily => 1,
            Cadence::EveryOtherDay => 2,
            Cadence::FewPerWeek => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::EveryOtherDay => "every other day",
            Cadence::FewPerWeek => "2-3 times per week",
        }
    }
}

impl UrgencyTier {
    pub fn cadence(self) -> Cadence {
        match self {
            UrgencyTier::Urgent => Cadence::Daily,
            UrgencyTier::Moderate => Cadence::EveryOtherDay,
            UrgencyTier::Relaxed => Cadence::FewPerWeek,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            UrgencyTier::Urgent => "Urgent deadline - daily sessions recommended",
            UrgencyTier::Moderate => "Moderate timeline - every other day sessions",
            UrgencyTier::Relaxed => "2-3 sessions per week recommended",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UrgencyTier::Urgent => "urgent",
            UrgencyTier::Moderate => "moderate",
            UrgencyTier::Relaxed => "relaxed",
        }
    }
}

impl fmt::Display for UrgencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole calendar days from `start` to `deadline`. A deadline before the
/// start is rejected rather than clamped.
pub fn days_until_deadline(start: NaiveDate, deadline: NaiveDate) -> Result<i64> {
    let days = days_between(start, deadline);
    if days < 0 {
        return Err(DateOrderError::DeadlineBeforeStart { start, deadline }.into());
    }
    Ok(days)
}

pub fn classify(days_until_deadline: i64) -> Result<UrgencyTier> {
    match days_until_deadline {
        d if d < 0 => Err(DateOrderError::NegativeDays(d).into()),
        d if d < URGENT_BEFORE_DAYS => Ok(UrgencyTier::Urgent),
        d if d < MODERATE_BEFORE_DAYS => Ok(UrgencyTier::Moderate),
        _ => Ok(UrgencyTier::Relaxed),
    }
}

pub fn classify_dates(start: NaiveDate, deadline: NaiveDate) -> Result<UrgencyTier> {
    classify(days_until_deadline(start, deadline)?)
}
