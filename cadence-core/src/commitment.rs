//! Fixed commitments: blocks of the day that sessions must never overlap.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::occupancy::Interval;

/// Which dates a commitment applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateRule {
    /// A single calendar date.
    Explicit { date: NaiveDate },
    /// Weekly on the listed days, optionally bounded (inclusive) and with
    /// individual occurrences removed.
    Recurring {
        days_of_week: Vec<Weekday>,
        #[serde(default)]
        from: Option<NaiveDate>,
        #[serde(default)]
        until: Option<NaiveDate>,
        #[serde(default)]
        skipped_dates: Vec<NaiveDate>,
    },
}

impl DateRule {
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        match self {
            DateRule::Explicit { date: d } => *d == date,
            DateRule::Recurring {
                days_of_week,
                from,
                until,
                skipped_dates,
            } => {
                days_of_week.contains(&date.weekday())
                    && from.is_none_or(|f| date >= f)
                    && until.is_none_or(|u| date <= u)
                    && !skipped_dates.contains(&date)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCommitment {
    pub title: String,
    pub rule: DateRule,
    pub start_hour: f64,
    pub end_hour: f64,
}

impl FixedCommitment {
    pub fn on_date(title: impl Into<String>, date: NaiveDate, start_hour: f64, end_hour: f64) -> Self {
        Self {
            title: title.into(),
            rule: DateRule::Explicit { date },
            start_hour,
            end_hour,
        }
    }

    pub fn weekly(
        title: impl Into<String>,
        days_of_week: Vec<Weekday>,
        start_hour: f64,
        end_hour: f64,
    ) -> Self {
        Self {
            title: title.into(),
            rule: DateRule::Recurring {
                days_of_week,
                from: None,
                until: None,
                skipped_dates: Vec::new(),
            },
            start_hour,
            end_hour,
        }
    }

    /// Bound a recurring commitment to `[from, until]`. No-op for explicit dates.
    pub fn between(mut self, from_date: NaiveDate, until_date: NaiveDate) -> Self {
        if let DateRule::Recurring { from, until, .. } = &mut self.rule {
            *from = Some(from_date);
            *until = Some(until_date);
        }
        self
    }

    /// Drop a single occurrence of a recurring commitment.
    pub fn skipping(mut self, date: NaiveDate) -> Self {
        if let DateRule::Recurring { skipped_dates, .. } = &mut self.rule {
            skipped_dates.push(date);
        }
        self
    }

    pub fn applies_to(&self, date: NaiveDate) -> bool {
        self.rule.applies_to(date)
    }

    /// Occupied span on `date`, or `None` when the rule does not match.
    pub fn interval_on(&self, date: NaiveDate) -> Option<Interval> {
        if !self.applies_to(date) {
            return None;
        }
        Some(Interval::new(self.start_hour, self.end_hour))
    }
}
