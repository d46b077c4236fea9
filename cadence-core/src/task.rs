//! Task model handed to the planning engine.
//!
//! Tasks are immutable inputs: the engine derives sessions from them and never
//! writes back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::{days_between, EPSILON};

/// Default cap on a single session, in hours.
pub const DEFAULT_MAX_SESSION_HOURS: f64 = 2.0;

/// Low-importance tasks due within this many days get an advisory warning.
pub const LOW_PRIORITY_URGENT_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineKind {
    #[default]
    Hard,
    Soft,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    #[default]
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulingPreference {
    /// Even spacing at the urgency cadence.
    #[default]
    Consistent,
    /// Urgency cadence, but slips to the next day when a cadence day is full.
    Opportunistic,
    /// Daily sessions at full length regardless of urgency.
    Intensive,
}

/// Core task type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,

    pub deadline: Option<NaiveDate>,
    pub deadline_kind: DeadlineKind,

    /// Hours, fractional.
    pub estimated_hours: f64,

    /// Overrides `estimated_hours` when present and positive.
    pub total_time_needed: Option<f64>,

    pub importance: Importance,
    pub scheduling_preference: SchedulingPreference,

    /// Must be scheduled as one uninterrupted block on the deadline date.
    pub one_sitting: bool,

    pub start_date: NaiveDate,

    /// Hours.
    pub max_session_hours: f64,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            category: None,
            deadline: None,
            deadline_kind: DeadlineKind::Hard,
            estimated_hours: 1.0,
            total_time_needed: None,
            importance: Importance::Low,
            scheduling_preference: SchedulingPreference::Consistent,
            one_sitting: false,
            start_date,
            max_session_hours: DEFAULT_MAX_SESSION_HOURS,
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_deadline_kind(mut self, kind: DeadlineKind) -> Self {
        self.deadline_kind = kind;
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    pub fn with_total_time_needed(mut self, hours: f64) -> Self {
        self.total_time_needed = Some(hours);
        self
    }

    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_preference(mut self, preference: SchedulingPreference) -> Self {
        self.scheduling_preference = preference;
        self
    }

    pub fn with_max_session_hours(mut self, hours: f64) -> Self {
        self.max_session_hours = hours;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn one_sitting(mut self) -> Self {
        self.one_sitting = true;
        self
    }

    /// Total hours to schedule: the explicit total when set, else the estimate.
    pub fn effective_total_hours(&self) -> f64 {
        match self.total_time_needed {
            Some(total) if total > EPSILON => total,
            _ => self.estimated_hours,
        }
    }

    /// Kind after auto-detection: a task without a deadline is always `None`.
    pub fn effective_deadline_kind(&self) -> DeadlineKind {
        match self.deadline {
            None => DeadlineKind::None,
            Some(_) => self.deadline_kind,
        }
    }

    /// Deadline the planner should honor, if any.
    pub fn planning_deadline(&self) -> Option<NaiveDate> {
        match self.effective_deadline_kind() {
            DeadlineKind::None => None,
            _ => self.deadline,
        }
    }

    /// Low importance with a deadline within `LOW_PRIORITY_URGENT_DAYS` of `today`.
    /// Such tasks may lose out to more important urgent work.
    pub fn is_low_priority_urgent(&self, today: NaiveDate) -> bool {
        if self.importance == Importance::High {
            return false;
        }
        match self.deadline {
            Some(deadline) => {
                let days = days_between(today, deadline);
                (0..=LOW_PRIORITY_URGENT_DAYS).contains(&days)
            }
            None => false,
        }
    }
}
