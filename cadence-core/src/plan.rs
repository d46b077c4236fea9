//! Per-date study plans: sessions already committed for a day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Completed,
    /// Skipped sessions free their time again.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSession {
    pub task_id: String,
    pub start_hour: f64,
    pub end_hour: f64,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub session_number: Option<u32>,
}

impl PlannedSession {
    pub fn new(task_id: impl Into<String>, start_hour: f64, end_hour: f64) -> Self {
        Self {
            task_id: task_id.into(),
            start_hour,
            end_hour,
            status: SessionStatus::Scheduled,
            session_number: None,
        }
    }

    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn hours(&self) -> f64 {
        (self.end_hour - self.start_hour).max(0.0)
    }

    /// Whether this session blocks time on its date.
    pub fn occupies_time(&self) -> bool {
        self.status != SessionStatus::Skipped
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub date: NaiveDate,
    #[serde(default)]
    pub planned_tasks: Vec<PlannedSession>,
}

impl StudyPlan {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            planned_tasks: Vec::new(),
        }
    }

    /// Append a session; plans are append-only during a planning run.
    pub fn push(&mut self, session: PlannedSession) {
        self.planned_tasks.push(session);
    }

    /// Hours taken by sessions that still occupy time.
    pub fn planned_hours(&self) -> f64 {
        self.planned_tasks
            .iter()
            .filter(|s| s.occupies_time())
            .map(PlannedSession::hours)
            .sum()
    }
}

/// All sessions recorded for `date`, across every plan carrying that date.
///
/// Duplicate plans for one date can appear after concurrent edits; their
/// sessions are merged rather than picking one plan.
pub fn sessions_on(plans: &[StudyPlan], date: NaiveDate) -> impl Iterator<Item = &PlannedSession> {
    plans
        .iter()
        .filter(move |p| p.date == date)
        .flat_map(|p| p.planned_tasks.iter())
}

/// Occupying hours already planned for `date`.
pub fn planned_hours_on(plans: &[StudyPlan], date: NaiveDate) -> f64 {
    sessions_on(plans, date)
        .filter(|s| s.occupies_time())
        .map(PlannedSession::hours)
        .sum()
}

/// Mutable plan for `date`, created at the end of `plans` when missing.
pub fn plan_for_date(plans: &mut Vec<StudyPlan>, date: NaiveDate) -> &mut StudyPlan {
    match plans.iter().position(|p| p.date == date) {
        Some(idx) => &mut plans[idx],
        None => {
            plans.push(StudyPlan::new(date));
            let last = plans.len() - 1;
            &mut plans[last]
        }
    }
}
