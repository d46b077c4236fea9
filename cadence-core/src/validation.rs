//! Task validation before a task enters planning.
//!
//! Errors block the task; warnings are advisory. The one-sitting capacity
//! comparison against `daily_available_hours` is only a warning because the
//! slot finder, run on the actual deadline day, is the authoritative check.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::commitment::FixedCommitment;
use crate::error::Result;
use crate::plan::StudyPlan;
use crate::settings::UserSettings;
use crate::slot::{check_one_sitting, OneSittingCheck};
use crate::task::Task;
use crate::time::{days_between, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("Task title is required")]
    MissingTitle,

    #[error("Time estimation is required")]
    MissingEstimate,

    #[error("Deadline cannot be in the past ({deadline})")]
    DeadlineInPast { deadline: NaiveDate },

    #[error("Start date cannot be in the past ({start})")]
    StartDateInPast { start: NaiveDate },

    #[error("Deadline {deadline} is before start date {start}")]
    DeadlineBeforeStart { start: NaiveDate, deadline: NaiveDate },

    #[error("Maximum session length must be positive (got {hours}h)")]
    InvalidMaxSessionLength { hours: f64 },

    #[error("One-sitting tasks require a deadline")]
    OneSittingWithoutDeadline,

    #[error("No available time slot for one-sitting task on deadline date {date}")]
    OneSittingNoSlot { date: NaiveDate, hours: f64 },

    #[error("One-sitting task duration ({hours}h) exceeds daily available hours ({daily_hours}h)")]
    OneSittingExceedsDailyHours { hours: f64, daily_hours: f64 },

    #[error("Low priority with urgent deadline: due in {days} day(s), may not be scheduled ahead of important work")]
    LowPriorityUrgentDeadline { days: i64 },
}

impl ValidationIssue {
    pub fn severity(&self) -> Severity {
        match self {
            ValidationIssue::OneSittingExceedsDailyHours { .. }
            | ValidationIssue::LowPriorityUrgentDeadline { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskReport {
    pub task_id: String,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl TaskReport {
    fn new(task_id: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn push(&mut self, issue: ValidationIssue) {
        match issue.severity() {
            Severity::Error => self.errors.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check a task against `today` and the user's calendar.
///
/// A malformed study window on the deadline date is returned as an error
/// rather than folded into the report.
pub fn validate_task(
    task: &Task,
    today: NaiveDate,
    settings: &UserSettings,
    plans: &[StudyPlan],
    commitments: &[FixedCommitment],
) -> Result<TaskReport> {
    let mut report = TaskReport::new(&task.id);
    let total = task.effective_total_hours();

    if task.title.trim().is_empty() {
        report.push(ValidationIssue::MissingTitle);
    }
    if !(total > EPSILON) {
        report.push(ValidationIssue::MissingEstimate);
    }
    if let Some(deadline) = task.deadline {
        if deadline < today {
            report.push(ValidationIssue::DeadlineInPast { deadline });
        }
        if deadline < task.start_date {
            report.push(ValidationIssue::DeadlineBeforeStart {
                start: task.start_date,
                deadline,
            });
        }
    }
    if task.start_date < today {
        report.push(ValidationIssue::StartDateInPast {
            start: task.start_date,
        });
    }
    if !task.one_sitting && !(task.max_session_hours > EPSILON) {
        report.push(ValidationIssue::InvalidMaxSessionLength {
            hours: task.max_session_hours,
        });
    }

    if task.one_sitting {
        if task.deadline.is_none() {
            report.push(ValidationIssue::OneSittingWithoutDeadline);
        }
        if total > settings.daily_available_hours + EPSILON {
            report.push(ValidationIssue::OneSittingExceedsDailyHours {
                hours: total,
                daily_hours: settings.daily_available_hours,
            });
        }
        if task.deadline.is_some() {
            if let OneSittingCheck::NoSlot { date, hours } =
                check_one_sitting(task, plans, commitments, settings)?
            {
                report.push(ValidationIssue::OneSittingNoSlot { date, hours });
            }
        }
    }

    if task.is_low_priority_urgent(today) {
        if let Some(deadline) = task.deadline {
            report.push(ValidationIssue::LowPriorityUrgentDeadline {
                days: days_between(today, deadline),
            });
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::task::Importance;
    use crate::window::StudyWindow;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn validate(task: &Task, commitments: &[FixedCommitment]) -> TaskReport {
        validate_task(task, day(10), &UserSettings::default(), &[], commitments).unwrap()
    }

    #[test]
    fn well_formed_task_passes() {
        let t = Task::new("t1", "Write report", day(10))
            .with_hours(4.0)
            .with_deadline(day(20))
            .with_importance(Importance::High);
        let report = validate(&t, &[]);
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn missing_title_and_estimate() {
        let t = Task::new("t1", "   ", day(10)).with_hours(0.0);
        let report = validate(&t, &[]);
        assert_eq!(
            report.errors,
            vec![ValidationIssue::MissingTitle, ValidationIssue::MissingEstimate]
        );
        assert_eq!(report.errors[0].to_string(), "Task title is required");
    }

    #[test]
    fn past_dates_are_errors() {
        let t = Task::new("t1", "late", day(8)).with_deadline(day(9));
        let report = validate(&t, &[]);
        assert!(report.errors.contains(&ValidationIssue::DeadlineInPast { deadline: day(9) }));
        assert!(report.errors.contains(&ValidationIssue::StartDateInPast { start: day(8) }));
    }

    #[test]
    fn deadline_before_start_is_reported() {
        let t = Task::new("t1", "backwards", day(15)).with_deadline(day(12));
        let report = validate(&t, &[]);
        assert!(report.errors.contains(&ValidationIssue::DeadlineBeforeStart {
            start: day(15),
            deadline: day(12),
        }));
    }

    #[test]
    fn one_sitting_without_deadline() {
        let t = Task::new("t1", "exam", day(10)).with_hours(2.0).one_sitting();
        let report = validate(&t, &[]);
        assert_eq!(report.errors, vec![ValidationIssue::OneSittingWithoutDeadline]);
    }

    #[test]
    fn one_sitting_needs_deadline_even_without_estimate() {
        let t = Task::new("t1", "exam", day(10)).with_hours(0.0).one_sitting();
        let report = validate(&t, &[]);
        assert_eq!(
            report.errors,
            vec![
                ValidationIssue::MissingEstimate,
                ValidationIssue::OneSittingWithoutDeadline
            ]
        );
    }

    #[test]
    fn non_positive_session_cap_is_an_error() {
        for hours in [0.0, -1.0, f64::NAN] {
            let t = Task::new("t1", "reading", day(10))
                .with_hours(3.0)
                .with_deadline(day(20))
                .with_importance(Importance::High)
                .with_max_session_hours(hours);
            let report = validate(&t, &[]);
            assert!(!report.is_valid());
            assert!(matches!(
                report.errors.as_slice(),
                [ValidationIssue::InvalidMaxSessionLength { .. }]
            ));
        }
    }

    #[test]
    fn one_sitting_fully_booked_deadline_is_hard_failure() {
        let deadline = day(12);
        let t = Task::new("t1", "exam", day(10))
            .with_hours(2.0)
            .with_deadline(deadline)
            .one_sitting();
        let booked = vec![FixedCommitment::on_date("shift", deadline, 8.0, 22.0)];
        let report = validate(&t, &booked);
        assert!(!report.is_valid());
        assert_eq!(
            report.errors,
            vec![ValidationIssue::OneSittingNoSlot { date: deadline, hours: 2.0 }]
        );
    }

    #[test]
    fn aggregate_capacity_is_only_a_warning() {
        let deadline = day(12);
        let t = Task::new("t1", "marathon", day(10))
            .with_hours(8.0)
            .with_deadline(deadline)
            .with_importance(Importance::High)
            .one_sitting();
        let report = validate(&t, &[]);
        assert!(report.is_valid());
        assert!(matches!(
            report.warnings.as_slice(),
            [ValidationIssue::OneSittingExceedsDailyHours { .. }]
        ));
    }

    #[test]
    fn low_priority_urgent_warns() {
        let t = Task::new("t1", "forms", day(10)).with_deadline(day(12));
        let report = validate(&t, &[]);
        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec![ValidationIssue::LowPriorityUrgentDeadline { days: 2 }]
        );
    }

    #[test]
    fn broken_window_surfaces_as_configuration_error() {
        let settings = UserSettings {
            study_window: StudyWindow::new(20.0, 10.0),
            ..UserSettings::default()
        };
        let t = Task::new("t1", "exam", day(10))
            .with_hours(2.0)
            .with_deadline(day(12))
            .one_sitting();
        let err = validate_task(&t, day(10), &settings, &[], &[]).unwrap_err();
        assert!(matches!(err, PlanError::Configuration(_)));
    }
}
