//! JSON snapshot of a user's calendar: tasks, commitments, existing plans and
//! optional settings that take precedence over the config file.

use anyhow::{Context, Result};
use cadence_core::task::DEFAULT_MAX_SESSION_HOURS;
use cadence_core::{
    DeadlineKind, FixedCommitment, Importance, SchedulingPreference, StudyPlan, Task, UserSettings,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
    #[serde(default)]
    pub commitments: Vec<FixedCommitment>,
    #[serde(default)]
    pub plans: Vec<StudyPlan>,
    #[serde(default)]
    pub settings: Option<UserSettings>,
}

/// A task as written by hand: most fields optional.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub deadline_kind: Option<DeadlineKind>,
    #[serde(default)]
    pub estimated_hours: f64,
    #[serde(default)]
    pub total_time_needed: Option<f64>,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default)]
    pub scheduling_preference: SchedulingPreference,
    #[serde(default)]
    pub one_sitting: bool,
    /// Defaults to today.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub max_session_hours: Option<f64>,
}

impl TaskRecord {
    /// Build an engine task; records without an id get `task-<n>` (1-based).
    pub fn into_task(self, index: usize, today: NaiveDate) -> Task {
        let id = self.id.unwrap_or_else(|| format!("task-{}", index + 1));
        let mut task = Task::new(id, self.title, self.start_date.unwrap_or(today))
            .with_hours(self.estimated_hours)
            .with_importance(self.importance)
            .with_preference(self.scheduling_preference)
            .with_max_session_hours(self.max_session_hours.unwrap_or(DEFAULT_MAX_SESSION_HOURS));

        if let Some(d) = self.deadline {
            task = task.with_deadline(d);
        }
        if let Some(kind) = self.deadline_kind {
            task = task.with_deadline_kind(kind);
        }
        if let Some(total) = self.total_time_needed {
            task = task.with_total_time_needed(total);
        }
        if let Some(desc) = self.description {
            task = task.with_description(desc);
        }
        if let Some(cat) = self.category {
            task = task.with_category(cat);
        }
        if self.one_sitting {
            task = task.one_sitting();
        }
        task
    }
}

impl Snapshot {
    pub fn tasks(&self, today: NaiveDate) -> Vec<Task> {
        self.tasks
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, r)| r.into_task(i, today))
            .collect()
    }
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn minimal_record_takes_defaults() {
        let snap: Snapshot =
            serde_json::from_str(r#"{"tasks":[{"title":"Read ch. 3","estimated_hours":1.5}]}"#)
                .unwrap();
        let tasks = snap.tasks(day(10));
        assert_eq!(tasks.len(), 1);
        let t = &tasks[0];
        assert_eq!(t.id, "task-1");
        assert_eq!(t.start_date, day(10));
        assert_eq!(t.estimated_hours, 1.5);
        assert_eq!(t.max_session_hours, DEFAULT_MAX_SESSION_HOURS);
        assert_eq!(t.effective_deadline_kind(), DeadlineKind::None);
        assert!(snap.settings.is_none());
    }

    #[test]
    fn full_snapshot_parses() {
        let json = r#"{
            "tasks": [{
                "id": "exam",
                "title": "Final exam",
                "deadline": "2026-03-12",
                "deadline_kind": "soft",
                "estimated_hours": 3,
                "importance": "high",
                "scheduling_preference": "intensive",
                "one_sitting": true,
                "start_date": "2026-03-09"
            }],
            "commitments": [
                {"title": "Lecture", "rule": {"kind": "recurring", "days_of_week": ["Mon", "Wed"]}, "start_hour": 9, "end_hour": 10.5},
                {"title": "Dentist", "rule": {"kind": "explicit", "date": "2026-03-11"}, "start_hour": 14, "end_hour": 15}
            ],
            "plans": [
                {"date": "2026-03-10", "planned_tasks": [{"task_id": "x", "start_hour": 8, "end_hour": 9, "status": "completed"}]}
            ],
            "settings": {"buffer_minutes": 10}
        }"#;
        let snap: Snapshot = serde_json::from_str(json).unwrap();
        let t = &snap.tasks(day(1))[0];
        assert!(t.one_sitting);
        assert_eq!(t.deadline_kind, DeadlineKind::Soft);
        assert_eq!(t.start_date, day(9));
        assert_eq!(snap.commitments.len(), 2);
        assert!(snap.commitments[0].applies_to(day(11)));
        assert_eq!(snap.plans[0].planned_hours(), 1.0);
        assert_eq!(snap.settings.unwrap().buffer_minutes, 10);
    }
}
