//! Session materializer: turns a distribution into dated session proposals.
//!
//! Proposals are suggestions only. Inputs are never mutated; callers persist
//! whatever they accept, serializing writes per date.
//!
//! Placement rules:
//! - one-sitting tasks get a single block on the deadline date or fail
//! - other tasks walk the dates from `start_date` to the deadline (or the
//!   planning horizon) stepping by the cadence, one session per date
//! - a session never exceeds the task's max length or the day's remaining
//!   `daily_available_hours`

use std::cmp::Ordering;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use crate::commitment::FixedCommitment;
use crate::distribution::{plan_for_task, SessionDistribution};
use crate::error::{PlanError, Result};
use crate::occupancy::DayOccupancy;
use crate::plan::{plan_for_date, planned_hours_on, sessions_on, PlannedSession, StudyPlan};
use crate::settings::UserSettings;
use crate::slot::{find_slot_in, Slot};
use crate::task::{Importance, SchedulingPreference, Task};
use crate::time::{align_up, ceil_to_quarter_hour, EPSILON};
use crate::window::resolve_window;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposedSession {
    pub task_id: String,
    pub date: NaiveDate,
    pub slot: Slot,
    pub session_number: u32,
}

impl ProposedSession {
    pub fn hours(&self) -> f64 {
        self.slot.hours()
    }

    pub fn to_planned(&self) -> PlannedSession {
        PlannedSession {
            session_number: Some(self.session_number),
            ..PlannedSession::new(self.task_id.clone(), self.slot.start, self.slot.end)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Materialization {
    pub task_id: String,
    pub distribution: SessionDistribution,
    pub sessions: Vec<ProposedSession>,
    pub scheduled_hours: f64,
    pub unscheduled_hours: f64,
}

impl Materialization {
    pub fn is_complete(&self) -> bool {
        self.unscheduled_hours <= EPSILON
    }
}

/// Outcome for one task of a multi-task run.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPlanOutcome {
    pub task_id: String,
    pub result: Result<Materialization>,
}

/// Propose sessions for `task` against the existing calendar.
pub fn materialize(
    task: &Task,
    plans: &[StudyPlan],
    commitments: &[FixedCommitment],
    settings: &UserSettings,
) -> Result<Materialization> {
    settings.validate()?;
    let distribution = plan_for_task(task)?;
    let total = task.effective_total_hours();

    let sessions = if total <= EPSILON {
        Vec::new()
    } else if task.one_sitting {
        vec![place_one_sitting(task, total, plans, commitments, settings)?]
    } else {
        place_sessions(task, total, &distribution, plans, commitments, settings)?
    };

    let scheduled_hours: f64 = sessions.iter().map(ProposedSession::hours).sum();
    let unscheduled_hours = (total - scheduled_hours).max(0.0);
    info!(
        task_id = %task.id,
        sessions = sessions.len(),
        scheduled_hours,
        unscheduled_hours,
        "materialized task"
    );

    Ok(Materialization {
        task_id: task.id.clone(),
        distribution,
        sessions,
        scheduled_hours,
        unscheduled_hours,
    })
}

/// Materialize several tasks against one calendar.
///
/// One-sitting tasks go first, then earlier deadlines, then high importance.
/// Each task's proposals are appended to a working copy of `plans` so later
/// tasks see them as occupied. Outcomes come back in placement order; bad
/// settings abort the whole run.
pub fn materialize_all(
    tasks: &[Task],
    plans: &[StudyPlan],
    commitments: &[FixedCommitment],
    settings: &UserSettings,
) -> Result<Vec<TaskPlanOutcome>> {
    settings.validate()?;

    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by(|a, b| placement_order(a, b));

    let mut working = plans.to_vec();
    let mut outcomes = Vec::with_capacity(ordered.len());
    for task in ordered {
        let result = materialize(task, &working, commitments, settings);
        if let Ok(m) = &result {
            for s in &m.sessions {
                plan_for_date(&mut working, s.date).push(s.to_planned());
            }
        }
        outcomes.push(TaskPlanOutcome {
            task_id: task.id.clone(),
            result,
        });
    }
    Ok(outcomes)
}

fn placement_order(a: &Task, b: &Task) -> Ordering {
    b.one_sitting
        .cmp(&a.one_sitting)
        .then_with(|| match (a.planning_deadline(), b.planning_deadline()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| importance_rank(a.importance).cmp(&importance_rank(b.importance)))
}

fn importance_rank(importance: Importance) -> u8 {
    match importance {
        Importance::High => 0,
        Importance::Low => 1,
    }
}

fn place_one_sitting(
    task: &Task,
    total: f64,
    plans: &[StudyPlan],
    commitments: &[FixedCommitment],
    settings: &UserSettings,
) -> Result<ProposedSession> {
    let date = task.deadline.ok_or_else(|| PlanError::OneSittingWithoutDeadline {
        title: task.title.clone(),
    })?;
    let window = resolve_window(date, settings)?;
    let occupancy = DayOccupancy::build(date, sessions_on(plans, date), commitments);

    let slot = find_slot_in(
        &occupancy,
        window,
        total,
        settings.buffer_hours(),
        settings.slot_alignment_minutes,
    )
    .ok_or_else(|| PlanError::NoSlotForOneSitting {
        title: task.title.clone(),
        date,
        hours: total,
    })?;

    Ok(ProposedSession {
        task_id: task.id.clone(),
        date,
        slot,
        session_number: 1,
    })
}

fn place_sessions(
    task: &Task,
    total: f64,
    distribution: &SessionDistribution,
    plans: &[StudyPlan],
    commitments: &[FixedCommitment],
    settings: &UserSettings,
) -> Result<Vec<ProposedSession>> {
    let last_day = match task.planning_deadline() {
        Some(deadline) => deadline,
        None => task
            .start_date
            .checked_add_days(Days::new(u64::from(settings.planning_horizon_days) - 1))
            .unwrap_or(task.start_date),
    };
    let step = match task.scheduling_preference {
        SchedulingPreference::Intensive => 1,
        _ => distribution.cadence.day_step(),
    };
    let retry_step = match task.scheduling_preference {
        SchedulingPreference::Opportunistic => 1,
        _ => step,
    };

    let mut remaining = total;
    let mut sessions = Vec::new();
    let mut date = task.start_date;

    while date <= last_day && remaining > EPSILON {
        if !settings.is_work_day(date) {
            date = advance(date, 1);
            continue;
        }

        let target = session_target(task, remaining, date, last_day, step, settings);
        match place_on_date(task, date, target, remaining, plans, commitments, settings)? {
            Some(slot) => {
                remaining -= slot.hours();
                sessions.push(ProposedSession {
                    task_id: task.id.clone(),
                    date,
                    slot,
                    session_number: sessions.len() as u32 + 1,
                });
                date = advance(date, step);
            }
            None => {
                debug!(task_id = %task.id, %date, target, "no room for session");
                date = advance(date, retry_step);
            }
        }
    }

    Ok(sessions)
}

fn advance(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

/// Desired size of the session on `date` before calendar capacity applies.
fn session_target(
    task: &Task,
    remaining: f64,
    date: NaiveDate,
    last_day: NaiveDate,
    step: u64,
    settings: &UserSettings,
) -> f64 {
    let capped = remaining.min(task.max_session_hours);
    if task.scheduling_preference != SchedulingPreference::Consistent {
        return capped;
    }

    let days_left = cadence_days(date, last_day, step, settings).max(1);
    let even = ceil_to_quarter_hour(remaining / days_left as f64);
    let floor = min_session_size(task, remaining, settings);
    capped.min(even.max(floor))
}

/// Shortest session worth proposing. Never above the task's session cap.
fn min_session_size(task: &Task, remaining: f64, settings: &UserSettings) -> f64 {
    settings
        .min_session_hours()
        .min(remaining)
        .min(task.max_session_hours)
}

/// Work days from `date` through `last_day` visited at `step` spacing.
fn cadence_days(date: NaiveDate, last_day: NaiveDate, step: u64, settings: &UserSettings) -> u64 {
    let mut count = 0;
    let mut d = date;
    while d <= last_day {
        if settings.is_work_day(d) {
            count += 1;
            d = advance(d, step);
        } else {
            d = advance(d, 1);
        }
    }
    count
}

/// Slot for up to `target` hours on `date`, shrinking to the largest usable
/// gap when the full target does not fit.
fn place_on_date(
    task: &Task,
    date: NaiveDate,
    target: f64,
    remaining: f64,
    plans: &[StudyPlan],
    commitments: &[FixedCommitment],
    settings: &UserSettings,
) -> Result<Option<Slot>> {
    let window = resolve_window(date, settings)?;
    let capacity = settings.daily_available_hours - planned_hours_on(plans, date);
    let min_size = min_session_size(task, remaining, settings);
    let size = target.min(capacity);
    if size < min_size - EPSILON || size <= EPSILON {
        return Ok(None);
    }

    let occupancy = DayOccupancy::build(date, sessions_on(plans, date), commitments);
    let buffer = settings.buffer_hours();
    let alignment = settings.slot_alignment_minutes;

    if let Some(slot) = find_slot_in(&occupancy, window, size, buffer, alignment) {
        return Ok(Some(slot));
    }

    let largest_gap = occupancy
        .free_gaps(window, buffer)
        .iter()
        .map(|g| {
            let start = match alignment {
                Some(step) => align_up(g.start, step),
                None => g.start,
            };
            g.end - start
        })
        .fold(0.0_f64, f64::max);
    let shrunk = size.min(largest_gap);
    if shrunk < min_size - EPSILON || shrunk <= EPSILON {
        return Ok(None);
    }
    debug!(task_id = %task.id, %date, size, shrunk, "shrinking session to fit largest gap");
    Ok(find_slot_in(&occupancy, window, shrunk, buffer, alignment))
}
