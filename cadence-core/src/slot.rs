//! Slot finder: earliest conflict-free interval of a requested length.
//!
//! Candidates are scanned with boundary jumps. When a candidate conflicts,
//! the next candidate is the end of the blocking interval plus the buffer, so
//! sub-step boundaries (e.g. a commitment ending at 10:10) never hide a slot.
//! Every start strictly between the two candidates conflicts with the same
//! interval, which keeps the result the earliest possible.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::commitment::FixedCommitment;
use crate::error::Result;
use crate::occupancy::DayOccupancy;
use crate::plan::{sessions_on, PlannedSession, StudyPlan};
use crate::settings::UserSettings;
use crate::task::Task;
use crate::time::{align_up, DAY_END_HOUR, DAY_START_HOUR, EPSILON};
use crate::window::{resolve_window, StudyWindow};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub start: f64,
    pub end: f64,
}

impl Slot {
    pub fn hours(&self) -> f64 {
        self.end - self.start
    }
}

/// Earliest slot of `duration_hours` inside `window` on an already built day.
///
/// With `alignment_minutes`, candidate starts are rounded up to that step.
pub fn find_slot_in(
    occupancy: &DayOccupancy,
    window: StudyWindow,
    duration_hours: f64,
    buffer_hours: f64,
    alignment_minutes: Option<u32>,
) -> Option<Slot> {
    // Also rejects NaN durations and bounds.
    if !(duration_hours > EPSILON) || !(window.start_hour < window.end_hour) {
        return None;
    }
    let buffer = buffer_hours.max(0.0);
    let align = |hour: f64| match alignment_minutes {
        Some(step) if step > 0 => align_up(hour, step),
        _ => hour,
    };

    let latest_start = window.end_hour.min(DAY_END_HOUR) - duration_hours;
    let mut candidate = align(window.start_hour.max(DAY_START_HOUR));

    while candidate <= latest_start + EPSILON {
        let end = candidate + duration_hours;
        match occupancy.blocking_end(candidate, end, buffer) {
            None => {
                if occupancy.is_free(candidate, end, buffer) {
                    return Some(Slot { start: candidate, end });
                }
                // Only reachable past the end of the day.
                return None;
            }
            Some(blocked_until) => {
                let next = align(blocked_until + buffer);
                if next <= candidate + EPSILON {
                    return None;
                }
                candidate = next;
            }
        }
    }
    None
}

/// Find the earliest slot on `date` for `duration_hours`, avoiding `occupied`
/// sessions and every commitment that applies to `date`.
///
/// Returns `None` when nothing fits before `window_end`; callers treat that
/// as a normal outcome. Identical inputs always give the identical result.
#[allow(clippy::too_many_arguments)]
pub fn find_next_available_slot(
    duration_hours: f64,
    occupied: &[PlannedSession],
    fixed_commitments: &[FixedCommitment],
    window_start: f64,
    window_end: f64,
    buffer_hours: f64,
    date: NaiveDate,
    settings: &UserSettings,
) -> Option<Slot> {
    let occupancy = DayOccupancy::build(date, occupied, fixed_commitments);
    let window = StudyWindow::new(window_start, window_end);
    let slot = find_slot_in(
        &occupancy,
        window,
        duration_hours,
        buffer_hours,
        settings.slot_alignment_minutes,
    );
    debug!(
        %date,
        duration_hours,
        buffer_hours,
        occupied = occupancy.intervals().len(),
        found = slot.is_some(),
        "slot search"
    );
    slot
}

/// Search `from..=until` for the first work day with room for `duration_hours`.
pub fn find_first_date_with_slot(
    from: NaiveDate,
    until: NaiveDate,
    duration_hours: f64,
    plans: &[StudyPlan],
    commitments: &[FixedCommitment],
    settings: &UserSettings,
) -> Result<Option<(NaiveDate, Slot)>> {
    for date in from.iter_days().take_while(|d| *d <= until) {
        if !settings.is_work_day(date) {
            continue;
        }
        let window = resolve_window(date, settings)?;
        let occupancy = DayOccupancy::build(date, sessions_on(plans, date), commitments);
        if let Some(slot) = find_slot_in(
            &occupancy,
            window,
            duration_hours,
            settings.buffer_hours(),
            settings.slot_alignment_minutes,
        ) {
            return Ok(Some((date, slot)));
        }
    }
    Ok(None)
}

/// Feasibility of placing a one-sitting task on its deadline date.
#[derive(Debug, Clone, PartialEq)]
pub enum OneSittingCheck {
    /// Not a one-sitting task, or nothing to schedule.
    NotRequired,
    MissingDeadline,
    Fits { date: NaiveDate, slot: Slot },
    /// Hard failure: the deadline date has no gap long enough.
    NoSlot { date: NaiveDate, hours: f64 },
}

impl OneSittingCheck {
    pub fn is_feasible(&self) -> bool {
        matches!(self, OneSittingCheck::NotRequired | OneSittingCheck::Fits { .. })
    }
}

pub fn check_one_sitting(
    task: &Task,
    plans: &[StudyPlan],
    commitments: &[FixedCommitment],
    settings: &UserSettings,
) -> Result<OneSittingCheck> {
    let hours = task.effective_total_hours();
    if !task.one_sitting || hours <= EPSILON {
        return Ok(OneSittingCheck::NotRequired);
    }
    let Some(date) = task.deadline else {
        return Ok(OneSittingCheck::MissingDeadline);
    };

    let window = resolve_window(date, settings)?;
    let occupancy = DayOccupancy::build(date, sessions_on(plans, date), commitments);
    let check = match find_slot_in(
        &occupancy,
        window,
        hours,
        settings.buffer_hours(),
        settings.slot_alignment_minutes,
    ) {
        Some(slot) => OneSittingCheck::Fits { date, slot },
        None => OneSittingCheck::NoSlot { date, hours },
    };
    Ok(check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occupancy::Interval;
    use crate::plan::PlannedSession;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn find(sessions: &[PlannedSession], commitments: &[FixedCommitment], hours: f64, buffer: f64) -> Option<Slot> {
        find_next_available_slot(hours, sessions, commitments, 8.0, 22.0, buffer, day(), &UserSettings::default())
    }

    #[test]
    fn empty_day_starts_at_window_open() {
        assert_eq!(find(&[], &[], 2.0, 0.0), Some(Slot { start: 8.0, end: 10.0 }));
    }

    #[test]
    fn skips_gap_that_is_too_short() {
        let c = vec![FixedCommitment::on_date("class", day(), 9.0, 11.0)];
        assert_eq!(find(&[], &c, 2.0, 0.0), Some(Slot { start: 11.0, end: 13.0 }));
    }

    #[test]
    fn uses_gap_that_fits_exactly() {
        let c = vec![
            FixedCommitment::on_date("a", day(), 8.0, 9.0),
            FixedCommitment::on_date("b", day(), 11.0, 12.0),
        ];
        assert_eq!(find(&[], &c, 2.0, 0.0), Some(Slot { start: 9.0, end: 11.0 }));
    }

    #[test]
    fn buffer_pushes_slot_past_margin() {
        let sessions = vec![PlannedSession::new("x", 8.0, 10.0)];
        assert_eq!(find(&sessions, &[], 1.0, 0.5), Some(Slot { start: 10.5, end: 11.5 }));
    }

    #[test]
    fn sub_quarter_boundary_is_found_exactly() {
        let c = vec![FixedCommitment::on_date("call", day(), 8.0, 10.0 + 10.0 / 60.0)];
        let slot = find(&[], &c, 1.0, 0.0).unwrap();
        assert!((slot.start - (10.0 + 10.0 / 60.0)).abs() < 1e-9);
    }

    #[test]
    fn alignment_rounds_candidates_up() {
        let c = vec![FixedCommitment::on_date("call", day(), 8.0, 10.0 + 10.0 / 60.0)];
        let settings = UserSettings {
            slot_alignment_minutes: Some(15),
            ..UserSettings::default()
        };
        let slot = find_next_available_slot(1.0, &[], &c, 8.0, 22.0, 0.0, day(), &settings).unwrap();
        assert_eq!(slot, Slot { start: 10.25, end: 11.25 });
    }

    #[test]
    fn full_window_returns_none() {
        let c = vec![FixedCommitment::on_date("all day", day(), 8.0, 21.0)];
        assert_eq!(find(&[], &c, 2.0, 0.0), None);
        assert_eq!(find(&[], &c, 1.0, 0.0), Some(Slot { start: 21.0, end: 22.0 }));
    }

    #[test]
    fn raw_window_past_day_bounds_is_clamped() {
        let settings = UserSettings::default();
        let early = find_next_available_slot(2.0, &[], &[], -1.0, 10.0, 0.0, day(), &settings);
        assert_eq!(early, Some(Slot { start: 0.0, end: 2.0 }));

        let c = vec![FixedCommitment::on_date("shift", day(), 0.0, 23.0)];
        let late = find_next_available_slot(1.0, &[], &c, 20.0, 26.0, 0.0, day(), &settings);
        assert_eq!(late, Some(Slot { start: 23.0, end: 24.0 }));
        assert_eq!(find_next_available_slot(2.0, &[], &c, 20.0, 26.0, 0.0, day(), &settings), None);
    }

    #[test]
    fn degenerate_requests_return_none() {
        assert_eq!(find(&[], &[], 0.0, 0.0), None);
        assert_eq!(find(&[], &[], -1.0, 0.0), None);
        assert_eq!(find(&[], &[], 15.0, 0.0), None);
        assert_eq!(find(&[], &[], f64::NAN, 0.0), None);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let c = vec![FixedCommitment::on_date("class", day(), 9.0, 11.0)];
        let sessions = vec![PlannedSession::new("x", 11.5, 12.0)];
        assert_eq!(find(&sessions, &c, 1.5, 0.25), find(&sessions, &c, 1.5, 0.25));
    }

    #[test]
    fn find_slot_in_works_on_prebuilt_occupancy() {
        let occ = DayOccupancy::from_intervals(day(), vec![Interval::new(13.0, 14.0)]);
        let slot = find_slot_in(&occ, StudyWindow::new(12.0, 18.0), 2.0, 0.0, None);
        assert_eq!(slot, Some(Slot { start: 14.0, end: 16.0 }));
    }

    #[test]
    fn first_date_search_skips_full_and_non_work_days() {
        let monday = day();
        let tuesday = monday.succ_opt().unwrap();
        let wednesday = tuesday.succ_opt().unwrap();
        let commitments = vec![FixedCommitment::on_date("conference", monday, 8.0, 22.0)];
        let settings = UserSettings {
            work_days: vec![chrono::Weekday::Mon, chrono::Weekday::Wed],
            ..UserSettings::default()
        };

        let found = find_first_date_with_slot(monday, wednesday, 3.0, &[], &commitments, &settings)
            .unwrap()
            .unwrap();
        assert_eq!(found.0, wednesday);
        assert_eq!(found.1, Slot { start: 8.0, end: 11.0 });

        let none = find_first_date_with_slot(monday, tuesday, 3.0, &[], &commitments, &settings).unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn one_sitting_on_booked_deadline_has_no_slot() {
        let deadline = day();
        let task = Task::new("t1", "exam prep", deadline)
            .with_deadline(deadline)
            .with_hours(3.0)
            .one_sitting();
        let commitments = vec![
            FixedCommitment::on_date("work", deadline, 8.0, 12.0),
            FixedCommitment::on_date("work", deadline, 13.0, 17.0),
            FixedCommitment::on_date("gym", deadline, 18.0, 20.0),
        ];

        let check = check_one_sitting(&task, &[], &commitments, &UserSettings::default()).unwrap();
        assert_eq!(check, OneSittingCheck::NoSlot { date: deadline, hours: 3.0 });
        assert!(!check.is_feasible());
    }

    #[test]
    fn one_sitting_fits_when_gap_exists() {
        let deadline = day();
        let task = Task::new("t1", "essay", deadline)
            .with_deadline(deadline)
            .with_hours(2.0)
            .one_sitting();
        let check = check_one_sitting(&task, &[], &[], &UserSettings::default()).unwrap();
        assert!(check.is_feasible());
        assert!(matches!(check, OneSittingCheck::Fits { slot, .. } if slot.start == 8.0));

        let no_deadline = Task::new("t2", "essay", deadline).one_sitting();
        assert_eq!(
            check_one_sitting(&no_deadline, &[], &[], &UserSettings::default()).unwrap(),
            OneSittingCheck::MissingDeadline
        );
    }
}
