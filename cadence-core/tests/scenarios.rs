use cadence_core::{
    check_one_sitting, find_next_available_slot, materialize, plan_distribution, plan_for_task,
    validate_task, DeadlineKind, FixedCommitment, OneSittingCheck, PlanError, PlannedSession,
    SchedulingPreference, SessionStatus, Slot, StudyPlan, Task, UrgencyTier, UserSettings,
    ValidationIssue, WindowOverride,
};
use chrono::{NaiveDate, Weekday};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn monday() -> NaiveDate {
    date(2026, 3, 2)
}

#[test]
fn empty_day_gives_first_two_hours() {
    let slot = find_next_available_slot(2.0, &[], &[], 8.0, 22.0, 0.0, monday(), &UserSettings::default());
    assert_eq!(slot, Some(Slot { start: 8.0, end: 10.0 }));
}

#[test]
fn short_morning_gap_is_rejected() {
    let c = vec![FixedCommitment::on_date("lecture", monday(), 9.0, 11.0)];
    let slot = find_next_available_slot(2.0, &[], &c, 8.0, 22.0, 0.0, monday(), &UserSettings::default());
    assert_eq!(slot, Some(Slot { start: 11.0, end: 13.0 }));
}

#[test]
fn five_days_ten_hours_is_urgent_with_five_sessions() {
    let start = monday();
    let deadline = date(2026, 3, 7);
    let d = plan_distribution(10.0, Some(deadline), start, false, SchedulingPreference::Consistent).unwrap();
    assert_eq!(d.tier, UrgencyTier::Urgent);
    assert_eq!(d.estimated_sessions, 5);
}

#[test]
fn declared_no_deadline_gives_zero_sessions() {
    let task = Task::new("t1", "background reading", monday())
        .with_hours(10.0)
        .with_deadline(date(2026, 3, 7))
        .with_deadline_kind(DeadlineKind::None);
    let d = plan_for_task(&task).unwrap();
    assert_eq!(d.estimated_sessions, 0);
    assert_eq!(d.tier, UrgencyTier::Relaxed);
}

#[test]
fn fully_booked_deadline_fails_one_sitting_task() {
    let deadline = date(2026, 3, 6);
    let task = Task::new("exam", "final exam prep", monday())
        .with_hours(2.0)
        .with_deadline(deadline)
        .one_sitting();
    let booked = vec![FixedCommitment::on_date("work", deadline, 8.0, 22.0)];
    let settings = UserSettings::default();

    let check = check_one_sitting(&task, &[], &booked, &settings).unwrap();
    assert!(!check.is_feasible());

    let report = validate_task(&task, monday(), &settings, &[], &booked).unwrap();
    assert!(!report.is_valid());
    assert!(report
        .errors
        .iter()
        .any(|e| matches!(e, ValidationIssue::OneSittingNoSlot { .. })));

    let err = materialize(&task, &[], &booked, &settings).unwrap_err();
    assert!(matches!(err, PlanError::NoSlotForOneSitting { .. }));
}

#[test]
fn weekend_override_and_recurring_class_shape_the_slot() {
    let saturday = date(2026, 3, 7);
    let settings = UserSettings {
        window_overrides: vec![WindowOverride::new(Weekday::Sat, 10.0, 14.0)],
        ..UserSettings::default()
    };
    let class = FixedCommitment::weekly("yoga", vec![Weekday::Sat], 10.0, 12.0);
    let task = Task::new("t1", "essay", monday())
        .with_hours(2.5)
        .with_deadline(saturday)
        .one_sitting();

    let check = check_one_sitting(&task, &[], &[class.clone()], &settings).unwrap();
    assert_eq!(
        check,
        OneSittingCheck::NoSlot {
            date: saturday,
            hours: 2.5
        }
    );

    let skipped = class.skipping(saturday);
    let check = check_one_sitting(&task, &[], &[skipped], &settings).unwrap();
    assert_eq!(
        check,
        OneSittingCheck::Fits {
            date: saturday,
            slot: Slot { start: 10.0, end: 12.5 }
        }
    );
}

#[test]
fn skipped_sessions_free_their_time_for_planning() {
    let mut plan = StudyPlan::new(monday());
    plan.push(PlannedSession::new("old", 8.0, 12.0).with_status(SessionStatus::Skipped));
    plan.push(PlannedSession::new("kept", 12.0, 13.0));

    let task = Task::new("t1", "problem set", monday())
        .with_hours(2.0)
        .with_deadline(monday())
        .with_preference(SchedulingPreference::Intensive);
    let m = materialize(&task, &[plan], &[], &UserSettings::default()).unwrap();
    assert_eq!(m.sessions.len(), 1);
    assert_eq!(m.sessions[0].slot, Slot { start: 8.0, end: 10.0 });
}

#[test]
fn buffer_minutes_space_sessions_apart() {
    let mut plan = StudyPlan::new(monday());
    plan.push(PlannedSession::new("earlier", 8.0, 9.0));
    let settings = UserSettings {
        buffer_minutes: 15,
        ..UserSettings::default()
    };
    let task = Task::new("t1", "flashcards", monday())
        .with_hours(1.0)
        .with_deadline(monday());
    let m = materialize(&task, &[plan], &[], &settings).unwrap();
    assert_eq!(m.sessions[0].slot, Slot { start: 9.25, end: 10.25 });
}

#[test]
fn total_time_needed_drives_materialization() {
    let task = Task::new("t1", "capstone", monday())
        .with_hours(1.0)
        .with_total_time_needed(4.0)
        .with_deadline(date(2026, 3, 3))
        .with_preference(SchedulingPreference::Intensive);
    let m = materialize(&task, &[], &[], &UserSettings::default()).unwrap();
    assert!((m.scheduled_hours - 4.0).abs() < 1e-9);
    assert_eq!(m.sessions.len(), 2);
    assert_eq!(m.distribution.estimated_sessions, 2);
}
