//! cadence-core: time-slot allocation and session distribution for study planning

pub mod commitment;
pub mod distribution;
pub mod error;
pub mod materialize;
pub mod occupancy;
pub mod plan;
pub mod settings;
pub mod slot;
pub mod task;
pub mod time;
pub mod urgency;
pub mod validation;
pub mod window;

pub use commitment::{DateRule, FixedCommitment};
pub use distribution::{plan as plan_distribution, plan_for_task, SessionDistribution};
pub use error::{ConfigError, DateOrderError, PlanError, Result};
pub use materialize::{
    materialize, materialize_all, Materialization, ProposedSession, TaskPlanOutcome,
};
pub use occupancy::{DayOccupancy, Interval};
pub use plan::{PlannedSession, SessionStatus, StudyPlan};
pub use settings::{UserSettings, WindowOverride};
pub use slot::{
    check_one_sitting, find_first_date_with_slot, find_next_available_slot, OneSittingCheck, Slot,
};
pub use task::{DeadlineKind, Importance, SchedulingPreference, Task};
pub use urgency::{classify, Cadence, UrgencyTier};
pub use validation::{validate_task, Severity, TaskReport, ValidationIssue};
pub use window::{resolve_window, StudyWindow};
