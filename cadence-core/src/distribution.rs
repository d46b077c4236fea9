//! Session distribution planner: urgency tier, rationale and an estimated
//! session count. Advisory only; placement happens in `materialize`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::task::{SchedulingPreference, Task};
use crate::time::EPSILON;
use crate::urgency::{classify, days_until_deadline, Cadence, UrgencyTier};

/// Session length assumed when estimating counts. Not a cap on real sessions.
pub const ASSUMED_SESSION_HOURS: f64 = 2.0;

const UNPLANNED_DESCRIPTION: &str = "Sessions will be distributed based on available time slots";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDistribution {
    pub tier: UrgencyTier,
    pub cadence: Cadence,
    pub description: String,
    pub estimated_sessions: u32,
    pub preference: SchedulingPreference,
    /// `None` when no deadline drove the tier.
    pub days_until_deadline: Option<i64>,
}

impl SessionDistribution {
    fn unplanned(preference: SchedulingPreference) -> Self {
        Self {
            tier: UrgencyTier::Relaxed,
            cadence: UrgencyTier::Relaxed.cadence(),
            description: UNPLANNED_DESCRIPTION.to_string(),
            estimated_sessions: 0,
            preference,
            days_until_deadline: None,
        }
    }

    /// True when a deadline-driven multi-session plan was produced.
    pub fn is_planned(&self) -> bool {
        self.estimated_sessions > 0
    }
}

pub fn estimate_sessions(total_hours: f64) -> u32 {
    if total_hours <= EPSILON {
        return 0;
    }
    (total_hours / ASSUMED_SESSION_HOURS - EPSILON).ceil() as u32
}

/// Classify and estimate a multi-session plan.
///
/// No deadline, a one-sitting task, or nothing to schedule all give a relaxed
/// result with zero sessions.
pub fn plan(
    total_hours: f64,
    deadline: Option<NaiveDate>,
    start_date: NaiveDate,
    is_one_sitting: bool,
    preference: SchedulingPreference,
) -> Result<SessionDistribution> {
    let Some(deadline) = deadline else {
        return Ok(SessionDistribution::unplanned(preference));
    };
    if is_one_sitting || total_hours <= EPSILON {
        return Ok(SessionDistribution::unplanned(preference));
    }

    let days = days_until_deadline(start_date, deadline)?;
    let tier = classify(days)?;

    Ok(SessionDistribution {
        tier,
        cadence: tier.cadence(),
        description: tier.description().to_string(),
        estimated_sessions: estimate_sessions(total_hours),
        preference,
        days_until_deadline: Some(days),
    })
}

/// `plan` over a task's effective total and effective deadline kind.
pub fn plan_for_task(task: &Task) -> Result<SessionDistribution> {
    plan(
        task.effective_total_hours(),
        task.planning_deadline(),
        task.start_date,
        task.one_sitting,
        task.scheduling_preference,
    )
}
