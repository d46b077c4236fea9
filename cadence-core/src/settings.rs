//! Per-user availability settings, supplied fresh on every engine call.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::time::minutes_to_hours;
use crate::window::StudyWindow;

pub const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Study window replacing the default on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowOverride {
    pub day: Weekday,
    pub start_hour: f64,
    pub end_hour: f64,
}

impl WindowOverride {
    pub fn new(day: Weekday, start_hour: f64, end_hour: f64) -> Self {
        Self {
            day,
            start_hour,
            end_hour,
        }
    }

    pub fn window(&self) -> StudyWindow {
        StudyWindow::new(self.start_hour, self.end_hour)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Aggregate hours the user is willing to study per day.
    pub daily_available_hours: f64,

    /// Idle margin kept before and after every session.
    pub buffer_minutes: u32,

    pub study_window: StudyWindow,

    /// First override for a weekday wins.
    pub window_overrides: Vec<WindowOverride>,

    pub work_days: Vec<Weekday>,

    /// Snap slot starts to this step (e.g. 15 for quarter hours). `None` places
    /// slots exactly at conflict boundaries.
    pub slot_alignment_minutes: Option<u32>,

    /// How far ahead deadline-less tasks are spread.
    pub planning_horizon_days: u32,

    /// Sessions shorter than this are not proposed unless they finish the task.
    pub min_session_minutes: u32,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            daily_available_hours: 6.0,
            buffer_minutes: 0,
            study_window: StudyWindow::default(),
            window_overrides: Vec::new(),
            work_days: ALL_WEEKDAYS.to_vec(),
            slot_alignment_minutes: None,
            planning_horizon_days: 14,
            min_session_minutes: 30,
        }
    }
}

impl UserSettings {
    pub fn buffer_hours(&self) -> f64 {
        minutes_to_hours(self.buffer_minutes)
    }

    pub fn min_session_hours(&self) -> f64 {
        minutes_to_hours(self.min_session_minutes)
    }

    pub fn override_for(&self, day: Weekday) -> Option<&WindowOverride> {
        self.window_overrides.iter().find(|o| o.day == day)
    }

    pub fn is_work_day(&self, date: NaiveDate) -> bool {
        self.work_days.contains(&date.weekday())
    }

    /// Check every window and numeric field up front.
    pub fn validate(&self) -> Result<()> {
        self.study_window.checked("default window")?;
        for o in &self.window_overrides {
            o.window().checked(format!("{} override", o.day))?;
        }

        if !(self.daily_available_hours > 0.0 && self.daily_available_hours <= 24.0) {
            return Err(ConfigError::invalid_value(
                "daily_available_hours",
                format!("must be in (0, 24], got {}", self.daily_available_hours),
            )
            .into());
        }
        if self.work_days.is_empty() {
            return Err(ConfigError::invalid_value("work_days", "at least one day is required").into());
        }
        if self.slot_alignment_minutes == Some(0) {
            return Err(ConfigError::invalid_value("slot_alignment_minutes", "must be positive").into());
        }
        if self.planning_horizon_days == 0 {
            return Err(ConfigError::invalid_value("planning_horizon_days", "must be positive").into());
        }
        if self.buffer_minutes >= 24 * 60 {
            return Err(ConfigError::invalid_value(
                "buffer_minutes",
                format!("must be shorter than a day, got {}", self.buffer_minutes),
            )
            .into());
        }
        Ok(())
    }
}
