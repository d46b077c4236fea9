//! Effective study window resolution.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::settings::UserSettings;
use crate::time::{DAY_END_HOUR, DAY_START_HOUR};

/// Hours of a day during which sessions may be placed, as `[start_hour, end_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudyWindow {
    pub start_hour: f64,
    pub end_hour: f64,
}

impl StudyWindow {
    pub fn new(start_hour: f64, end_hour: f64) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn hours(&self) -> f64 {
        (self.end_hour - self.start_hour).max(0.0)
    }

    pub fn is_well_formed(&self) -> bool {
        self.start_hour >= DAY_START_HOUR
            && self.end_hour <= DAY_END_HOUR
            && self.start_hour < self.end_hour
    }

    /// Return the window unchanged, or a configuration error naming `scope`.
    /// Bounds are never swapped.
    pub fn checked(self, scope: impl Into<String>) -> Result<Self, ConfigError> {
        if self.is_well_formed() {
            Ok(self)
        } else {
            Err(ConfigError::InvalidWindow {
                scope: scope.into(),
                start_hour: self.start_hour,
                end_hour: self.end_hour,
            })
        }
    }
}

impl Default for StudyWindow {
    fn default() -> Self {
        Self::new(8.0, 22.0)
    }
}

/// Effective window for `date`: the weekday override when present, otherwise
/// the default window.
pub fn resolve_window(date: NaiveDate, settings: &UserSettings) -> Result<StudyWindow> {
    let weekday = date.weekday();
    let window = match settings.override_for(weekday) {
        Some(o) => o.window().checked(format!("{weekday} override"))?,
        None => settings.study_window.checked("default window")?,
    };
    Ok(window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::settings::WindowOverride;
    use chrono::Weekday;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[test]
    fn falls_back_to_default_window() {
        let settings = UserSettings::default();
        let w = resolve_window(monday(), &settings).unwrap();
        assert_eq!(w, StudyWindow::new(8.0, 22.0));
    }

    #[test]
    fn weekday_override_wins() {
        let mut settings = UserSettings::default();
        settings.window_overrides.push(WindowOverride::new(Weekday::Mon, 13.0, 18.5));

        let w = resolve_window(monday(), &settings).unwrap();
        assert_eq!(w, StudyWindow::new(13.0, 18.5));

        let tuesday = monday().succ_opt().unwrap();
        assert_eq!(resolve_window(tuesday, &settings).unwrap(), StudyWindow::new(8.0, 22.0));
    }

    #[test]
    fn inverted_window_is_a_configuration_error() {
        let mut settings = UserSettings::default();
        settings.study_window = StudyWindow::new(22.0, 8.0);
        let err = resolve_window(monday(), &settings).unwrap_err();
        assert!(matches!(
            err,
            PlanError::Configuration(ConfigError::InvalidWindow { start_hour, end_hour, .. })
                if start_hour == 22.0 && end_hour == 8.0
        ));
    }

    #[test]
    fn empty_override_is_rejected() {
        let mut settings = UserSettings::default();
        settings.window_overrides.push(WindowOverride::new(Weekday::Mon, 10.0, 10.0));
        assert!(resolve_window(monday(), &settings).is_err());
    }
}
