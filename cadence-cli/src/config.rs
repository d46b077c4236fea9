use anyhow::{anyhow, bail, Context, Result};
use cadence_core::{StudyWindow, UserSettings, WindowOverride};
use chrono::{NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::state::ensure_cadence_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA zone used to decide what "today" is.
    pub timezone: String,
    #[serde(default)]
    pub availability: AvailabilitySection,
}

/// `UserSettings` in a hand-editable shape: windows are `"HH:MM-HH:MM"`
/// strings and weekdays are short names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilitySection {
    pub daily_available_hours: f64,
    pub buffer_minutes: u32,
    pub study_window: String,
    pub work_days: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_alignment_minutes: Option<u32>,
    pub planning_horizon_days: u32,
    pub min_session_minutes: u32,
    /// Weekday name -> window, e.g. `sat = "10:00-14:00"`. Kept last so it
    /// serializes as a trailing table.
    pub window_overrides: BTreeMap<String, String>,
}

impl Default for AvailabilitySection {
    fn default() -> Self {
        let d = UserSettings::default();
        Self {
            daily_available_hours: d.daily_available_hours,
            buffer_minutes: d.buffer_minutes,
            study_window: format_window(d.study_window),
            work_days: d.work_days.iter().map(|w| short_day(*w).to_string()).collect(),
            slot_alignment_minutes: d.slot_alignment_minutes,
            planning_horizon_days: d.planning_horizon_days,
            min_session_minutes: d.min_session_minutes,
            window_overrides: BTreeMap::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: "America/Chicago".to_string(),
            availability: AvailabilitySection::default(),
        }
    }
}

impl Config {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| anyhow!("invalid timezone: {}", self.timezone))
    }

    /// Current calendar date in the configured timezone.
    pub fn today(&self) -> Result<NaiveDate> {
        Ok(Utc::now().with_timezone(&self.tz()?).date_naive())
    }

    /// Engine settings, checked before they are handed out.
    pub fn settings(&self) -> Result<UserSettings> {
        let a = &self.availability;
        let mut overrides = Vec::with_capacity(a.window_overrides.len());
        for (day, text) in &a.window_overrides {
            let day = parse_weekday(day)?;
            let w = parse_window(text).with_context(|| format!("window override for {day}"))?;
            overrides.push(WindowOverride::new(day, w.start_hour, w.end_hour));
        }
        let work_days = a
            .work_days
            .iter()
            .map(|d| parse_weekday(d))
            .collect::<Result<Vec<_>>>()?;

        let settings = UserSettings {
            daily_available_hours: a.daily_available_hours,
            buffer_minutes: a.buffer_minutes,
            study_window: parse_window(&a.study_window).context("study_window")?,
            window_overrides: overrides,
            work_days,
            slot_alignment_minutes: a.slot_alignment_minutes,
            planning_horizon_days: a.planning_horizon_days,
            min_session_minutes: a.min_session_minutes,
        };
        settings.validate().context("invalid availability settings")?;
        Ok(settings)
    }
}

static WINDOW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,2}):(\d{2})\s*-\s*(\d{1,2}):(\d{2})\s*$")
        .expect("window pattern is a valid regex")
});

/// Parse `"HH:MM-HH:MM"` into a window. `24:00` is allowed as an end.
pub fn parse_window(text: &str) -> Result<StudyWindow> {
    let caps = WINDOW_RE
        .captures(text)
        .ok_or_else(|| anyhow!("expected HH:MM-HH:MM, got '{text}'"))?;

    let clock = |h: usize, m: usize| -> Result<f64> {
        let hours: u32 = caps[h].parse()?;
        let minutes: u32 = caps[m].parse()?;
        if minutes >= 60 || hours > 24 || (hours == 24 && minutes > 0) {
            bail!("invalid time in '{text}'");
        }
        Ok(f64::from(hours) + f64::from(minutes) / 60.0)
    };

    let window = StudyWindow::new(clock(1, 2)?, clock(3, 4)?);
    if !window.is_well_formed() {
        bail!("window '{text}' must start before it ends");
    }
    Ok(window)
}

pub fn format_window(w: StudyWindow) -> String {
    format!(
        "{}-{}",
        cadence_core::time::format_clock(w.start_hour),
        cadence_core::time::format_clock(w.end_hour)
    )
}

fn parse_weekday(s: &str) -> Result<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| anyhow!("unknown weekday: {s}"))
}

fn short_day(w: Weekday) -> &'static str {
    match w {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_cadence_home()?.join("config.toml"))
}

/// Config at `path`, or the defaults when the file does not exist yet.
pub fn load_config_from(path: &Path) -> Result<Config> {
    match fs::read_to_string(path) {
        Ok(text) => toml::from_str(&text).with_context(|| format!("parse {}", path.display())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
    }
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<()> {
    let text = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, text).with_context(|| format!("write {}", path.display()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    AlreadyExists,
}

/// Write the default config to `path` unless a file is already there.
pub fn init_config_at(path: &Path) -> Result<InitOutcome> {
    if path.exists() {
        return Ok(InitOutcome::AlreadyExists);
    }
    save_config_to(path, &Config::default())?;
    Ok(InitOutcome::Created)
}
