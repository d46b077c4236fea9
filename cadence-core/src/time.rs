//! Hour arithmetic shared by the window, occupancy and slot modules.
//!
//! Times of day are fractional hours (`9.5` is 09:30). Comparisons go
//! through `EPSILON` so sums like `8.1 + 0.2` still line up with `8.3`.

use chrono::NaiveDate;

/// Tolerance for hour comparisons.
pub const EPSILON: f64 = 1e-9;

pub const DAY_START_HOUR: f64 = 0.0;
pub const DAY_END_HOUR: f64 = 24.0;

pub fn minutes_to_hours(minutes: u32) -> f64 {
    f64::from(minutes) / 60.0
}

/// Round `hour` up to the next multiple of `step_minutes`.
///
/// A value already on a boundary (within `EPSILON`) is returned on that boundary.
pub fn align_up(hour: f64, step_minutes: u32) -> f64 {
    if step_minutes == 0 {
        return hour;
    }
    let step = minutes_to_hours(step_minutes);
    ((hour - EPSILON) / step).ceil() * step
}

/// Round up to the next quarter hour.
pub fn ceil_to_quarter_hour(hours: f64) -> f64 {
    align_up(hours, 15)
}

/// Calendar days from `start` to `end` (negative when `end` is earlier).
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Human-readable duration: "Not set", "45m", "2h", "1h 30m".
pub fn format_hours(hours: f64) -> String {
    let total_minutes = (hours * 60.0).round().max(0.0) as i64;
    let h = total_minutes / 60;
    let m = total_minutes % 60;
    match (h, m) {
        (0, 0) => "Not set".to_string(),
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Clock rendering of a fractional hour, e.g. `13.75` -> "13:45".
pub fn format_clock(hour: f64) -> String {
    let total_minutes = (hour * 60.0).round().max(0.0) as i64;
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_keeps_boundaries() {
        assert_eq!(align_up(8.0, 15), 8.0);
        assert_eq!(align_up(8.1, 15), 8.25);
        assert_eq!(align_up(8.26, 30), 8.5);
        assert_eq!(align_up(8.1, 0), 8.1);
    }

    #[test]
    fn align_up_tolerates_float_noise() {
        let noisy = 8.1 + 0.15; // 8.25 with representation error
        assert!((align_up(noisy, 15) - 8.25).abs() < 1e-9);
    }

    #[test]
    fn format_hours_matches_display_rules() {
        assert_eq!(format_hours(0.0), "Not set");
        assert_eq!(format_hours(0.75), "45m");
        assert_eq!(format_hours(2.0), "2h");
        assert_eq!(format_hours(1.5), "1h 30m");
    }

    #[test]
    fn format_clock_pads() {
        assert_eq!(format_clock(9.0), "09:00");
        assert_eq!(format_clock(13.75), "13:45");
    }

    #[test]
    fn days_between_is_signed() {
        let a = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        let b = NaiveDate::from_ymd_opt(2026, 2, 25).unwrap();
        assert_eq!(days_between(a, b), 5);
        assert_eq!(days_between(b, a), -5);
    }
}
