//! Interval conflict model for a single day.
//!
//! Occupied time is kept as sorted, non-overlapping half-open hour intervals
//! `[start, end)`. Inputs are normalized on the way in: spans are clamped to
//! the day, empty spans dropped and overlapping or touching spans coalesced.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::commitment::FixedCommitment;
use crate::plan::PlannedSession;
use crate::time::{DAY_END_HOUR, DAY_START_HOUR, EPSILON};
use crate::window::StudyWindow;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn hours(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Half-open overlap; touching intervals do not overlap.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.start < end - EPSILON && start < self.end - EPSILON
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayOccupancy {
    date: NaiveDate,
    intervals: Vec<Interval>,
}

impl DayOccupancy {
    /// Project matching commitments and time-occupying sessions onto `date`.
    pub fn build<'a>(
        date: NaiveDate,
        sessions: impl IntoIterator<Item = &'a PlannedSession>,
        commitments: &[FixedCommitment],
    ) -> Self {
        let raw = commitments
            .iter()
            .filter_map(|c| c.interval_on(date))
            .chain(
                sessions
                    .into_iter()
                    .filter(|s| s.occupies_time())
                    .map(|s| Interval::new(s.start_hour, s.end_hour)),
            );
        Self::from_intervals(date, raw)
    }

    pub fn from_intervals(date: NaiveDate, raw: impl IntoIterator<Item = Interval>) -> Self {
        Self {
            date,
            intervals: normalize(raw.into_iter().collect()),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Sorted, non-overlapping occupied intervals.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Mark `[start, end)` as occupied.
    pub fn occupy(&mut self, start: f64, end: f64) {
        let mut raw = std::mem::take(&mut self.intervals);
        raw.push(Interval::new(start, end));
        self.intervals = normalize(raw);
    }

    /// True iff `[start - buffer, end + buffer)` touches no occupied interval
    /// and `[start, end)` is a non-empty span inside the day.
    pub fn is_free(&self, start: f64, end: f64, buffer: f64) -> bool {
        if start < DAY_START_HOUR - EPSILON || end > DAY_END_HOUR + EPSILON {
            return false;
        }
        if end - start <= EPSILON {
            return false;
        }
        self.blocking_end(start, end, buffer).is_none()
    }

    /// End of the earliest occupied interval that conflicts with the buffered
    /// range, if any.
    pub fn blocking_end(&self, start: f64, end: f64, buffer: f64) -> Option<f64> {
        let buffer = buffer.max(0.0);
        let (lo, hi) = (start - buffer, end + buffer);
        self.intervals
            .iter()
            .take_while(|iv| iv.start < hi - EPSILON)
            .find(|iv| iv.overlaps(lo, hi))
            .map(|iv| iv.end)
    }

    pub fn occupied_hours(&self) -> f64 {
        self.intervals.iter().map(Interval::hours).sum()
    }

    /// Occupied hours that fall inside `window`.
    pub fn occupied_within(&self, window: StudyWindow) -> f64 {
        self.intervals
            .iter()
            .map(|iv| {
                let s = iv.start.max(window.start_hour);
                let e = iv.end.min(window.end_hour);
                (e - s).max(0.0)
            })
            .sum()
    }

    /// Maximal spans inside `window` where a session may sit, honoring the
    /// buffer on both sides of every occupied interval.
    pub fn free_gaps(&self, window: StudyWindow, buffer: f64) -> Vec<Interval> {
        let buffer = buffer.max(0.0);
        let mut gaps = Vec::new();
        let mut cursor = window.start_hour;

        for iv in &self.intervals {
            let blocked_from = iv.start - buffer;
            let blocked_to = iv.end + buffer;
            if blocked_to <= cursor + EPSILON {
                continue;
            }
            if blocked_from >= window.end_hour - EPSILON {
                break;
            }
            if blocked_from > cursor + EPSILON {
                gaps.push(Interval::new(cursor, blocked_from));
            }
            cursor = cursor.max(blocked_to);
        }

        if window.end_hour > cursor + EPSILON {
            gaps.push(Interval::new(cursor, window.end_hour));
        }
        gaps
    }
}

fn normalize(raw: Vec<Interval>) -> Vec<Interval> {
    let input_len = raw.len();
    let mut spans: Vec<Interval> = raw
        .into_iter()
        .filter_map(|iv| {
            let start = iv.start.max(DAY_START_HOUR);
            let end = iv.end.min(DAY_END_HOUR);
            if end - start > EPSILON {
                Some(Interval::new(start, end))
            } else {
                warn!(start = iv.start, end = iv.end, "dropping empty occupied interval");
                None
            }
        })
        .collect();

    spans.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<Interval> = Vec::with_capacity(spans.len());
    for iv in spans {
        match merged.last_mut() {
            Some(last) if iv.start <= last.end + EPSILON => {
                last.end = last.end.max(iv.end);
            }
            _ => merged.push(iv),
        }
    }

    if merged.len() < input_len {
        debug!(input = input_len, merged = merged.len(), "coalesced occupied intervals");
    }
    merged
}
