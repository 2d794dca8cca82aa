//! Range and window utilities
//!
//! Calendar week and month windows at local-day granularity, used by the
//! period aggregator for period-over-period navigation. A window is always
//! inclusive on both ends: local midnight of the first day through
//! 23:59:59.999 of the last day.
//!
//! Offsets count backwards from `today` (offset 0 is the current window)
//! and are clamped at 0: there is no navigating into the future. The
//! previous sibling of `week_range(today, o)` is simply
//! `week_range(today, o + 1)`, and likewise for months.

use crate::event::Event;
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An inclusive window of whole local calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    /// First instant of the window (first day at 00:00:00.000)
    pub start: NaiveDateTime,
    /// Last instant of the window (last day at 23:59:59.999)
    pub end: NaiveDateTime,
}

impl DayRange {
    /// Build the inclusive window spanning `first` through `last` day
    pub fn spanning(first: NaiveDate, last: NaiveDate) -> Self {
        debug_assert!(first <= last);
        Self {
            start: first.and_hms_opt(0, 0, 0).expect("midnight is valid"),
            end: last
                .and_hms_milli_opt(23, 59, 59, 999)
                .expect("end of day is valid"),
        }
    }

    /// Inclusive-bounds membership test on an instant
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.end
    }

    /// First calendar day of the window
    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    /// Last calendar day of the window
    pub fn last_day(&self) -> NaiveDate {
        self.end.date()
    }

    /// Number of whole calendar days in the window
    pub fn day_count(&self) -> i64 {
        (self.last_day() - self.first_day()).num_days() + 1
    }

    /// Iterate every calendar day in the window, oldest first
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day();
        (0..self.day_count()).map(move |i| first + Duration::days(i))
    }

    /// Events whose primary timestamp falls inside the window
    pub fn filter<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        events.iter().filter(|e| self.contains(e.timestamp)).collect()
    }

    /// Split events into (inside, outside) by primary timestamp
    pub fn partition<'a>(&self, events: &'a [Event]) -> (Vec<&'a Event>, Vec<&'a Event>) {
        events.iter().partition(|e| self.contains(e.timestamp))
    }
}

/// The 7-day window ending `offset` weeks before today, inclusive
///
/// `week_range(today, 0)` ends today at 23:59:59.999 and starts six days
/// earlier at midnight. Negative offsets clamp to 0.
pub fn week_range(today: NaiveDate, offset: i64) -> DayRange {
    let offset = offset.max(0);
    let last = today - Duration::days(offset * 7);
    let first = last - Duration::days(6);
    DayRange::spanning(first, last)
}

/// The calendar month `offset` months before the current one, inclusive
///
/// Respects variable month lengths: the window runs from the first of the
/// month through its actual last day. Negative offsets clamp to 0.
pub fn month_range(today: NaiveDate, offset: i64) -> DayRange {
    let offset = offset.max(0);
    let current_first = today.with_day(1).expect("day 1 is valid in every month");
    let first = current_first - Months::new(offset as u32);
    let last = (first + Months::new(1)) - Duration::days(1);
    DayRange::spanning(first, last)
}
