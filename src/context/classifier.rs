//! Stream context classifiers
//!
//! Pure functions that relate one focal reading to nearby events in another
//! stream: "taken shortly after medication / a walk / a meal / caffeine".
//! Each takes explicit event slices (no fetching) and returns either a
//! structured context or a well-defined "no relevant event" result.
//!
//! "No data" and "negative state" are distinct: medication and caffeine
//! context return `None` when the day holds no relevant events at all,
//! while walk and meal context always produce a bucket (Resting / Fasting).

use crate::event::{DoseStatus, Event, EventBody, EventKind};
use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

/// Format a minute count as `"Xm"` under an hour, else `"Xh Ym"`
pub fn format_minutes(minutes: i64) -> String {
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

fn minutes_between(earlier: NaiveDateTime, later: NaiveDateTime) -> i64 {
    let millis = (later - earlier).num_milliseconds();
    ((millis as f64) / 60_000.0).round() as i64
}

/// Medication context buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MedBucket {
    PostMeds,
    PreMeds,
}

/// Result of [`medication_context`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicationContext {
    pub bucket: MedBucket,
    /// Minutes since the most recent taken dose; `None` for pre-meds
    pub minutes_since: Option<i64>,
    pub label: String,
}

/// Classify a reading against the day's medication doses
///
/// Only `Taken` doses logged on the reading's local day count. The most
/// recent dose at or before the reading wins. Returns `None` when the day
/// holds no taken doses at all: that is "no data", not "pre-meds".
pub fn medication_context(
    reading_time: NaiveDateTime,
    medication_events: &[Event],
) -> Option<MedicationContext> {
    let day = reading_time.date();
    let taken: Vec<&Event> = medication_events
        .iter()
        .filter(|e| {
            e.local_date() == day
                && matches!(
                    &e.body,
                    EventBody::Medication(m) if m.status == DoseStatus::Taken
                )
        })
        .collect();

    if taken.is_empty() {
        return None;
    }

    let latest_before = taken
        .iter()
        .filter(|e| e.timestamp <= reading_time)
        .max_by_key(|e| e.timestamp);

    match latest_before {
        Some(dose) => {
            let minutes = minutes_between(dose.timestamp, reading_time);
            Some(MedicationContext {
                bucket: MedBucket::PostMeds,
                minutes_since: Some(minutes),
                label: format!("Post-Meds ({})", format_minutes(minutes)),
            })
        }
        None => Some(MedicationContext {
            bucket: MedBucket::PreMeds,
            minutes_since: None,
            label: "Pre-Meds".to_string(),
        }),
    }
}

/// Walk/exercise context buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalkBucket {
    PostWalk,
    Resting,
}

/// Result of [`walk_context`] (always produced, unlike medication context)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkContext {
    pub bucket: WalkBucket,
    pub minutes_since: Option<i64>,
    pub label: String,
}

/// Minutes since a walk end within the post-walk window, first match wins.
///
/// Only closed walks whose end falls on the reading's local day count;
/// the window is [0, 90] minutes before the reading. Tie-break is the
/// first match in input order, not the closest in time (intentional,
/// preserved from the original behavior).
fn recent_walk_minutes(reading_time: NaiveDateTime, walk_events: &[Event]) -> Option<i64> {
    let day = reading_time.date();
    for walk in walk_events.iter().filter(|e| e.kind() == EventKind::Walk) {
        let Some(end) = walk.interval().and_then(|i| i.end) else {
            continue;
        };
        if end.date() != day || end > reading_time {
            continue;
        }
        let minutes = minutes_between(end, reading_time);
        if (0..=90).contains(&minutes) {
            return Some(minutes);
        }
    }
    None
}

/// Classify a reading against the day's walks
pub fn walk_context(reading_time: NaiveDateTime, walk_events: &[Event]) -> WalkContext {
    match recent_walk_minutes(reading_time, walk_events) {
        Some(minutes) => WalkContext {
            bucket: WalkBucket::PostWalk,
            minutes_since: Some(minutes),
            label: format!("Post-Walk ({})", format_minutes(minutes)),
        },
        None => WalkContext {
            bucket: WalkBucket::Resting,
            minutes_since: None,
            label: "Resting".to_string(),
        },
    }
}

/// Whether a closed walk ended within 90 minutes before the reading,
/// on the same local day. Shared by the walk context and the coarser
/// time-of-day slot; their outputs stay separate.
pub(crate) fn walk_ended_recently(reading_time: NaiveDateTime, walk_events: &[Event]) -> bool {
    recent_walk_minutes(reading_time, walk_events).is_some()
}

/// Meal context buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MealBucket {
    PostMeal,
    Fasting,
}

/// Result of [`meal_context`] (always produced)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealContext {
    pub bucket: MealBucket,
    pub minutes_since: Option<i64>,
    pub label: String,
}

/// Classify a reading against the day's meals
///
/// Food events count unconditionally; drink events only when they carry
/// calories. Most recent event at or before the reading wins.
pub fn meal_context(reading_time: NaiveDateTime, nutrition_events: &[Event]) -> MealContext {
    let day = reading_time.date();
    let latest = nutrition_events
        .iter()
        .filter(|e| e.local_date() == day && e.timestamp <= reading_time)
        .filter(|e| match &e.body {
            EventBody::Food(_) => true,
            EventBody::Drink(d) => d.macros.calories > 0.0,
            _ => false,
        })
        .max_by_key(|e| e.timestamp);

    match latest {
        Some(meal) => {
            let minutes = minutes_between(meal.timestamp, reading_time);
            MealContext {
                bucket: MealBucket::PostMeal,
                minutes_since: Some(minutes),
                label: format!("Post-Meal ({})", format_minutes(minutes)),
            }
        }
        None => MealContext {
            bucket: MealBucket::Fasting,
            minutes_since: None,
            label: "Fasting".to_string(),
        },
    }
}

/// Result of [`caffeine_context`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaffeineContext {
    pub minutes_since: i64,
    pub caffeine_mg: f64,
    pub label: String,
}

/// Classify a reading against the day's caffeine intake
///
/// Most recent caffeinated item at or before the reading, same local day.
/// Returns `None` when there is none: caffeine has no "fasting"-style
/// negative state.
pub fn caffeine_context(
    reading_time: NaiveDateTime,
    nutrition_events: &[Event],
) -> Option<CaffeineContext> {
    let day = reading_time.date();
    let latest = nutrition_events
        .iter()
        .filter(|e| {
            e.local_date() == day && e.timestamp <= reading_time && e.caffeine_mg() > 0.0
        })
        .max_by_key(|e| e.timestamp)?;

    let minutes = minutes_between(latest.timestamp, reading_time);
    Some(CaffeineContext {
        minutes_since: minutes,
        caffeine_mg: latest.caffeine_mg(),
        label: format!("Caffeine ({})", format_minutes(minutes)),
    })
}

/// Coarse grouping slot for a reading, used by the period aggregator
///
/// A different, deliberately coarser partition than the walk context label:
/// post-walk takes precedence, then readings before 14:00 are morning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingSlot {
    Morning,
    PostWalk,
    Evening,
}

impl ReadingSlot {
    pub fn all() -> &'static [ReadingSlot] {
        &[ReadingSlot::Morning, ReadingSlot::PostWalk, ReadingSlot::Evening]
    }
}

impl std::fmt::Display for ReadingSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadingSlot::Morning => write!(f, "morning"),
            ReadingSlot::PostWalk => write!(f, "post-walk"),
            ReadingSlot::Evening => write!(f, "evening"),
        }
    }
}

/// Assign a reading to its time-of-day slot
pub fn reading_slot(reading_time: NaiveDateTime, walk_events: &[Event]) -> ReadingSlot {
    if walk_ended_recently(reading_time, walk_events) {
        ReadingSlot::PostWalk
    } else if reading_time.hour() < 14 {
        ReadingSlot::Morning
    } else {
        ReadingSlot::Evening
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DrinkBody, Macros, TimeOfDay};
    use chrono::NaiveDate;

    fn dt(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn prev_day(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 9)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn taken(at: NaiveDateTime) -> Event {
        Event::dose(at, "Metoprolol", "50mg", DoseStatus::Taken, TimeOfDay::Am)
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(60), "1h 0m");
        assert_eq!(format_minutes(135), "2h 15m");
    }

    #[test]
    fn test_medication_context_picks_latest_dose() {
        // Reading at 09:00 with taken doses at 07:00 and 08:30 picks 08:30
        let meds = vec![taken(dt(7, 0)), taken(dt(8, 30))];
        let ctx = medication_context(dt(9, 0), &meds).unwrap();
        assert_eq!(ctx.bucket, MedBucket::PostMeds);
        assert_eq!(ctx.minutes_since, Some(30));
        assert_eq!(ctx.label, "Post-Meds (30m)");
    }

    #[test]
    fn test_medication_context_pre_meds_vs_no_data() {
        // Dose exists later in the day: pre-meds
        let meds = vec![taken(dt(20, 0))];
        let ctx = medication_context(dt(9, 0), &meds).unwrap();
        assert_eq!(ctx.bucket, MedBucket::PreMeds);
        assert_eq!(ctx.minutes_since, None);
        assert_eq!(ctx.label, "Pre-Meds");

        // No doses on this day at all: no data, not pre-meds
        let other_day = vec![taken(prev_day(8, 0))];
        assert!(medication_context(dt(9, 0), &other_day).is_none());
        assert!(medication_context(dt(9, 0), &[]).is_none());
    }

    #[test]
    fn test_medication_context_ignores_skipped() {
        let meds = vec![Event::dose(
            dt(8, 0),
            "Metoprolol",
            "50mg",
            DoseStatus::Skipped,
            TimeOfDay::Am,
        )];
        assert!(medication_context(dt(9, 0), &meds).is_none());
    }

    #[test]
    fn test_walk_context_within_window() {
        // Walk ending 07:50, reading 08:10: Post-Walk (20m)
        let walks = vec![Event::walk(dt(7, 20), dt(7, 50)).unwrap()];
        let ctx = walk_context(dt(8, 10), &walks);
        assert_eq!(ctx.bucket, WalkBucket::PostWalk);
        assert_eq!(ctx.label, "Post-Walk (20m)");

        // Same walk ending 06:00 is 130 minutes prior: Resting
        let walks = vec![Event::walk(dt(5, 30), dt(6, 0)).unwrap()];
        let ctx = walk_context(dt(8, 10), &walks);
        assert_eq!(ctx.bucket, WalkBucket::Resting);
        assert_eq!(ctx.minutes_since, None);
    }

    #[test]
    fn test_walk_context_ignores_open_and_other_day_walks() {
        use crate::event::{EventBody, Interval};
        let open_walk = Event::new(dt(7, 30), EventBody::Walk(Interval::open(dt(7, 30))));
        assert_eq!(walk_context(dt(8, 0), &[open_walk]).bucket, WalkBucket::Resting);

        let yesterday = Event::walk(prev_day(23, 0), prev_day(23, 30)).unwrap();
        assert_eq!(
            walk_context(dt(0, 30), &[yesterday]).bucket,
            WalkBucket::Resting
        );
    }

    #[test]
    fn test_walk_context_first_match_wins() {
        // Two qualifying walks; the first in input order is reported even
        // though the second ended closer to the reading.
        let far = Event::walk(dt(6, 30), dt(7, 0)).unwrap();
        let near = Event::walk(dt(7, 30), dt(8, 0)).unwrap();
        let ctx = walk_context(dt(8, 10), &[far.clone(), near.clone()]);
        assert_eq!(ctx.minutes_since, Some(70));

        let ctx = walk_context(dt(8, 10), &[near, far]);
        assert_eq!(ctx.minutes_since, Some(10));
    }

    #[test]
    fn test_meal_context() {
        let food = Event::new(dt(12, 0), EventBody::Food(Macros::default()));
        let ctx = meal_context(dt(12, 45), &[food]);
        assert_eq!(ctx.bucket, MealBucket::PostMeal);
        assert_eq!(ctx.label, "Post-Meal (45m)");

        // Zero-calorie drink does not count as a meal
        let water = Event::new(dt(12, 0), EventBody::Drink(DrinkBody::default()));
        let ctx = meal_context(dt(12, 45), &[water]);
        assert_eq!(ctx.bucket, MealBucket::Fasting);
        assert_eq!(ctx.label, "Fasting");
    }

    #[test]
    fn test_caffeine_context_none_without_caffeine() {
        let coffee = Event::new(
            dt(7, 15),
            EventBody::Drink(DrinkBody {
                caffeine_mg: 95.0,
                ..Default::default()
            }),
        );
        let ctx = caffeine_context(dt(9, 0), &[coffee]).unwrap();
        assert_eq!(ctx.minutes_since, 105);
        assert_eq!(ctx.label, "Caffeine (1h 45m)");
        assert_eq!(ctx.caffeine_mg, 95.0);

        let water = Event::new(dt(7, 15), EventBody::Drink(DrinkBody::default()));
        assert!(caffeine_context(dt(9, 0), &[water]).is_none());
        assert!(caffeine_context(dt(9, 0), &[]).is_none());
    }

    #[test]
    fn test_reading_slot_partition() {
        assert_eq!(reading_slot(dt(8, 0), &[]), ReadingSlot::Morning);
        assert_eq!(reading_slot(dt(13, 59), &[]), ReadingSlot::Morning);
        assert_eq!(reading_slot(dt(14, 0), &[]), ReadingSlot::Evening);
        assert_eq!(reading_slot(dt(21, 0), &[]), ReadingSlot::Evening);

        // Post-walk precedence over the hour rule
        let walks = vec![Event::walk(dt(18, 0), dt(18, 40)).unwrap()];
        assert_eq!(reading_slot(dt(19, 0), &walks), ReadingSlot::PostWalk);
    }
}
