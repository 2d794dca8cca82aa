//! Per-family period aggregators
//!
//! Each function reduces one metric family's events over a window (week or
//! month, the logic is granularity-agnostic) into a small set of labeled
//! stats, comparing against the immediately preceding sibling window for
//! the badge. Duration aggregates only ever consider closed intervals;
//! an in-progress sleep or walk contributes nothing until it ends.

use crate::context::classifier::{format_minutes, reading_slot, ReadingSlot};
use crate::event::{DoseStatus, Event, EventBody};
use crate::period::badge::comparison_badge;
use crate::period::stats::Stat;
use crate::window::DayRange;

/// Durations of the closed interval events in the slice, in minutes
fn closed_durations(events: &[&Event]) -> Vec<i64> {
    events.iter().filter_map(|e| e.duration_min()).collect()
}

fn sum(values: &[i64]) -> i64 {
    values.iter().sum()
}

fn average(values: &[i64]) -> i64 {
    if values.is_empty() {
        0
    } else {
        ((sum(values) as f64) / (values.len() as f64)).round() as i64
    }
}

/// Adherence percent with an explicit zero guard: 0 doses means 0%, not NaN
pub fn adherence_pct(taken: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        ((taken as f64) / (total as f64) * 100.0).round() as u32
    }
}

/// Arrhythmia family: episode count plus duration aggregates
pub fn arrhythmia_stats(events: &[Event], current: DayRange, previous: DayRange) -> Vec<Stat> {
    let cur = current.filter(events);
    let prev = previous.filter(events);

    let durations = closed_durations(&cur);
    let total = sum(&durations);
    let longest = durations.iter().copied().max().unwrap_or(0);

    vec![
        Stat::new("Episodes", cur.len().to_string()).badge(comparison_badge(
            cur.len() as f64,
            prev.len() as f64,
            true,
        )),
        Stat::new("Total Duration", format_minutes(total)).badge(comparison_badge(
            total as f64,
            sum(&closed_durations(&prev)) as f64,
            true,
        )),
        Stat::new("Avg Duration", format_minutes(average(&durations))),
        Stat::new("Longest", format_minutes(longest)),
    ]
}

fn reading_values(events: &[&Event]) -> (Vec<u16>, Vec<u16>, Vec<u16>) {
    let mut sys = Vec::new();
    let mut dia = Vec::new();
    let mut hr = Vec::new();
    for e in events {
        if let EventBody::Reading(r) = &e.body {
            if let Some(s) = r.systolic {
                sys.push(s);
            }
            if let Some(d) = r.diastolic {
                dia.push(d);
            }
            if let Some(h) = r.heart_rate {
                hr.push(h);
            }
        }
    }
    (sys, dia, hr)
}

fn mean_u16(values: &[u16]) -> i64 {
    if values.is_empty() {
        0
    } else {
        (values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64).round() as i64
    }
}

/// Blood-pressure family: counts, overall averages, and per-slot averages
///
/// Slot grouping uses the coarse morning / post-walk / evening partition,
/// which needs the window's walk events to resolve post-walk precedence.
pub fn bp_stats(
    readings: &[Event],
    walks: &[Event],
    current: DayRange,
    previous: DayRange,
) -> Vec<Stat> {
    let cur = current.filter(readings);
    let prev = previous.filter(readings);

    let (sys, dia, hr) = reading_values(&cur);
    let high_count = cur
        .iter()
        .filter(|e| matches!(&e.body, EventBody::Reading(r) if r.systolic.unwrap_or(0) > 140))
        .count();
    let prev_high = prev
        .iter()
        .filter(|e| matches!(&e.body, EventBody::Reading(r) if r.systolic.unwrap_or(0) > 140))
        .count();

    let mut stats = vec![
        Stat::new("Readings", cur.len().to_string()).badge(comparison_badge(
            cur.len() as f64,
            prev.len() as f64,
            false,
        )),
        Stat::new("Avg BP", format!("{}/{}", mean_u16(&sys), mean_u16(&dia))).unit("mmHg"),
        Stat::new("Avg Heart Rate", mean_u16(&hr).to_string()).unit("bpm"),
        Stat::new("High Readings", high_count.to_string()).badge(comparison_badge(
            high_count as f64,
            prev_high as f64,
            true,
        )),
    ];

    for slot in ReadingSlot::all() {
        let in_slot: Vec<&Event> = cur
            .iter()
            .copied()
            .filter(|e| reading_slot(e.timestamp, walks) == *slot)
            .collect();
        if in_slot.is_empty() {
            continue;
        }
        let (s, d, _) = reading_values(&in_slot);
        stats.push(
            Stat::new(
                format!("{} Avg", capitalize_slot(*slot)),
                format!("{}/{}", mean_u16(&s), mean_u16(&d)),
            )
            .unit("mmHg"),
        );
    }

    stats
}

fn capitalize_slot(slot: ReadingSlot) -> &'static str {
    match slot {
        ReadingSlot::Morning => "Morning",
        ReadingSlot::PostWalk => "Post-Walk",
        ReadingSlot::Evening => "Evening",
    }
}

/// Sleep family: session count and duration aggregates (closed sessions only)
pub fn sleep_stats(events: &[Event], current: DayRange, previous: DayRange) -> Vec<Stat> {
    let cur = current.filter(events);
    let prev = previous.filter(events);

    let durations = closed_durations(&cur);
    let prev_durations = closed_durations(&prev);
    let total = sum(&durations);
    let avg = average(&durations);

    vec![
        Stat::new("Sessions", durations.len().to_string()).badge(comparison_badge(
            durations.len() as f64,
            prev_durations.len() as f64,
            false,
        )),
        Stat::new("Total Sleep", format!("{:.1}", total as f64 / 60.0)).unit("h"),
        Stat::new("Avg Duration", format_minutes(avg)).badge(comparison_badge(
            avg as f64,
            average(&prev_durations) as f64,
            false,
        )),
        Stat::new(
            "Longest",
            format_minutes(durations.iter().copied().max().unwrap_or(0)),
        ),
        Stat::new(
            "Shortest",
            format_minutes(durations.iter().copied().min().unwrap_or(0)),
        ),
    ]
}

/// Activity family: walks and steps
pub fn activity_stats(
    walks: &[Event],
    steps: &[Event],
    current: DayRange,
    previous: DayRange,
) -> Vec<Stat> {
    let cur_walks = current.filter(walks);
    let prev_walks = previous.filter(walks);
    let durations = closed_durations(&cur_walks);
    let total_min = sum(&durations);

    let step_total = |events: &[&Event]| -> u64 {
        events
            .iter()
            .filter_map(|e| match &e.body {
                EventBody::Steps { count } => Some(*count as u64),
                _ => None,
            })
            .sum()
    };
    let cur_steps = step_total(&current.filter(steps));
    let prev_steps = step_total(&previous.filter(steps));

    vec![
        Stat::new("Walks", cur_walks.len().to_string()).badge(comparison_badge(
            cur_walks.len() as f64,
            prev_walks.len() as f64,
            false,
        )),
        Stat::new("Walk Time", format_minutes(total_min)).badge(comparison_badge(
            total_min as f64,
            sum(&closed_durations(&prev_walks)) as f64,
            false,
        )),
        Stat::new("Avg Walk", format_minutes(average(&durations))),
        Stat::new("Steps", cur_steps.to_string()).badge(comparison_badge(
            cur_steps as f64,
            prev_steps as f64,
            false,
        )),
    ]
}

fn nutrition_totals(events: &[&Event]) -> (f64, f64, f64, f64, f64) {
    let mut calories = 0.0;
    let mut protein = 0.0;
    let mut caffeine = 0.0;
    let mut alcohol = 0.0;
    let mut fluid = 0.0;
    for e in events {
        match &e.body {
            EventBody::Food(m) => {
                calories += m.calories;
                protein += m.protein_g;
            }
            EventBody::Drink(d) => {
                calories += d.macros.calories;
                protein += d.macros.protein_g;
                caffeine += d.caffeine_mg;
                alcohol += d.alcohol_units;
                fluid += d.volume_ml;
            }
            _ => {}
        }
    }
    (calories, protein, caffeine, alcohol, fluid)
}

/// Nutrition family: intake totals and daily averages
///
/// `protein_target_g` comes from the protein-per-kg setting applied to the
/// most recent weight; the percent-of-target stat only appears when both
/// are known. The alcohol row only appears when the user tracks alcohol.
pub fn nutrition_stats(
    events: &[Event],
    current: DayRange,
    previous: DayRange,
    protein_target_g: Option<f64>,
    include_alcohol: bool,
) -> Vec<Stat> {
    let cur = current.filter(events);
    let prev = previous.filter(events);
    let (calories, protein, caffeine, alcohol, fluid) = nutrition_totals(&cur);
    let (p_calories, _, p_caffeine, p_alcohol, _) = nutrition_totals(&prev);
    let days = current.day_count() as f64;

    let mut stats = vec![
        Stat::new("Calories / Day", format!("{:.0}", calories / days)).badge(comparison_badge(
            calories,
            p_calories,
            true,
        )),
        Stat::new("Protein / Day", format!("{:.0}", protein / days)).unit("g"),
        Stat::new("Caffeine / Day", format!("{:.0}", caffeine / days))
            .unit("mg")
            .badge(comparison_badge(caffeine, p_caffeine, true)),
        Stat::new("Fluids / Day", format!("{:.0}", fluid / days)).unit("ml"),
    ];

    if let Some(target) = protein_target_g {
        if target > 0.0 {
            let daily = protein / days;
            stats.push(
                Stat::new("Protein Target", format!("{:.0}%", daily / target * 100.0)),
            );
        }
    }

    if include_alcohol {
        stats.push(
            Stat::new("Alcohol", format!("{:.1}", alcohol))
                .unit("units")
                .badge(comparison_badge(alcohol, p_alcohol, true)),
        );
    }

    stats
}

/// Medication family: dose counts and adherence
pub fn medication_stats(events: &[Event], current: DayRange, previous: DayRange) -> Vec<Stat> {
    let dose_counts = |events: &[&Event]| -> (usize, usize) {
        let mut taken = 0;
        let mut skipped = 0;
        for e in events {
            if let EventBody::Medication(m) = &e.body {
                match m.status {
                    DoseStatus::Taken => taken += 1,
                    DoseStatus::Skipped => skipped += 1,
                }
            }
        }
        (taken, skipped)
    };

    let (taken, skipped) = dose_counts(&current.filter(events));
    let (p_taken, p_skipped) = dose_counts(&previous.filter(events));
    let adherence = adherence_pct(taken, taken + skipped);
    let prev_adherence = adherence_pct(p_taken, p_taken + p_skipped);

    vec![
        Stat::new("Doses Taken", taken.to_string()).badge(comparison_badge(
            taken as f64,
            p_taken as f64,
            false,
        )),
        Stat::new("Doses Skipped", skipped.to_string()).badge(comparison_badge(
            skipped as f64,
            p_skipped as f64,
            true,
        )),
        Stat::new("Adherence", format!("{}%", adherence)).badge(comparison_badge(
            adherence as f64,
            prev_adherence as f64,
            false,
        )),
    ]
}

/// Inhaler family: rescue uses
pub fn inhaler_stats(events: &[Event], current: DayRange, previous: DayRange) -> Vec<Stat> {
    let cur = current.filter(events).len();
    let prev = previous.filter(events).len();

    vec![Stat::new("Uses", cur.to_string()).badge(comparison_badge(
        cur as f64,
        prev as f64,
        true,
    ))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DrinkBody, Interval, Macros, TimeOfDay};
    use crate::window::week_range;
    use chrono::{NaiveDate, NaiveDateTime};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn dt(day: u32, h: u32, m: u32) -> NaiveDateTime {
        d(day).and_hms_opt(h, m, 0).unwrap()
    }

    fn ranges() -> (DayRange, DayRange) {
        let today = d(14);
        (week_range(today, 0), week_range(today, 1))
    }

    #[test]
    fn test_arrhythmia_stats_counts_and_durations() {
        let (current, previous) = ranges();
        let events = vec![
            Event::episode(dt(9, 10, 0), dt(9, 10, 45)).unwrap(),
            Event::episode(dt(12, 22, 0), dt(12, 23, 30)).unwrap(),
            // Previous week
            Event::episode(dt(3, 8, 0), dt(3, 8, 20)).unwrap(),
        ];

        let stats = arrhythmia_stats(&events, current, previous);
        assert_eq!(stats[0].label, "Episodes");
        assert_eq!(stats[0].value, "2");
        // 2 vs 1 episode, lower is better: +100% bad
        let badge = stats[0].badge.as_ref().unwrap();
        assert_eq!(badge.text, "+100%");

        assert_eq!(stats[1].label, "Total Duration");
        assert_eq!(stats[1].value, "2h 15m");
        assert_eq!(stats[2].value, "1h 8m"); // 135 / 2 rounds to 68
        assert_eq!(stats[3].value, "1h 30m");
    }

    #[test]
    fn test_arrhythmia_open_episode_excluded_from_durations() {
        let (current, previous) = ranges();
        let mut open = Event::episode(dt(10, 9, 0), dt(10, 9, 1)).unwrap();
        if let EventBody::Arrhythmia(a) = &mut open.body {
            a.interval = Interval::open(dt(10, 9, 0));
        }
        let stats = arrhythmia_stats(&[open], current, previous);
        // Counted as an episode, contributes no duration
        assert_eq!(stats[0].value, "1");
        assert_eq!(stats[1].value, "0m");
    }

    #[test]
    fn test_empty_family_yields_zero_values_no_count_badge() {
        let (current, previous) = ranges();
        let stats = sleep_stats(&[], current, previous);
        assert_eq!(stats[0].value, "0");
        assert!(stats[0].badge.is_none());
        assert_eq!(stats[1].value, "0.0");
        assert_eq!(stats[3].value, "0m");
    }

    #[test]
    fn test_bp_stats_slot_grouping() {
        let (current, previous) = ranges();
        let readings = vec![
            Event::reading(dt(10, 8, 0), Some(130), Some(84), Some(70)).unwrap(),
            Event::reading(dt(10, 20, 0), Some(120), Some(78), Some(64)).unwrap(),
            Event::reading(dt(11, 9, 0), Some(150), Some(92), None).unwrap(),
        ];
        // Walk ending shortly before the 09:00 reading on the 11th
        let walks = vec![Event::walk(dt(11, 8, 0), dt(11, 8, 40)).unwrap()];

        let stats = bp_stats(&readings, &walks, current, previous);
        assert_eq!(stats[0].value, "3");
        assert_eq!(stats[1].value, "133/85");
        assert_eq!(stats[2].value, "67");
        assert_eq!(stats[3].label, "High Readings");
        assert_eq!(stats[3].value, "1");

        let labels: Vec<&str> = stats.iter().map(|s| s.label.as_str()).collect();
        assert!(labels.contains(&"Morning Avg"));
        assert!(labels.contains(&"Post-Walk Avg"));
        assert!(labels.contains(&"Evening Avg"));

        let post_walk = stats.iter().find(|s| s.label == "Post-Walk Avg").unwrap();
        assert_eq!(post_walk.value, "150/92");
    }

    #[test]
    fn test_medication_adherence_zero_total() {
        let (current, previous) = ranges();
        let stats = medication_stats(&[], current, previous);
        let adherence = stats.iter().find(|s| s.label == "Adherence").unwrap();
        assert_eq!(adherence.value, "0%");
        assert!(adherence.badge.is_none());
    }

    #[test]
    fn test_medication_adherence_rounding() {
        assert_eq!(adherence_pct(2, 3), 67);
        assert_eq!(adherence_pct(0, 0), 0);
        assert_eq!(adherence_pct(5, 5), 100);
    }

    #[test]
    fn test_medication_stats() {
        let (current, previous) = ranges();
        let events = vec![
            Event::dose(dt(10, 8, 0), "Metoprolol", "50mg", DoseStatus::Taken, TimeOfDay::Am),
            Event::dose(dt(10, 20, 0), "Metoprolol", "50mg", DoseStatus::Taken, TimeOfDay::Pm),
            Event::dose(dt(11, 8, 0), "Metoprolol", "50mg", DoseStatus::Skipped, TimeOfDay::Am),
            // Previous week, all taken
            Event::dose(dt(5, 8, 0), "Metoprolol", "50mg", DoseStatus::Taken, TimeOfDay::Am),
        ];
        let stats = medication_stats(&events, current, previous);
        assert_eq!(stats[0].value, "2");
        assert_eq!(stats[1].value, "1");
        assert_eq!(stats[2].value, "67%");
    }

    #[test]
    fn test_nutrition_stats_alcohol_gated() {
        let (current, previous) = ranges();
        let events = vec![
            Event::new(dt(10, 12, 0), EventBody::Food(Macros {
                calories: 700.0,
                protein_g: 40.0,
                ..Default::default()
            })),
            Event::new(dt(10, 18, 0), EventBody::Drink(DrinkBody {
                macros: Macros { calories: 150.0, ..Default::default() },
                volume_ml: 330.0,
                caffeine_mg: 0.0,
                alcohol_units: 1.5,
            })),
        ];

        let with = nutrition_stats(&events, current, previous, None, true);
        assert!(with.iter().any(|s| s.label == "Alcohol"));

        let without = nutrition_stats(&events, current, previous, None, false);
        assert!(!without.iter().any(|s| s.label == "Alcohol"));
        assert!(!without.iter().any(|s| s.label == "Protein Target"));

        // 70 g/day target: 40 g over 7 days is about 8%
        let with_target = nutrition_stats(&events, current, previous, Some(70.0), false);
        let target = with_target.iter().find(|s| s.label == "Protein Target").unwrap();
        assert_eq!(target.value, "8%");
    }

    #[test]
    fn test_activity_and_inhaler_stats() {
        let (current, previous) = ranges();
        let walks = vec![
            Event::walk(dt(10, 7, 0), dt(10, 7, 30)).unwrap(),
            Event::walk(dt(12, 7, 0), dt(12, 7, 50)).unwrap(),
        ];
        let steps = vec![Event::new(dt(10, 21, 0), EventBody::Steps { count: 8000 })];

        let stats = activity_stats(&walks, &steps, current, previous);
        assert_eq!(stats[0].value, "2");
        assert_eq!(stats[1].value, "1h 20m");
        assert_eq!(stats[2].value, "40m");
        assert_eq!(stats[3].value, "8000");

        let inhaler = vec![Event::new(dt(11, 15, 0), EventBody::Inhaler)];
        let stats = inhaler_stats(&inhaler, current, previous);
        assert_eq!(stats[0].value, "1");
        assert_eq!(stats[0].badge.as_ref().unwrap().text, "New");
    }
}
