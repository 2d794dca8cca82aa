//! Day-level comparison table
//!
//! For each daily metric, the mean value over episode days vs non-episode
//! days, side by side. Reuses the trigger engine's day partition but a
//! different averaging strategy: one value per day, then the mean of those
//! day values, skipping days with no data for that metric (not skipping
//! the day entirely).

use crate::event::{DoseStatus, Event, EventBody};
use crate::period::families::adherence_pct;
use crate::triggers::engine::{partition_horizon, TriggerInputs};
use chrono::NaiveDate;
use serde::Serialize;

/// One row of the comparison table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayComparison {
    pub metric: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Mean of per-day values over episode days; `None` if no day had data
    pub episode_day_mean: Option<f64>,
    /// Mean of per-day values over non-episode days
    pub non_episode_day_mean: Option<f64>,
}

/// A single day's value for one metric, `None` when the day has no data
type DayMetric<'a> = dyn Fn(NaiveDate) -> Option<f64> + 'a;

fn mean_over_days(days: impl Iterator<Item = NaiveDate>, metric: &DayMetric) -> Option<f64> {
    let values: Vec<f64> = days.filter_map(metric).collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn on_day<'a>(events: &'a [Event], day: NaiveDate) -> impl Iterator<Item = &'a Event> {
    events.iter().filter(move |e| e.local_date() == day)
}

/// Build the episode-day vs non-episode-day comparison table
pub fn day_comparison(inputs: &TriggerInputs, today: NaiveDate) -> Vec<DayComparison> {
    let partition = partition_horizon(inputs.arrhythmias, today);
    let episode_days: Vec<NaiveDate> = partition.episode_days.iter().copied().collect();
    let non_episode_days = partition.non_episode_days.clone();

    let caffeine = |day: NaiveDate| -> Option<f64> {
        let drinks: Vec<&Event> = on_day(inputs.nutrition, day)
            .filter(|e| matches!(&e.body, EventBody::Drink(_)))
            .collect();
        if drinks.is_empty() {
            None
        } else {
            Some(drinks.iter().map(|e| e.caffeine_mg()).sum())
        }
    };

    let sleep_hours = |day: NaiveDate| -> Option<f64> {
        let minutes: Vec<i64> = inputs
            .sleeps
            .iter()
            .filter_map(|e| {
                let interval = e.interval()?;
                if interval.end?.date() != day {
                    return None;
                }
                interval.duration_min()
            })
            .collect();
        if minutes.is_empty() {
            None
        } else {
            Some(minutes.iter().sum::<i64>() as f64 / 60.0)
        }
    };

    let adherence = |day: NaiveDate| -> Option<f64> {
        let mut taken = 0;
        let mut total = 0;
        for e in on_day(inputs.medications, day) {
            if let EventBody::Medication(m) = &e.body {
                total += 1;
                if m.status == DoseStatus::Taken {
                    taken += 1;
                }
            }
        }
        if total == 0 {
            None
        } else {
            Some(adherence_pct(taken, total) as f64)
        }
    };

    let systolic = |day: NaiveDate| -> Option<f64> {
        let values: Vec<f64> = on_day(inputs.readings, day)
            .filter_map(|e| match &e.body {
                EventBody::Reading(r) => r.systolic.map(f64::from),
                _ => None,
            })
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    };

    let diastolic = |day: NaiveDate| -> Option<f64> {
        let values: Vec<f64> = on_day(inputs.readings, day)
            .filter_map(|e| match &e.body {
                EventBody::Reading(r) => r.diastolic.map(f64::from),
                _ => None,
            })
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    };

    let fluid = |day: NaiveDate| -> Option<f64> {
        let drinks: Vec<&Event> = on_day(inputs.nutrition, day)
            .filter(|e| matches!(&e.body, EventBody::Drink(_)))
            .collect();
        if drinks.is_empty() {
            None
        } else {
            Some(drinks.iter().map(|e| e.volume_ml()).sum())
        }
    };

    let walk_minutes = |day: NaiveDate| -> Option<f64> {
        let minutes: Vec<i64> = on_day(inputs.walks, day)
            .filter_map(Event::duration_min)
            .collect();
        if minutes.is_empty() {
            None
        } else {
            Some(minutes.iter().sum::<i64>() as f64)
        }
    };

    let stress = |day: NaiveDate| -> Option<f64> {
        let levels: Vec<f64> = on_day(inputs.stress_logs, day)
            .filter_map(|e| match &e.body {
                EventBody::Stress { level } => Some(*level as f64),
                _ => None,
            })
            .collect();
        if levels.is_empty() {
            None
        } else {
            Some(levels.iter().sum::<f64>() / levels.len() as f64)
        }
    };

    let alcohol = |day: NaiveDate| -> Option<f64> {
        let drinks: Vec<&Event> = on_day(inputs.nutrition, day)
            .filter(|e| matches!(&e.body, EventBody::Drink(_)))
            .collect();
        if drinks.is_empty() {
            None
        } else {
            Some(drinks.iter().map(|e| e.alcohol_units()).sum())
        }
    };

    let rows: Vec<(&str, Option<&str>, &DayMetric)> = vec![
        ("Caffeine", Some("mg"), &caffeine),
        ("Sleep", Some("h"), &sleep_hours),
        ("Med Adherence", Some("%"), &adherence),
        ("Systolic", Some("mmHg"), &systolic),
        ("Diastolic", Some("mmHg"), &diastolic),
        ("Fluids", Some("ml"), &fluid),
        ("Walk Time", Some("min"), &walk_minutes),
        ("Stress", None, &stress),
        ("Alcohol", Some("units"), &alcohol),
    ];

    rows.into_iter()
        .map(|(metric, unit, f)| DayComparison {
            metric: metric.to_string(),
            unit: unit.map(str::to_string),
            episode_day_mean: mean_over_days(episode_days.iter().copied(), f),
            non_episode_day_mean: mean_over_days(non_episode_days.iter().copied(), f),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DrinkBody, MedicationDefinition, Schedule, TimeOfDay};
    use chrono::NaiveDateTime;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn dt(day: u32, h: u32, m: u32) -> NaiveDateTime {
        d(day).and_hms_opt(h, m, 0).unwrap()
    }

    fn coffee(day: u32, h: u32, mg: f64) -> Event {
        Event::new(
            dt(day, h, 0),
            EventBody::Drink(DrinkBody {
                caffeine_mg: mg,
                volume_ml: 250.0,
                ..Default::default()
            }),
        )
    }

    #[test]
    fn test_day_comparison_skips_missing_days_per_metric() {
        let episodes = vec![
            Event::episode(dt(10, 9, 0), dt(10, 9, 30)).unwrap(),
            Event::episode(dt(12, 9, 0), dt(12, 9, 30)).unwrap(),
        ];
        // Caffeine on one episode day (200mg) and two non-episode days
        let nutrition = vec![coffee(10, 8, 200.0), coffee(11, 8, 100.0), coffee(13, 8, 50.0)];
        let definitions: Vec<MedicationDefinition> = Vec::new();
        let inputs = TriggerInputs {
            arrhythmias: &episodes,
            medications: &[],
            nutrition: &nutrition,
            sleeps: &[],
            readings: &[],
            walks: &[],
            stress_logs: &[],
            definitions: &definitions,
            drinks_alcohol: true,
        };

        let table = day_comparison(&inputs, d(20));
        let caffeine = table.iter().find(|r| r.metric == "Caffeine").unwrap();
        // Day 12 had no drinks: skipped, not counted as zero
        assert_eq!(caffeine.episode_day_mean, Some(200.0));
        // Non-episode days with data: 100 and 50
        assert_eq!(caffeine.non_episode_day_mean, Some(75.0));

        // Sleep has no data anywhere
        let sleep = table.iter().find(|r| r.metric == "Sleep").unwrap();
        assert_eq!(sleep.episode_day_mean, None);
        assert_eq!(sleep.non_episode_day_mean, None);
    }

    #[test]
    fn test_day_comparison_adherence_and_stress() {
        let episodes = vec![Event::episode(dt(10, 9, 0), dt(10, 9, 30)).unwrap()];
        let medications = vec![
            Event::dose(dt(10, 8, 0), "Flecainide", "100mg", DoseStatus::Taken, TimeOfDay::Am),
            Event::dose(dt(10, 20, 0), "Flecainide", "100mg", DoseStatus::Skipped, TimeOfDay::Pm),
            Event::dose(dt(11, 8, 0), "Flecainide", "100mg", DoseStatus::Taken, TimeOfDay::Am),
        ];
        let stress_logs = vec![
            Event::stress(dt(10, 12, 0), 4).unwrap(),
            Event::stress(dt(10, 18, 0), 5).unwrap(),
        ];
        let definitions = vec![MedicationDefinition {
            name: "Flecainide".to_string(),
            dosage: "100mg".to_string(),
            schedule: Schedule::Both,
            afib_relevant: true,
        }];
        let inputs = TriggerInputs {
            arrhythmias: &episodes,
            medications: &medications,
            nutrition: &[],
            sleeps: &[],
            readings: &[],
            walks: &[],
            stress_logs: &stress_logs,
            definitions: &definitions,
            drinks_alcohol: false,
        };

        let table = day_comparison(&inputs, d(20));
        let adherence = table.iter().find(|r| r.metric == "Med Adherence").unwrap();
        assert_eq!(adherence.episode_day_mean, Some(50.0));
        assert_eq!(adherence.non_episode_day_mean, Some(100.0));

        let stress = table.iter().find(|r| r.metric == "Stress").unwrap();
        assert_eq!(stress.episode_day_mean, Some(4.5));
        assert_eq!(stress.non_episode_day_mean, None);
    }
}
