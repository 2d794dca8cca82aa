//! Trigger Correlation Engine
//!
//! Over a trailing 90-day horizon, partitions calendar days into episode
//! days and non-episode days, then counts how many episodes (never days)
//! were preceded by each antecedent condition in its factor-specific
//! lookback window. Output is a ranked list of co-occurrence percentages;
//! no significance testing, no causal claims.

use crate::event::{
    find_definition, DoseStatus, Event, EventBody, EventKind, MedicationDefinition,
};
use crate::triggers::factors::{
    electrolyte_pattern, FactorKind, TriggerFactor, ACUTE_CAFFEINE_MG, ELEVATED_SYSTOLIC,
    HIGH_STRESS_LEVEL, LARGE_MEAL_KCAL, LOW_FLUID_ML, ONSET_TAG_PREVALENCE, POOR_SLEEP_MIN,
};
use crate::window::DayRange;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, BTreeSet};

/// Length of the trailing horizon in calendar days
pub const HORIZON_DAYS: i64 = 90;

/// Everything the engine consumes, pulled up front into immutable slices
#[derive(Debug, Clone, Copy)]
pub struct TriggerInputs<'a> {
    pub arrhythmias: &'a [Event],
    pub medications: &'a [Event],
    /// Food and drink events together
    pub nutrition: &'a [Event],
    pub sleeps: &'a [Event],
    pub readings: &'a [Event],
    pub walks: &'a [Event],
    pub stress_logs: &'a [Event],
    pub definitions: &'a [MedicationDefinition],
    /// Gates the alcohol factor; users who don't track it get no row
    pub drinks_alcohol: bool,
}

/// The horizon's day partition and its episode list
#[derive(Debug, Clone)]
pub struct HorizonPartition<'a> {
    pub horizon: DayRange,
    /// Closed episodes whose start falls in the horizon, oldest first
    pub episodes: Vec<&'a Event>,
    /// Local dates on which at least one episode started
    pub episode_days: BTreeSet<NaiveDate>,
    /// Every other date in the horizon, from a complete day walk
    pub non_episode_days: Vec<NaiveDate>,
}

/// Build the 90-day partition from the arrhythmia stream
pub fn partition_horizon<'a>(arrhythmias: &'a [Event], today: NaiveDate) -> HorizonPartition<'a> {
    let horizon = DayRange::spanning(today - Duration::days(HORIZON_DAYS - 1), today);

    let mut episodes: Vec<&Event> = arrhythmias
        .iter()
        .filter(|e| {
            matches!(&e.body, EventBody::Arrhythmia(a) if a.interval.is_closed())
                && horizon.contains(e.timestamp)
        })
        .collect();
    episodes.sort_by_key(|e| e.timestamp);

    let episode_days: BTreeSet<NaiveDate> = episodes.iter().map(|e| e.local_date()).collect();
    let non_episode_days: Vec<NaiveDate> = horizon
        .days()
        .filter(|d| !episode_days.contains(d))
        .collect();

    HorizonPartition {
        horizon,
        episodes,
        episode_days,
        non_episode_days,
    }
}

/// Per-day caffeine totals across the horizon
pub(crate) fn caffeine_by_day(nutrition: &[Event], horizon: DayRange) -> BTreeMap<NaiveDate, f64> {
    let mut totals = BTreeMap::new();
    for e in nutrition {
        if horizon.contains(e.timestamp) && e.caffeine_mg() > 0.0 {
            *totals.entry(e.local_date()).or_insert(0.0) += e.caffeine_mg();
        }
    }
    totals
}

/// Skipped doses logged on the episode's day or the day before
fn skipped_doses<'a>(
    medications: &'a [Event],
    day: NaiveDate,
) -> impl Iterator<Item = &'a crate::event::MedicationBody> {
    let day_before = day - Duration::days(1);
    medications.iter().filter_map(move |e| match &e.body {
        EventBody::Medication(m)
            if m.status == DoseStatus::Skipped
                && (e.local_date() == day || e.local_date() == day_before) =>
        {
            Some(m)
        }
        _ => None,
    })
}

/// Events inside the rolling window ending at (and excluding) `until`
fn in_lookback<'a>(
    events: &'a [Event],
    until: NaiveDateTime,
    lookback: Duration,
) -> impl Iterator<Item = &'a Event> {
    let from = until - lookback;
    events
        .iter()
        .filter(move |e| e.timestamp >= from && e.timestamp < until)
}

/// Whether the nearest sleep waking on the episode's day was short
fn poor_sleep(sleeps: &[Event], start: NaiveDateTime) -> bool {
    let day = start.date();
    sleeps
        .iter()
        .filter_map(|e| {
            let interval = e.interval()?;
            let end = interval.end?;
            if end.date() != day {
                return None;
            }
            Some((interval.duration_min()?, (start - end).num_milliseconds().abs()))
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(duration, _)| duration < POOR_SLEEP_MIN)
        .unwrap_or(false)
}

/// Compute the ranked trigger list for the trailing 90-day horizon
///
/// Episodes, never days, are the counting unit; the denominator is the
/// number of closed episodes starting in the horizon. Returns an empty
/// list when that denominator is zero: the caller must read that as
/// "insufficient data", not "no triggers". Factors with zero occurrences
/// are omitted. Output ordering is deterministic: percent descending,
/// catalog order on ties.
pub fn trigger_report(inputs: &TriggerInputs, today: NaiveDate) -> Vec<TriggerFactor> {
    let partition = partition_horizon(inputs.arrhythmias, today);
    let total = partition.episodes.len();
    if total == 0 {
        tracing::debug!("trigger report skipped: no closed episodes in horizon");
        return Vec::new();
    }

    // Baseline for the above-average-caffeine rule: mean per-day caffeine
    // over the non-episode days, computed once and reused. Days with no
    // caffeine logged count as zero.
    let caffeine_days = caffeine_by_day(inputs.nutrition, partition.horizon);
    let baseline = if partition.non_episode_days.is_empty() {
        0.0
    } else {
        partition
            .non_episode_days
            .iter()
            .map(|d| caffeine_days.get(d).copied().unwrap_or(0.0))
            .sum::<f64>()
            / partition.non_episode_days.len() as f64
    };

    let mut missed_afib = 0usize;
    let mut missed_any = 0usize;
    let mut above_avg_caffeine = 0usize;
    let mut short_sleep = 0usize;
    let mut elevated_bp = 0usize;
    let mut low_fluid = 0usize;
    let mut large_meal = 0usize;
    let mut recent_exercise = 0usize;
    let mut acute_caffeine = 0usize;
    let mut high_stress = 0usize;
    let mut alcohol_prior = 0usize;
    let mut missed_electrolyte = 0usize;
    let mut tag_counts: BTreeMap<String, usize> = BTreeMap::new();

    for episode in &partition.episodes {
        let start = episode.timestamp;
        let day = start.date();

        let afib_skip = skipped_doses(inputs.medications, day).any(|m| {
            find_definition(inputs.definitions, &m.med_name)
                .map(|d| d.afib_relevant)
                .unwrap_or(false)
        });
        if afib_skip {
            missed_afib += 1;
        } else if skipped_doses(inputs.medications, day).next().is_some() {
            // The generic factor is suppressed when the AFib-specific one fired
            missed_any += 1;
        }

        if skipped_doses(inputs.medications, day)
            .any(|m| electrolyte_pattern().is_match(&m.med_name))
        {
            missed_electrolyte += 1;
        }

        if caffeine_days.get(&day).copied().unwrap_or(0.0) > baseline {
            above_avg_caffeine += 1;
        }

        if poor_sleep(inputs.sleeps, start) {
            short_sleep += 1;
        }

        if inputs.readings.iter().any(|e| {
            e.local_date() == day
                && matches!(&e.body, EventBody::Reading(r) if r.systolic.unwrap_or(0) > ELEVATED_SYSTOLIC)
        }) {
            elevated_bp += 1;
        }

        let fluid: f64 = in_lookback(inputs.nutrition, start, Duration::hours(24))
            .map(Event::volume_ml)
            .sum();
        if fluid > 0.0 && fluid < LOW_FLUID_ML {
            low_fluid += 1;
        }

        let meal_calories: f64 = in_lookback(inputs.nutrition, start, Duration::hours(4))
            .filter(|e| e.kind() == EventKind::Food)
            .map(Event::calories)
            .sum();
        if meal_calories > LARGE_MEAL_KCAL {
            large_meal += 1;
        }

        let exercise_window_start = start - Duration::hours(3);
        if inputs.walks.iter().any(|e| {
            e.interval()
                .and_then(|i| i.end)
                .map(|end| end > exercise_window_start && end < start)
                .unwrap_or(false)
        }) {
            recent_exercise += 1;
        }

        if in_lookback(inputs.nutrition, start, Duration::hours(1))
            .any(|e| e.caffeine_mg() >= ACUTE_CAFFEINE_MG)
        {
            acute_caffeine += 1;
        }

        if inputs.stress_logs.iter().any(|e| {
            e.local_date() == day
                && matches!(&e.body, EventBody::Stress { level } if *level >= HIGH_STRESS_LEVEL)
        }) {
            high_stress += 1;
        }

        if inputs.drinks_alcohol {
            let units: f64 = in_lookback(inputs.nutrition, start, Duration::hours(24))
                .map(Event::alcohol_units)
                .sum();
            if units > 0.0 {
                alcohol_prior += 1;
            }
        }

        if let EventBody::Arrhythmia(a) = &episode.body {
            for tag in &a.onset_context {
                *tag_counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
    }

    let mut rows = Vec::new();
    let catalog = [
        (FactorKind::MissedAfibMedication, missed_afib),
        (FactorKind::MissedAnyMedication, missed_any),
        (FactorKind::AboveAverageCaffeine, above_avg_caffeine),
        (FactorKind::PoorSleep, short_sleep),
        (FactorKind::ElevatedBp, elevated_bp),
        (FactorKind::LowFluid, low_fluid),
        (FactorKind::LargeMeal, large_meal),
        (FactorKind::RecentExercise, recent_exercise),
        (FactorKind::AcuteCaffeine, acute_caffeine),
        (FactorKind::HighStress, high_stress),
        (FactorKind::AlcoholPrior, alcohol_prior),
        (FactorKind::MissedElectrolyte, missed_electrolyte),
    ];
    for (kind, count) in catalog {
        if count > 0 {
            rows.push(TriggerFactor::from_count(kind, count, total));
        }
    }

    for (tag, count) in tag_counts {
        if (count as f64) / (total as f64) >= ONSET_TAG_PREVALENCE {
            rows.push(TriggerFactor::from_count(
                FactorKind::OnsetTag { tag },
                count,
                total,
            ));
        }
    }

    // Stable sort: catalog order is preserved among equal percentages
    rows.sort_by(|a, b| b.percent.cmp(&a.percent));

    tracing::debug!(
        episodes = total,
        factors = rows.len(),
        caffeine_baseline = baseline,
        "trigger report computed"
    );
    rows
}
