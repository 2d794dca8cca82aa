//! Analysis facade
//!
//! One immutable snapshot per computation: everything is pulled from the
//! event store up front, then every view is a pure function of the
//! snapshot plus explicit navigation offsets. There is no shared offset
//! state and no I/O past construction, so re-running any view on the same
//! snapshot is bit-identical, and store mutations after the pull simply
//! produce a stale (never inconsistent) result until the caller reloads.

use crate::config::Settings;
use crate::event::{Event, EventKind, EventStore, MedicationDefinition};
use crate::narrative::{episode_cards, EpisodeCard};
use crate::period::{
    activity_stats, arrhythmia_stats, bp_stats, inhaler_stats, medication_stats, nutrition_stats,
    sleep_stats, weight_stats, weight_summary, Stat,
};
use crate::triggers::{day_comparison, trigger_report, DayComparison, TriggerFactor, TriggerInputs};
use crate::window::{month_range, week_range, DayRange};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Cap on events pulled per stream when building a snapshot
const FETCH_LIMIT: usize = 10_000;

/// Metric families the period views are grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricFamily {
    Arrhythmia,
    BloodPressure,
    Sleep,
    Activity,
    Nutrition,
    Medication,
    Inhaler,
}

/// An immutable snapshot of the journal plus the pure views over it
#[derive(Debug, Clone)]
pub struct Analysis {
    now: NaiveDateTime,
    settings: Settings,
    definitions: Vec<MedicationDefinition>,
    arrhythmias: Vec<Event>,
    readings: Vec<Event>,
    sleeps: Vec<Event>,
    walks: Vec<Event>,
    steps: Vec<Event>,
    weights: Vec<Event>,
    nutrition: Vec<Event>,
    medications: Vec<Event>,
    inhaler_uses: Vec<Event>,
    stress_logs: Vec<Event>,
    symptoms: Vec<Event>,
}

impl Analysis {
    /// Pull all streams from the store into a snapshot
    ///
    /// `now` is the reference instant for every view; it is injected
    /// rather than read from the wall clock so results are reproducible.
    pub fn load(
        store: &dyn EventStore,
        definitions: Vec<MedicationDefinition>,
        settings: Settings,
        now: NaiveDateTime,
    ) -> Self {
        let snapshot = Self {
            now,
            settings,
            definitions,
            arrhythmias: store.fetch_by_kind(EventKind::Arrhythmia, FETCH_LIMIT),
            readings: store.fetch_by_kind(EventKind::Reading, FETCH_LIMIT),
            sleeps: store.fetch_by_kind(EventKind::Sleep, FETCH_LIMIT),
            walks: store.fetch_by_kind(EventKind::Walk, FETCH_LIMIT),
            steps: store.fetch_by_kind(EventKind::Steps, FETCH_LIMIT),
            weights: store.fetch_by_kind(EventKind::Weight, FETCH_LIMIT),
            nutrition: store.fetch_kinds(&[EventKind::Food, EventKind::Drink], FETCH_LIMIT),
            medications: store.fetch_by_kind(EventKind::Medication, FETCH_LIMIT),
            inhaler_uses: store.fetch_by_kind(EventKind::Inhaler, FETCH_LIMIT),
            stress_logs: store.fetch_by_kind(EventKind::Stress, FETCH_LIMIT),
            symptoms: store.fetch_by_kind(EventKind::Symptom, FETCH_LIMIT),
        };
        tracing::debug!(
            arrhythmias = snapshot.arrhythmias.len(),
            readings = snapshot.readings.len(),
            nutrition = snapshot.nutrition.len(),
            "analysis snapshot loaded"
        );
        snapshot
    }

    /// The snapshot's reference instant
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    fn stats_for(&self, family: MetricFamily, current: DayRange, previous: DayRange) -> Vec<Stat> {
        match family {
            MetricFamily::Arrhythmia => arrhythmia_stats(&self.arrhythmias, current, previous),
            MetricFamily::BloodPressure => {
                bp_stats(&self.readings, &self.walks, current, previous)
            }
            MetricFamily::Sleep => sleep_stats(&self.sleeps, current, previous),
            MetricFamily::Activity => {
                activity_stats(&self.walks, &self.steps, current, previous)
            }
            MetricFamily::Nutrition => nutrition_stats(
                &self.nutrition,
                current,
                previous,
                self.protein_target_g(),
                self.settings.drinks_alcohol,
            ),
            MetricFamily::Medication => medication_stats(&self.medications, current, previous),
            MetricFamily::Inhaler => inhaler_stats(&self.inhaler_uses, current, previous),
        }
    }

    /// Weekly stats for a family, `offset` weeks back (0 = current week)
    pub fn week_stats(&self, family: MetricFamily, offset: i64) -> Vec<Stat> {
        let today = self.now.date();
        self.stats_for(
            family,
            week_range(today, offset),
            week_range(today, offset + 1),
        )
    }

    /// Monthly stats for a family, `offset` months back
    ///
    /// The monthly view navigates independently of the weekly one; its
    /// offset is its own parameter, never shared state.
    pub fn month_stats(&self, family: MetricFamily, offset: i64) -> Vec<Stat> {
        let today = self.now.date();
        self.stats_for(
            family,
            month_range(today, offset),
            month_range(today, offset + 1),
        )
    }

    /// The weight journey (no period split)
    pub fn weight_stats(&self) -> Vec<Stat> {
        weight_stats(
            &self.weights,
            self.now.date(),
            self.settings.height_cm,
            self.settings.goal_weight_kg,
        )
    }

    /// Daily protein target from the setting and the latest weight
    fn protein_target_g(&self) -> Option<f64> {
        let per_kg = self.settings.protein_per_kg?;
        let summary = weight_summary(&self.weights, self.now.date(), None, None)?;
        Some(per_kg * summary.current_kg)
    }

    fn trigger_inputs(&self) -> TriggerInputs<'_> {
        TriggerInputs {
            arrhythmias: &self.arrhythmias,
            medications: &self.medications,
            nutrition: &self.nutrition,
            sleeps: &self.sleeps,
            readings: &self.readings,
            walks: &self.walks,
            stress_logs: &self.stress_logs,
            definitions: &self.definitions,
            drinks_alcohol: self.settings.drinks_alcohol,
        }
    }

    /// Ranked trigger factors over the trailing 90-day horizon
    ///
    /// Empty means insufficient data (no closed episodes in the horizon),
    /// never "no triggers found".
    pub fn triggers(&self) -> Vec<TriggerFactor> {
        trigger_report(&self.trigger_inputs(), self.now.date())
    }

    /// Episode-day vs non-episode-day daily metric means
    pub fn day_comparison(&self) -> Vec<DayComparison> {
        day_comparison(&self.trigger_inputs(), self.now.date())
    }

    /// Annotated per-episode cards, newest first
    pub fn episode_cards(&self) -> Vec<EpisodeCard> {
        episode_cards(
            &self.arrhythmias,
            &self.medications,
            &self.nutrition,
            &self.walks,
            &self.symptoms,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DoseStatus, DrinkBody, EventBody, MemoryStore, Schedule, TimeOfDay};
    use chrono::NaiveDate;

    fn dt(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.insert(Event::episode(dt(10, 9, 0), dt(10, 9, 45)).unwrap());
        store.insert(Event::episode(dt(12, 21, 0), dt(12, 22, 0)).unwrap());
        store.insert(Event::reading(dt(10, 10, 0), Some(150), Some(95), Some(80)).unwrap());
        store.insert(Event::sleep(dt(9, 23, 0), dt(10, 4, 0)).unwrap());
        store.insert(Event::walk(dt(12, 7, 0), dt(12, 7, 40)).unwrap());
        store.insert(Event::new(dt(10, 7, 0), EventBody::Weight { kg: 90.0 }));
        store.insert(Event::dose(
            dt(10, 8, 0),
            "Flecainide",
            "100mg",
            DoseStatus::Skipped,
            TimeOfDay::Am,
        ));
        store.insert(Event::new(
            dt(10, 8, 30),
            EventBody::Drink(DrinkBody {
                caffeine_mg: 200.0,
                volume_ml: 300.0,
                ..Default::default()
            }),
        ));
        store
    }

    fn definitions() -> Vec<MedicationDefinition> {
        vec![MedicationDefinition {
            name: "Flecainide".to_string(),
            dosage: "100mg".to_string(),
            schedule: Schedule::Both,
            afib_relevant: true,
        }]
    }

    #[test]
    fn test_views_are_idempotent_on_one_snapshot() {
        let store = seeded_store();
        let analysis = Analysis::load(&store, definitions(), Settings::default(), dt(14, 12, 0));

        assert_eq!(analysis.triggers(), analysis.triggers());
        assert_eq!(analysis.day_comparison(), analysis.day_comparison());
        assert_eq!(
            analysis.week_stats(MetricFamily::Arrhythmia, 0),
            analysis.week_stats(MetricFamily::Arrhythmia, 0)
        );
        assert_eq!(analysis.episode_cards(), analysis.episode_cards());
    }

    #[test]
    fn test_snapshot_is_stale_not_live() {
        let mut store = seeded_store();
        let analysis = Analysis::load(&store, definitions(), Settings::default(), dt(14, 12, 0));
        let before = analysis.week_stats(MetricFamily::Arrhythmia, 0);

        // Mutating the store after the pull changes nothing in flight
        store.insert(Event::episode(dt(13, 9, 0), dt(13, 9, 30)).unwrap());
        assert_eq!(analysis.week_stats(MetricFamily::Arrhythmia, 0), before);

        // A reload sees the new episode
        let reloaded = Analysis::load(&store, definitions(), Settings::default(), dt(14, 12, 0));
        assert_ne!(reloaded.week_stats(MetricFamily::Arrhythmia, 0), before);
    }

    #[test]
    fn test_week_and_month_offsets_are_independent() {
        let store = seeded_store();
        let analysis = Analysis::load(&store, definitions(), Settings::default(), dt(14, 12, 0));

        let this_week = analysis.week_stats(MetricFamily::Arrhythmia, 0);
        assert_eq!(this_week[0].value, "2");

        let this_month = analysis.month_stats(MetricFamily::Arrhythmia, 0);
        assert_eq!(this_month[0].value, "2");
        let last_month = analysis.month_stats(MetricFamily::Arrhythmia, 1);
        assert_eq!(last_month[0].value, "0");
    }

    #[test]
    fn test_trigger_view_reflects_settings_and_definitions() {
        let store = seeded_store();
        let analysis = Analysis::load(&store, definitions(), Settings::default(), dt(14, 12, 0));
        let triggers = analysis.triggers();

        // The skipped Flecainide dose precedes the first episode only
        let missed = triggers
            .iter()
            .find(|t| t.label == "Missed AFib Medication")
            .unwrap();
        assert_eq!(missed.percent, 50);

        // Elevated reading on the first episode's day
        assert!(triggers.iter().any(|t| t.label == "Elevated BP"));
    }

    #[test]
    fn test_protein_target_needs_setting_and_weight() {
        let store = seeded_store();
        let settings = Settings {
            protein_per_kg: Some(1.5),
            ..Default::default()
        };
        let analysis = Analysis::load(&store, definitions(), settings, dt(14, 12, 0));
        // 1.5 g/kg at 90 kg = 135 g/day target
        assert_eq!(analysis.protein_target_g(), Some(135.0));

        let analysis =
            Analysis::load(&store, definitions(), Settings::default(), dt(14, 12, 0));
        assert_eq!(analysis.protein_target_g(), None);
    }

    #[test]
    fn test_empty_store_produces_neutral_views() {
        let store = MemoryStore::new();
        let analysis = Analysis::load(&store, Vec::new(), Settings::default(), dt(14, 12, 0));

        assert!(analysis.triggers().is_empty());
        assert!(analysis.weight_stats().is_empty());
        assert!(analysis.episode_cards().is_empty());

        let stats = analysis.week_stats(MetricFamily::Sleep, 0);
        assert_eq!(stats[0].value, "0");
    }
}
