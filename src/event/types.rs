//! Core data types for the pulselog event model
//!
//! This module defines the fundamental types the engine operates on:
//! - `Event`: a single journal entry (discriminated over `EventBody`)
//! - `Interval`: start/end pair for interval-shaped events
//! - `MedicationDefinition`: reference data for scheduled medications
//! - `EventKind`, `DoseStatus`, `TimeOfDay`, `Schedule`: classification enums
//!
//! All timestamps are user-local wall-clock `NaiveDateTime`; conversion from
//! stored instants happens at the store boundary, so "same calendar day"
//! logic downstream is plain `NaiveDate` equality.

use crate::event::error::{EventError, EventResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique identifier for an event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discriminant for the event union, used by store queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Arrhythmia,
    Reading,
    Sleep,
    Walk,
    Steps,
    Weight,
    Food,
    Drink,
    Medication,
    Inhaler,
    Stress,
    Symptom,
}

impl EventKind {
    /// All kinds, for iteration
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::Arrhythmia,
            EventKind::Reading,
            EventKind::Sleep,
            EventKind::Walk,
            EventKind::Steps,
            EventKind::Weight,
            EventKind::Food,
            EventKind::Drink,
            EventKind::Medication,
            EventKind::Inhaler,
            EventKind::Stress,
            EventKind::Symptom,
        ]
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventKind::Arrhythmia => "arrhythmia",
            EventKind::Reading => "reading",
            EventKind::Sleep => "sleep",
            EventKind::Walk => "walk",
            EventKind::Steps => "steps",
            EventKind::Weight => "weight",
            EventKind::Food => "food",
            EventKind::Drink => "drink",
            EventKind::Medication => "medication",
            EventKind::Inhaler => "inhaler",
            EventKind::Stress => "stress",
            EventKind::Symptom => "symptom",
        };
        write!(f, "{}", s)
    }
}

/// Start/end pair for interval-shaped events (arrhythmia, sleep, walk)
///
/// `end` is absent while the interval is still open. Intervals are never
/// reopened once closed. Constructing a closed interval with `end < start`
/// is rejected here so downstream aggregates can assume valid durations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    #[serde(default)]
    pub end: Option<NaiveDateTime>,
}

impl Interval {
    /// Create an open (in-progress) interval
    pub fn open(start: NaiveDateTime) -> Self {
        Self { start, end: None }
    }

    /// Create a closed interval, rejecting end < start
    pub fn closed(start: NaiveDateTime, end: NaiveDateTime) -> EventResult<Self> {
        if end < start {
            return Err(EventError::InvalidInterval { start, end });
        }
        Ok(Self {
            start,
            end: Some(end),
        })
    }

    /// Close an open interval in place, rejecting end < start
    pub fn close(&mut self, end: NaiveDateTime) -> EventResult<()> {
        if end < self.start {
            return Err(EventError::InvalidInterval {
                start: self.start,
                end,
            });
        }
        self.end = Some(end);
        Ok(())
    }

    /// Whether both start and end are set
    pub fn is_closed(&self) -> bool {
        self.end.is_some()
    }

    /// Duration in whole minutes, rounded; `None` while the interval is open
    pub fn duration_min(&self) -> Option<i64> {
        let end = self.end?;
        let millis = (end - self.start).num_milliseconds();
        Some(((millis as f64) / 60_000.0).round() as i64)
    }
}

/// Blood-pressure / heart-rate reading
///
/// Every field is optional but at least one must be present at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingBody {
    #[serde(default)]
    pub systolic: Option<u16>,
    #[serde(default)]
    pub diastolic: Option<u16>,
    #[serde(default)]
    pub heart_rate: Option<u16>,
}

impl ReadingBody {
    /// Create a reading, rejecting the all-absent case
    pub fn new(
        systolic: Option<u16>,
        diastolic: Option<u16>,
        heart_rate: Option<u16>,
    ) -> EventResult<Self> {
        if systolic.is_none() && diastolic.is_none() && heart_rate.is_none() {
            return Err(EventError::EmptyReading);
        }
        Ok(Self {
            systolic,
            diastolic,
            heart_rate,
        })
    }
}

/// Macro nutrients shared by food and drink entries
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Macros {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fat_g: f64,
    #[serde(default)]
    pub sodium_mg: f64,
}

/// Drink entry: macros plus fluid-specific fields
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DrinkBody {
    #[serde(flatten)]
    pub macros: Macros,
    #[serde(default)]
    pub volume_ml: f64,
    #[serde(default)]
    pub caffeine_mg: f64,
    #[serde(default)]
    pub alcohol_units: f64,
}

/// Whether a logged dose was actually taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoseStatus {
    Taken,
    Skipped,
}

/// Morning or evening dose slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Am,
    Pm,
}

/// A logged medication dose
///
/// Name and dosage are copied from the definition at logging time
/// (snapshot semantics): later edits to the definition do not
/// retroactively change past events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationBody {
    pub med_name: String,
    pub dosage: String,
    pub status: DoseStatus,
    pub time_of_day: TimeOfDay,
}

/// An arrhythmia episode: interval plus onset annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrhythmiaBody {
    #[serde(flatten)]
    pub interval: Interval,
    /// Free-text tags chosen at episode start ("Resting", "Exercising", ...)
    #[serde(default)]
    pub onset_context: Vec<String>,
    #[serde(default)]
    pub onset_notes: Option<String>,
}

/// A symptom log attached to an arrhythmia episode
///
/// `afib_start_time` is a soft foreign key on the episode's start instant,
/// not its id. Editing the episode's start time orphans its symptom logs;
/// this matching behavior is preserved deliberately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomBody {
    pub afib_start_time: NaiveDateTime,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload of an event, discriminated by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EventBody {
    Arrhythmia(ArrhythmiaBody),
    Reading(ReadingBody),
    Sleep(Interval),
    Walk(Interval),
    Steps { count: u32 },
    Weight { kg: f64 },
    Food(Macros),
    Drink(DrinkBody),
    Medication(MedicationBody),
    Inhaler,
    Stress { level: u8 },
    Symptom(SymptomBody),
}

impl EventBody {
    /// The kind discriminant for this body
    pub fn kind(&self) -> EventKind {
        match self {
            EventBody::Arrhythmia(_) => EventKind::Arrhythmia,
            EventBody::Reading(_) => EventKind::Reading,
            EventBody::Sleep(_) => EventKind::Sleep,
            EventBody::Walk(_) => EventKind::Walk,
            EventBody::Steps { .. } => EventKind::Steps,
            EventBody::Weight { .. } => EventKind::Weight,
            EventBody::Food(_) => EventKind::Food,
            EventBody::Drink(_) => EventKind::Drink,
            EventBody::Medication(_) => EventKind::Medication,
            EventBody::Inhaler => EventKind::Inhaler,
            EventBody::Stress { .. } => EventKind::Stress,
            EventBody::Symptom(_) => EventKind::Symptom,
        }
    }
}

/// A single journal entry
///
/// `timestamp` is the primary ordering key; for interval events it is the
/// start instant and is kept in sync with the interval by the constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Opaque unique id
    pub id: EventId,
    /// Primary ordering key (start instant for interval events)
    pub timestamp: NaiveDateTime,
    /// Optional free-text notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Set at creation if an arrhythmia interval was open at the time
    #[serde(default)]
    pub during_arrhythmia: bool,
    /// Set by the store on every in-place edit
    #[serde(default)]
    pub last_edited: Option<NaiveDateTime>,
    /// Typed payload
    pub body: EventBody,
}

impl Event {
    /// Create a new event with a fresh id
    pub fn new(timestamp: NaiveDateTime, body: EventBody) -> Self {
        Self {
            id: EventId::new(),
            timestamp,
            notes: None,
            during_arrhythmia: false,
            last_edited: None,
            body,
        }
    }

    /// Builder: attach notes
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder: mark as logged while an arrhythmia episode was open
    pub fn during_arrhythmia(mut self) -> Self {
        self.during_arrhythmia = true;
        self
    }

    /// The kind discriminant
    pub fn kind(&self) -> EventKind {
        self.body.kind()
    }

    /// Local calendar date of the primary timestamp
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// The interval payload, for interval-shaped events
    pub fn interval(&self) -> Option<&Interval> {
        match &self.body {
            EventBody::Arrhythmia(a) => Some(&a.interval),
            EventBody::Sleep(i) | EventBody::Walk(i) => Some(i),
            _ => None,
        }
    }

    /// Duration in minutes for closed interval events, else `None`
    pub fn duration_min(&self) -> Option<i64> {
        self.interval().and_then(Interval::duration_min)
    }

    /// Calories contributed by this event (food and drink only)
    pub fn calories(&self) -> f64 {
        match &self.body {
            EventBody::Food(m) => m.calories,
            EventBody::Drink(d) => d.macros.calories,
            _ => 0.0,
        }
    }

    /// Caffeine contributed by this event (drinks only; food carries none)
    pub fn caffeine_mg(&self) -> f64 {
        match &self.body {
            EventBody::Drink(d) => d.caffeine_mg,
            _ => 0.0,
        }
    }

    /// Alcohol units contributed by this event
    pub fn alcohol_units(&self) -> f64 {
        match &self.body {
            EventBody::Drink(d) => d.alcohol_units,
            _ => 0.0,
        }
    }

    /// Fluid volume contributed by this event
    pub fn volume_ml(&self) -> f64 {
        match &self.body {
            EventBody::Drink(d) => d.volume_ml,
            _ => 0.0,
        }
    }

    // Convenience constructors used throughout the engine and tests.

    /// A BP/HR reading event
    pub fn reading(
        timestamp: NaiveDateTime,
        systolic: Option<u16>,
        diastolic: Option<u16>,
        heart_rate: Option<u16>,
    ) -> EventResult<Self> {
        Ok(Self::new(
            timestamp,
            EventBody::Reading(ReadingBody::new(systolic, diastolic, heart_rate)?),
        ))
    }

    /// A closed walk
    pub fn walk(start: NaiveDateTime, end: NaiveDateTime) -> EventResult<Self> {
        Ok(Self::new(start, EventBody::Walk(Interval::closed(start, end)?)))
    }

    /// A closed sleep session
    pub fn sleep(start: NaiveDateTime, end: NaiveDateTime) -> EventResult<Self> {
        Ok(Self::new(start, EventBody::Sleep(Interval::closed(start, end)?)))
    }

    /// A closed arrhythmia episode
    pub fn episode(start: NaiveDateTime, end: NaiveDateTime) -> EventResult<Self> {
        Ok(Self::new(
            start,
            EventBody::Arrhythmia(ArrhythmiaBody {
                interval: Interval::closed(start, end)?,
                onset_context: Vec::new(),
                onset_notes: None,
            }),
        ))
    }

    /// A medication dose log
    pub fn dose(
        timestamp: NaiveDateTime,
        med_name: impl Into<String>,
        dosage: impl Into<String>,
        status: DoseStatus,
        time_of_day: TimeOfDay,
    ) -> Self {
        Self::new(
            timestamp,
            EventBody::Medication(MedicationBody {
                med_name: med_name.into(),
                dosage: dosage.into(),
                status,
                time_of_day,
            }),
        )
    }

    /// A stress log on the 1-5 scale
    pub fn stress(timestamp: NaiveDateTime, level: u8) -> EventResult<Self> {
        if !(1..=5).contains(&level) {
            return Err(EventError::InvalidStressLevel(level));
        }
        Ok(Self::new(timestamp, EventBody::Stress { level }))
    }
}

/// Dose schedule for a medication definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    Morning,
    Evening,
    Both,
}

/// Reference data for a scheduled medication
///
/// Not an event: dose events copy `name`/`dosage` at logging time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationDefinition {
    pub name: String,
    pub dosage: String,
    pub schedule: Schedule,
    pub afib_relevant: bool,
}

/// Look up a definition by name, case-insensitively.
///
/// Returns `None` when the logged name no longer matches any definition;
/// callers classify such doses as not AFib-relevant (fail open).
pub fn find_definition<'a>(
    definitions: &'a [MedicationDefinition],
    med_name: &str,
) -> Option<&'a MedicationDefinition> {
    definitions
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case(med_name.trim()))
}
