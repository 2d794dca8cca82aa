//! # Pulselog
//!
//! Temporal intelligence for a personal health journal - contextual
//! classification, period aggregation, and trigger correlation over a
//! heterogeneous event log.
//!
//! ## Features
//!
//! - **Contextual classification**: readings annotated relative to
//!   medication, walks, meals, and caffeine
//! - **Period aggregation**: weekly and monthly stat families with
//!   comparison badges against the previous period
//! - **Trigger correlation**: ranked candidate triggers over a 90-day
//!   horizon, plus episode-day vs baseline-day metric comparisons
//! - **Narrative cards**: per-episode summaries with linked symptoms
//!
//! ## Modules
//!
//! - [`event`]: Event model and store abstraction
//! - [`context`]: Reading classifiers and BP categories
//! - [`period`]: Weekly/monthly stat families and the weight journey
//! - [`triggers`]: Correlation engine over the trailing horizon
//! - [`narrative`]: Episode card assembly
//! - [`engine`]: Snapshot facade tying the views together
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pulselog::{Analysis, Event, MemoryStore, MetricFamily, Settings};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut store = MemoryStore::new();
//!     let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
//!     store.insert(Event::reading(
//!         day.and_hms_opt(8, 30, 0).unwrap(),
//!         Some(128),
//!         Some(82),
//!         Some(64),
//!     )?);
//!
//!     let analysis = Analysis::load(
//!         &store,
//!         Vec::new(),
//!         Settings::default(),
//!         day.and_hms_opt(12, 0, 0).unwrap(),
//!     );
//!
//!     let bp = analysis.week_stats(MetricFamily::BloodPressure, 0);
//!     println!("{} readings this week", bp[0].value);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod event;
pub mod narrative;
pub mod period;
pub mod triggers;
pub mod window;

// Re-export top-level types for convenience
pub use event::{
    DoseStatus, DrinkBody, Event, EventBody, EventError, EventId, EventKind, EventResult,
    EventStore, Interval, Macros, MedicationDefinition, MemoryStore, Schedule, TimeOfDay,
};

pub use context::{
    classify_bp, caffeine_context, meal_context, medication_context, reading_slot, walk_context,
    BpCategory, CaffeineContext, MealContext, MedicationContext, ReadingSlot, WalkContext,
};

pub use period::{
    comparison_badge, weight_stats, weight_summary, Badge, BadgeColor, Stat, Trend, WeightSummary,
};

pub use triggers::{
    day_comparison, trigger_report, DayComparison, FactorKind, TriggerFactor, TriggerInputs,
};

pub use narrative::{episode_cards, EpisodeCard};

pub use engine::{Analysis, MetricFamily};

pub use config::{ConfigError, Settings};

pub use window::{month_range, week_range, DayRange};
