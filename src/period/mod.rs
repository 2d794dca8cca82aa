//! Period Aggregator
//!
//! Reduces a window's events into labeled stats with period-over-period
//! comparison:
//!
//! - **badge**: the single comparison-badge rule shared by all families
//! - **stats**: the `Stat` display type
//! - **families**: per-family week/month aggregators
//! - **weight**: the weight journey (no window split)
//!
//! The same family functions serve weekly and monthly views; callers pick
//! the window with [`crate::window::week_range`] / [`crate::window::month_range`]
//! and pass the preceding sibling for the comparison.

pub mod badge;
pub mod families;
pub mod stats;
pub mod weight;

// Re-export commonly used types
pub use badge::{comparison_badge, Badge, BadgeColor, Trend};
pub use families::{
    activity_stats, adherence_pct, arrhythmia_stats, bp_stats, inhaler_stats, medication_stats,
    nutrition_stats, sleep_stats,
};
pub use stats::Stat;
pub use weight::{weight_stats, weight_summary, WeightSummary};
