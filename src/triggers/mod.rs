//! Trigger Correlation Engine
//!
//! Ranks antecedent conditions by how often they precede arrhythmia
//! episodes over a trailing 90-day horizon:
//!
//! - **factors**: the factor catalog (labels, thresholds, display keys)
//! - **engine**: horizon partition and per-episode factor counting
//! - **daily**: episode-day vs non-episode-day metric means
//!
//! Percentages are raw co-occurrence over episodes; nothing here makes a
//! causal or diagnostic claim.

pub mod daily;
pub mod engine;
pub mod factors;

// Re-export commonly used types
pub use daily::{day_comparison, DayComparison};
pub use engine::{partition_horizon, trigger_report, HorizonPartition, TriggerInputs, HORIZON_DAYS};
pub use factors::{FactorKind, TriggerFactor};
