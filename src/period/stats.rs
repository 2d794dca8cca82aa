//! Stat presentation type
//!
//! The labeled value objects the period aggregator hands to the
//! presentation layer. Values are pre-formatted strings; the engine owns
//! number formatting so every surface renders identically.

use crate::period::badge::Badge;
use serde::Serialize;

/// One labeled statistic for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
}

impl Stat {
    /// Create a stat with just a label and value
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            unit: None,
            badge: None,
        }
    }

    /// Builder: set the unit
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Builder: attach a comparison badge (no-op for `None`)
    pub fn badge(mut self, badge: Option<Badge>) -> Self {
        self.badge = badge;
        self
    }
}
