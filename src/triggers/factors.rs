//! Trigger factor catalog
//!
//! Each antecedent condition the correlation engine evaluates against an
//! episode, with its display label and presentation keys. Predicates and
//! lookback windows live in the engine; this module is the fixed catalog
//! plus the dynamic onset-context-tag factor.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Minutes of sleep under which a night counts as poor
pub const POOR_SLEEP_MIN: i64 = 360;

/// Systolic threshold for the elevated-BP factor
pub const ELEVATED_SYSTOLIC: u16 = 140;

/// Daily fluid floor in millilitres for the low-fluid factor
pub const LOW_FLUID_ML: f64 = 1500.0;

/// Calorie threshold for the large-meal factor
pub const LARGE_MEAL_KCAL: f64 = 500.0;

/// Single-item caffeine threshold for the acute-caffeine factor
pub const ACUTE_CAFFEINE_MG: f64 = 80.0;

/// Stress level (1-5 scale) at or above which a log counts as high stress
pub const HIGH_STRESS_LEVEL: u8 = 4;

/// Minimum horizon-wide prevalence for an onset-context tag to be reported
pub const ONSET_TAG_PREVALENCE: f64 = 0.20;

/// Matches medication names in the magnesium / electrolyte family
pub fn electrolyte_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)magnesium|electrolyte|potassium").expect("pattern is valid")
    })
}

/// An antecedent condition evaluated per episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "factor", rename_all = "kebab-case")]
pub enum FactorKind {
    MissedAfibMedication,
    MissedAnyMedication,
    AboveAverageCaffeine,
    PoorSleep,
    ElevatedBp,
    LowFluid,
    LargeMeal,
    RecentExercise,
    AcuteCaffeine,
    HighStress,
    AlcoholPrior,
    MissedElectrolyte,
    OnsetTag { tag: String },
}

impl FactorKind {
    /// Display label
    pub fn label(&self) -> String {
        match self {
            FactorKind::MissedAfibMedication => "Missed AFib Medication".to_string(),
            FactorKind::MissedAnyMedication => "Missed Medication".to_string(),
            FactorKind::AboveAverageCaffeine => "Above-Average Caffeine".to_string(),
            FactorKind::PoorSleep => "Poor Sleep (<6h)".to_string(),
            FactorKind::ElevatedBp => "Elevated BP".to_string(),
            FactorKind::LowFluid => "Low Fluid Intake".to_string(),
            FactorKind::LargeMeal => "Large Meal".to_string(),
            FactorKind::RecentExercise => "Exercise Within 3h".to_string(),
            FactorKind::AcuteCaffeine => "Acute Caffeine".to_string(),
            FactorKind::HighStress => "High Stress".to_string(),
            FactorKind::AlcoholPrior => "Alcohol (24h Prior)".to_string(),
            FactorKind::MissedElectrolyte => "Missed Magnesium/Electrolyte".to_string(),
            FactorKind::OnsetTag { tag } => format!("Onset: {}", tag),
        }
    }

    /// Presentation-layer icon key
    pub fn icon_key(&self) -> &'static str {
        match self {
            FactorKind::MissedAfibMedication
            | FactorKind::MissedAnyMedication
            | FactorKind::MissedElectrolyte => "pill",
            FactorKind::AboveAverageCaffeine | FactorKind::AcuteCaffeine => "coffee",
            FactorKind::PoorSleep => "moon",
            FactorKind::ElevatedBp => "gauge",
            FactorKind::LowFluid => "droplet",
            FactorKind::LargeMeal => "utensils",
            FactorKind::RecentExercise => "walk",
            FactorKind::HighStress => "zap",
            FactorKind::AlcoholPrior => "wine",
            FactorKind::OnsetTag { .. } => "tag",
        }
    }

    /// Presentation-layer color key
    pub fn color_key(&self) -> &'static str {
        match self {
            FactorKind::MissedAfibMedication | FactorKind::ElevatedBp => "red",
            FactorKind::MissedAnyMedication
            | FactorKind::AboveAverageCaffeine
            | FactorKind::LargeMeal => "orange",
            FactorKind::PoorSleep | FactorKind::AlcoholPrior => "purple",
            FactorKind::LowFluid => "blue",
            FactorKind::RecentExercise => "green",
            FactorKind::AcuteCaffeine => "amber",
            FactorKind::HighStress => "rose",
            FactorKind::MissedElectrolyte => "teal",
            FactorKind::OnsetTag { .. } => "gray",
        }
    }
}

/// One row of the ranked trigger list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerFactor {
    pub label: String,
    /// Percent of horizon episodes preceded by this factor
    pub percent: u32,
    /// Number of episodes that satisfied the predicate
    pub count: usize,
    pub icon: &'static str,
    pub color: &'static str,
    #[serde(flatten)]
    pub kind: FactorKind,
}

impl TriggerFactor {
    /// Build a row from a kind and its episode count
    pub fn from_count(kind: FactorKind, count: usize, total_episodes: usize) -> Self {
        debug_assert!(total_episodes > 0);
        let percent = ((count as f64) / (total_episodes as f64) * 100.0).round() as u32;
        Self {
            label: kind.label(),
            percent,
            count,
            icon: kind.icon_key(),
            color: kind.color_key(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_electrolyte_pattern_matches_name_family() {
        let pat = electrolyte_pattern();
        assert!(pat.is_match("Magnesium Glycinate"));
        assert!(pat.is_match("magnesium citrate 200mg"));
        assert!(pat.is_match("Potassium Chloride"));
        assert!(pat.is_match("Electrolyte Mix"));
        assert!(!pat.is_match("Metoprolol"));
        assert!(!pat.is_match("Flecainide"));
    }

    #[test]
    fn test_trigger_factor_percent_rounds() {
        let row = TriggerFactor::from_count(FactorKind::PoorSleep, 2, 3);
        assert_eq!(row.percent, 67);
        assert_eq!(row.count, 2);
        assert_eq!(row.label, "Poor Sleep (<6h)");

        let row = TriggerFactor::from_count(FactorKind::ElevatedBp, 1, 8);
        assert_eq!(row.percent, 13);
    }

    #[test]
    fn test_onset_tag_label_and_keys() {
        let kind = FactorKind::OnsetTag {
            tag: "Exercising".to_string(),
        };
        assert_eq!(kind.label(), "Onset: Exercising");
        assert_eq!(kind.icon_key(), "tag");
        assert_eq!(kind.color_key(), "gray");
    }

    #[test]
    fn test_trigger_factor_serializes_flat() {
        let row = TriggerFactor::from_count(FactorKind::LowFluid, 1, 4);
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"factor\":\"low-fluid\""));
        assert!(json.contains("\"percent\":25"));
        assert!(json.contains("\"icon\":\"droplet\""));
    }
}
