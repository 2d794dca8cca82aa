//! Blood-pressure categorization
//!
//! Deterministic threshold ladder evaluated in priority order; the ranges
//! overlap intentionally so that severity takes precedence (a systolic of
//! 181 is Crisis no matter the diastolic).

use serde::Serialize;

/// Blood-pressure category, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BpCategory {
    Crisis,
    High,
    Elevated,
    Low,
    Normal,
}

impl BpCategory {
    /// Severity rank for ordering: Crisis highest, Normal lowest
    pub fn severity_rank(&self) -> u8 {
        match self {
            BpCategory::Crisis => 4,
            BpCategory::High => 3,
            BpCategory::Elevated => 2,
            BpCategory::Low => 1,
            BpCategory::Normal => 0,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            BpCategory::Crisis => "Crisis",
            BpCategory::High => "High",
            BpCategory::Elevated => "Elevated",
            BpCategory::Low => "Low",
            BpCategory::Normal => "Normal",
        }
    }
}

impl std::fmt::Display for BpCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Classify a reading's blood pressure
///
/// An absent value is treated as 0 for comparison only when the other value
/// is present; a reading with both values absent never yields a category.
/// First matching rung wins:
///
/// - systolic > 180 or diastolic > 120: Crisis
/// - systolic >= 140 or diastolic >= 90: High
/// - systolic >= 130 or diastolic >= 80: Elevated
/// - systolic >= 120 and diastolic < 80: Elevated
/// - systolic < 90 or diastolic < 60: Low
/// - otherwise: Normal
pub fn classify_bp(systolic: Option<u16>, diastolic: Option<u16>) -> Option<BpCategory> {
    if systolic.is_none() && diastolic.is_none() {
        return None;
    }
    let s = systolic.unwrap_or(0);
    let d = diastolic.unwrap_or(0);

    let category = if s > 180 || d > 120 {
        BpCategory::Crisis
    } else if s >= 140 || d >= 90 {
        BpCategory::High
    } else if s >= 130 || d >= 80 {
        BpCategory::Elevated
    } else if s >= 120 && d < 80 {
        BpCategory::Elevated
    } else if s < 90 || d < 60 {
        BpCategory::Low
    } else {
        BpCategory::Normal
    };
    Some(category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_precedence() {
        // 181 systolic is Crisis regardless of diastolic
        assert_eq!(classify_bp(Some(181), Some(60)), Some(BpCategory::Crisis));
        assert_eq!(classify_bp(Some(181), Some(125)), Some(BpCategory::Crisis));
        assert_eq!(classify_bp(Some(120), Some(121)), Some(BpCategory::Crisis));

        assert_eq!(classify_bp(Some(142), Some(70)), Some(BpCategory::High));
        assert_eq!(classify_bp(Some(110), Some(92)), Some(BpCategory::High));

        assert_eq!(classify_bp(Some(132), Some(70)), Some(BpCategory::Elevated));
        assert_eq!(classify_bp(Some(118), Some(82)), Some(BpCategory::Elevated));
        assert_eq!(classify_bp(Some(124), Some(76)), Some(BpCategory::Elevated));

        assert_eq!(classify_bp(Some(85), Some(70)), Some(BpCategory::Low));
        assert_eq!(classify_bp(Some(100), Some(55)), Some(BpCategory::Low));

        assert_eq!(classify_bp(Some(112), Some(72)), Some(BpCategory::Normal));
    }

    #[test]
    fn test_both_absent_yields_no_category() {
        assert_eq!(classify_bp(None, None), None);
    }

    #[test]
    fn test_single_value_treats_other_as_zero() {
        // Diastolic absent: 0 < 60 puts a mid systolic into Low
        assert_eq!(classify_bp(Some(100), None), Some(BpCategory::Low));
        // But severity rungs still win first
        assert_eq!(classify_bp(Some(185), None), Some(BpCategory::Crisis));
        assert_eq!(classify_bp(Some(145), None), Some(BpCategory::High));
        assert_eq!(classify_bp(None, Some(95)), Some(BpCategory::High));
    }

    #[test]
    fn test_severity_rank_is_total_order() {
        assert!(BpCategory::Crisis.severity_rank() > BpCategory::High.severity_rank());
        assert!(BpCategory::High.severity_rank() > BpCategory::Elevated.severity_rank());
        assert!(BpCategory::Elevated.severity_rank() > BpCategory::Low.severity_rank());
        assert!(BpCategory::Low.severity_rank() > BpCategory::Normal.severity_rank());
    }
}
