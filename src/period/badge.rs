//! Period-over-period comparison badges
//!
//! One rule shared by every metric family: given this period's value and
//! the previous period's value, produce a direction + magnitude + good/bad
//! color, or nothing when there is nothing to compare.

use serde::Serialize;

/// Direction of change between the periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// Whether the change is desirable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Good,
    Bad,
    Neutral,
}

/// A small comparison indicator attached to a stat
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    /// Display text: "New", "0%", or a signed percent like "+25%"
    pub text: String,
    pub trend: Trend,
    pub color: BadgeColor,
}

/// Compute the comparison badge for a stat
///
/// - previous = 0 and current = 0: no badge
/// - previous = 0, current > 0: "New"
/// - change rounds to 0%: neutral flat badge
/// - otherwise: signed percent, up/down by sign, colored good when the
///   change direction agrees with `lower_is_better`
pub fn comparison_badge(current: f64, previous: f64, lower_is_better: bool) -> Option<Badge> {
    if previous == 0.0 && current == 0.0 {
        return None;
    }
    if previous == 0.0 {
        return Some(Badge {
            text: "New".to_string(),
            trend: Trend::Up,
            color: if lower_is_better {
                BadgeColor::Bad
            } else {
                BadgeColor::Good
            },
        });
    }

    let change = ((current - previous) / previous * 100.0).round() as i64;
    if change == 0 {
        return Some(Badge {
            text: "0%".to_string(),
            trend: Trend::Flat,
            color: BadgeColor::Neutral,
        });
    }

    let is_good = if lower_is_better { change < 0 } else { change > 0 };
    Some(Badge {
        text: format!("{:+}%", change),
        trend: if change > 0 { Trend::Up } else { Trend::Down },
        color: if is_good {
            BadgeColor::Good
        } else {
            BadgeColor::Bad
        },
    })
}
