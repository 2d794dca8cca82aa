//! Weight family aggregator
//!
//! Weight is the odd family out: no current/previous window split.
//! "Current" is the most recent reading, "starting" the earliest in the
//! full history, and "this week" is the delta between first and last
//! reading inside the trailing 7 calendar days.

use crate::event::{Event, EventBody};
use crate::period::stats::Stat;
use crate::window::DayRange;
use chrono::{Duration, NaiveDate};

fn weight_kg(event: &Event) -> Option<f64> {
    match &event.body {
        EventBody::Weight { kg } => Some(*kg),
        _ => None,
    }
}

/// Summary of the weight journey
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSummary {
    pub current_kg: f64,
    pub starting_kg: f64,
    /// First-to-last delta within the trailing 7 calendar days
    pub week_delta_kg: f64,
    pub total_change_kg: f64,
    /// Only computed when a height setting is present
    pub bmi: Option<f64>,
    /// Percent of the way from the starting weight to the goal, in [0, 100]
    pub goal_progress_pct: Option<f64>,
}

/// Reduce the full weight history to its summary
///
/// Returns `None` when there are no weight events at all.
pub fn weight_summary(
    events: &[Event],
    today: NaiveDate,
    height_cm: Option<f64>,
    goal_kg: Option<f64>,
) -> Option<WeightSummary> {
    let mut readings: Vec<(&Event, f64)> = events
        .iter()
        .filter_map(|e| weight_kg(e).map(|kg| (e, kg)))
        .collect();
    if readings.is_empty() {
        return None;
    }
    readings.sort_by_key(|(e, _)| e.timestamp);

    let starting_kg = readings.first().map(|(_, kg)| *kg).unwrap_or(0.0);
    let current_kg = readings.last().map(|(_, kg)| *kg).unwrap_or(0.0);

    // Trailing 7 calendar days, not a navigable week range
    let trailing = DayRange::spanning(today - Duration::days(6), today);
    let in_week: Vec<f64> = readings
        .iter()
        .filter(|(e, _)| trailing.contains(e.timestamp))
        .map(|(_, kg)| *kg)
        .collect();
    let week_delta_kg = match (in_week.first(), in_week.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    };

    let bmi = height_cm.filter(|h| *h > 0.0).map(|h| {
        let meters = h / 100.0;
        current_kg / (meters * meters)
    });

    let goal_progress_pct = goal_kg.map(|goal| {
        let journey = (starting_kg - goal).abs();
        if journey == 0.0 {
            // Already at goal from the start
            100.0
        } else {
            ((starting_kg - current_kg).abs() / journey * 100.0).clamp(0.0, 100.0)
        }
    });

    Some(WeightSummary {
        current_kg,
        starting_kg,
        week_delta_kg,
        total_change_kg: current_kg - starting_kg,
        bmi,
        goal_progress_pct,
    })
}

/// Render the weight summary as display stats
pub fn weight_stats(
    events: &[Event],
    today: NaiveDate,
    height_cm: Option<f64>,
    goal_kg: Option<f64>,
) -> Vec<Stat> {
    let Some(summary) = weight_summary(events, today, height_cm, goal_kg) else {
        return Vec::new();
    };

    let mut stats = vec![
        Stat::new("Current", format!("{:.1}", summary.current_kg)).unit("kg"),
        Stat::new("Starting", format!("{:.1}", summary.starting_kg)).unit("kg"),
        Stat::new("This Week", format!("{:+.1}", summary.week_delta_kg)).unit("kg"),
        Stat::new("Total Change", format!("{:+.1}", summary.total_change_kg)).unit("kg"),
    ];
    if let Some(bmi) = summary.bmi {
        stats.push(Stat::new("BMI", format!("{:.1}", bmi)));
    }
    if let Some(pct) = summary.goal_progress_pct {
        stats.push(Stat::new("Goal Progress", format!("{:.0}%", pct)));
    }
    stats
}
