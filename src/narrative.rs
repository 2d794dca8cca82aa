//! Insight narrative builder
//!
//! Turns episodes plus their surrounding streams into annotated cards for
//! display. Thin by design: every line comes from the contextual
//! classifiers or the raw event, nothing is computed here that the
//! classifiers don't already know.

use crate::context::classifier::{
    caffeine_context, meal_context, medication_context, walk_context, format_minutes,
};
use crate::event::{Event, EventBody, EventId};
use chrono::NaiveDateTime;
use serde::Serialize;

/// An annotated per-episode card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeCard {
    pub episode_id: EventId,
    pub started_at: NaiveDateTime,
    pub title: String,
    /// Absent while the episode is still open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_label: Option<String>,
    pub onset_tags: Vec<String>,
    /// Context labels from the surrounding streams, display order
    pub context_lines: Vec<String>,
    /// Tags from symptom logs linked to this episode
    pub symptom_tags: Vec<String>,
}

/// Symptom tags linked to an episode by its start instant
///
/// The link is a soft foreign key: symptom logs store the episode's start
/// time, not its id, so editing the start time orphans them. Preserved
/// deliberately; see DESIGN notes.
fn linked_symptom_tags(symptoms: &[Event], episode_start: NaiveDateTime) -> Vec<String> {
    let mut tags = Vec::new();
    for e in symptoms {
        if let EventBody::Symptom(s) = &e.body {
            if s.afib_start_time == episode_start {
                tags.extend(s.tags.iter().cloned());
            }
        }
    }
    tags
}

/// Build annotated cards for every episode, newest first
pub fn episode_cards(
    episodes: &[Event],
    medications: &[Event],
    nutrition: &[Event],
    walks: &[Event],
    symptoms: &[Event],
) -> Vec<EpisodeCard> {
    let mut ordered: Vec<&Event> = episodes
        .iter()
        .filter(|e| matches!(&e.body, EventBody::Arrhythmia(_)))
        .collect();
    ordered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    ordered
        .into_iter()
        .map(|episode| {
            let EventBody::Arrhythmia(body) = &episode.body else {
                unreachable!("filtered to arrhythmia events above");
            };
            let start = body.interval.start;

            let mut context_lines = Vec::new();
            if let Some(med) = medication_context(start, medications) {
                context_lines.push(med.label);
            }
            context_lines.push(walk_context(start, walks).label);
            context_lines.push(meal_context(start, nutrition).label);
            if let Some(caffeine) = caffeine_context(start, nutrition) {
                context_lines.push(caffeine.label);
            }

            let duration_label = body.interval.duration_min().map(format_minutes);
            let title = match &duration_label {
                Some(d) => format!("{} episode, {}", d, start.format("%b %d %H:%M")),
                None => format!("Ongoing episode, {}", start.format("%b %d %H:%M")),
            };

            EpisodeCard {
                episode_id: episode.id.clone(),
                started_at: start,
                title,
                duration_label,
                onset_tags: body.onset_context.clone(),
                context_lines,
                symptom_tags: linked_symptom_tags(symptoms, start),
            }
        })
        .collect()
}
