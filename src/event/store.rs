//! Event Store seam
//!
//! The engine never fetches data itself: it consumes arrays pulled up front
//! through the `EventStore` trait. Persistence internals (files, sync,
//! multi-device reconciliation) live behind this seam and are out of scope.
//!
//! `MemoryStore` is the reference implementation: a plain in-memory
//! collection with the create / edit-in-place / delete lifecycle the data
//! model describes. It is what the tests and benches run against.

use crate::event::error::{EventError, EventResult};
use crate::event::types::{Event, EventBody, EventId, EventKind};
use chrono::NaiveDateTime;

/// Read interface the engine consumes
///
/// `fetch_by_kind` returns newest-first (by `timestamp`), capped at `limit`.
/// `fetch_range` is an inclusive-bounds membership test on `timestamp`.
pub trait EventStore {
    /// All events of one kind, newest first, capped at `limit`
    fn fetch_by_kind(&self, kind: EventKind, limit: usize) -> Vec<Event>;

    /// All events of any of the given kinds, newest first, capped at `limit`
    fn fetch_kinds(&self, kinds: &[EventKind], limit: usize) -> Vec<Event>;

    /// All events with `start <= timestamp <= end`, newest first
    fn fetch_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Event>;
}

/// In-memory event store
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: Vec<Event>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new event
    ///
    /// If an arrhythmia interval is open at the event's timestamp, the
    /// `during_arrhythmia` flag is set at creation (and never recomputed).
    pub fn insert(&mut self, mut event: Event) -> EventId {
        if event.kind() != EventKind::Arrhythmia && self.arrhythmia_open_at(event.timestamp) {
            event.during_arrhythmia = true;
        }
        let id = event.id.clone();
        self.events.push(event);
        id
    }

    /// Edit an event in place, stamping `last_edited`
    pub fn update(
        &mut self,
        id: &EventId,
        edited_at: NaiveDateTime,
        apply: impl FnOnce(&mut Event),
    ) -> EventResult<()> {
        let event = self
            .events
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;
        apply(event);
        event.last_edited = Some(edited_at);
        Ok(())
    }

    /// Close an open interval event, rejecting end < start
    pub fn close_interval(&mut self, id: &EventId, end: NaiveDateTime) -> EventResult<()> {
        let event = self
            .events
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;

        let interval = match &mut event.body {
            EventBody::Arrhythmia(a) => &mut a.interval,
            EventBody::Sleep(i) | EventBody::Walk(i) => i,
            _ => return Err(EventError::NotAnInterval(id.to_string())),
        };
        if interval.is_closed() {
            return Err(EventError::AlreadyClosed(id.to_string()));
        }
        interval.close(end)
    }

    /// Delete an event by id
    pub fn delete(&mut self, id: &EventId) -> EventResult<Event> {
        let idx = self
            .events
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;
        Ok(self.events.remove(idx))
    }

    /// Total number of events held
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn arrhythmia_open_at(&self, at: NaiveDateTime) -> bool {
        self.events.iter().any(|e| match &e.body {
            EventBody::Arrhythmia(a) => a.interval.start <= at && !a.interval.is_closed(),
            _ => false,
        })
    }

    fn sorted_newest_first(&self, mut out: Vec<Event>) -> Vec<Event> {
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        out
    }
}

impl EventStore for MemoryStore {
    fn fetch_by_kind(&self, kind: EventKind, limit: usize) -> Vec<Event> {
        let matched: Vec<Event> = self
            .events
            .iter()
            .filter(|e| e.kind() == kind)
            .cloned()
            .collect();
        let mut sorted = self.sorted_newest_first(matched);
        sorted.truncate(limit);
        tracing::debug!(kind = %kind, returned = sorted.len(), "fetch_by_kind");
        sorted
    }

    fn fetch_kinds(&self, kinds: &[EventKind], limit: usize) -> Vec<Event> {
        let matched: Vec<Event> = self
            .events
            .iter()
            .filter(|e| kinds.contains(&e.kind()))
            .cloned()
            .collect();
        let mut sorted = self.sorted_newest_first(matched);
        sorted.truncate(limit);
        sorted
    }

    fn fetch_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Event> {
        let matched: Vec<Event> = self
            .events
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp <= end)
            .cloned()
            .collect();
        self.sorted_newest_first(matched)
    }
}
