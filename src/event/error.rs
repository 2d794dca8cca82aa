//! Event model error types
//!
//! Defines the validation errors raised at the data-model boundary.
//! Engine functions never produce these: invalid records are rejected
//! before they reach any classifier or aggregator.

use thiserror::Error;

/// Errors that can occur constructing or mutating events
#[derive(Error, Debug)]
pub enum EventError {
    /// An interval close would put the end before the start
    #[error("Invalid interval: end {end} is before start {start}")]
    InvalidInterval {
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
    },

    /// A reading was created with no values at all
    #[error("Empty reading: at least one of systolic, diastolic, heart_rate is required")]
    EmptyReading,

    /// Stress level outside the 1-5 scale
    #[error("Invalid stress level {0}: must be between 1 and 5")]
    InvalidStressLevel(u8),

    /// Referenced event does not exist in the store
    #[error("Event not found: {0}")]
    NotFound(String),

    /// Attempt to close an interval event that is already closed
    #[error("Interval already closed for event {0}")]
    AlreadyClosed(String),

    /// Attempt to close a non-interval event
    #[error("Event {0} is not interval-shaped")]
    NotAnInterval(String),
}

/// Result type alias for event model operations
pub type EventResult<T> = Result<T, EventError>;
