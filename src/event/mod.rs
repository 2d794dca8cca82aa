//! Event model
//!
//! The typed journal entries the engine operates on:
//!
//! - **types**: Event union, intervals, medication definitions
//! - **store**: `EventStore` seam + in-memory reference implementation
//! - **error**: Validation error types
//!
//! All timestamps are user-local wall-clock `NaiveDateTime`. Converting
//! stored instants (and rejecting unparsable ones) is the store boundary's
//! job; by the time an `Event` exists, its timestamp is valid.

pub mod error;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{EventError, EventResult};
pub use store::{EventStore, MemoryStore};
pub use types::{
    ArrhythmiaBody, DoseStatus, DrinkBody, Event, EventBody, EventId, EventKind, Interval, Macros,
    MedicationBody, MedicationDefinition, ReadingBody, Schedule, SymptomBody, TimeOfDay,
    find_definition,
};
