//! Contextual Classifier
//!
//! Relates a focal reading to nearby events in other streams:
//!
//! - **classifier**: medication / walk / meal / caffeine contexts and the
//!   time-of-day reading slot
//! - **bp**: blood-pressure category ladder
//!
//! All functions here are pure and total over well-formed input; callers
//! pass explicit same-day event slices.

pub mod bp;
pub mod classifier;

// Re-export commonly used types
pub use bp::{classify_bp, BpCategory};
pub use classifier::{
    caffeine_context, format_minutes, meal_context, medication_context, reading_slot,
    walk_context, CaffeineContext, MealBucket, MealContext, MedBucket, MedicationContext,
    ReadingSlot, WalkBucket, WalkContext,
};
